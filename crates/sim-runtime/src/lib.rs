pub mod driver;
pub mod logging;
pub mod metrics;

pub use driver::{unix_ms_now, SharedMetrics, SharedRunLog, SharedSession, TickDriver};
pub use logging::{
    InMemoryRunLogWriter, JsonLinesRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter,
};
pub use metrics::{LatencyPercentiles, TickLatencyMetrics};
