mod config;
mod generators;
mod history;
mod ledger;
mod session;

pub use config::SimConfig;
pub use generators::PriceGenerator;
pub use history::{PriceHistory, PricePoint};
pub use ledger::{Ledger, TradeError, TradeFill, TradeSide};
pub use session::{SimSession, SimSnapshot, TickUpdate};
