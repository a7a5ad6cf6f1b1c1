use std::sync::{Arc, Mutex as StdMutex};

use sim_core::{SimConfig, SimSession, SimSnapshot, TradeFill, TradeSide};
use sim_runtime::{
    InMemoryRunLogWriter, LatencyPercentiles, RunLogEvent, RunLogEventKind, SharedMetrics,
    SharedRunLog, SharedSession, TickLatencyMetrics,
};
use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl From<TradeSide> for OrderSide {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => Self::Buy,
            TradeSide::Sell => Self::Sell,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FeedEvent {
    Connected,
    Tick {
        tick: u64,
        price: f64,
        ts_ms: u64,
    },
    TradeAccepted {
        side: OrderSide,
        qty: u64,
        price: f64,
        notional: f64,
    },
    TradeRejected {
        side: OrderSide,
        requested_qty: u64,
        reason: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PricePointBody {
    pub ts_ms: u64,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SnapshotBody {
    pub tick: u64,
    pub price: f64,
    pub wallet: f64,
    pub shares_held: u64,
    pub portfolio_value: f64,
    pub history: Vec<PricePointBody>,
}

impl From<SimSnapshot> for SnapshotBody {
    fn from(snapshot: SimSnapshot) -> Self {
        Self {
            tick: snapshot.tick,
            price: snapshot.price,
            wallet: snapshot.wallet,
            shares_held: snapshot.shares_held,
            portfolio_value: snapshot.portfolio_value,
            history: snapshot
                .history
                .into_iter()
                .map(|point| PricePointBody {
                    ts_ms: point.ts_ms,
                    price: point.price,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FillBody {
    pub side: OrderSide,
    pub qty: u64,
    pub price: f64,
    pub notional: f64,
}

impl From<TradeFill> for FillBody {
    fn from(fill: TradeFill) -> Self {
        Self {
            side: fill.side.into(),
            qty: fill.qty,
            price: fill.price,
            notional: fill.notional,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PercentilesBody {
    pub count: usize,
    pub p50_micros: u64,
    pub p90_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

impl From<LatencyPercentiles> for PercentilesBody {
    fn from(report: LatencyPercentiles) -> Self {
        Self {
            count: report.count,
            p50_micros: report.p50_micros,
            p90_micros: report.p90_micros,
            p95_micros: report.p95_micros,
            p99_micros: report.p99_micros,
            max_micros: report.max_micros,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    session: SharedSession,
    metrics: SharedMetrics,
    run_log: SharedRunLog,
    events_tx: broadcast::Sender<FeedEvent>,
}

impl AppState {
    pub fn new(session: SharedSession, metrics: SharedMetrics, run_log: SharedRunLog) -> Self {
        let (events_tx, _) = broadcast::channel(256);
        Self {
            session,
            metrics,
            run_log,
            events_tx,
        }
    }

    /// Fresh session with default parameters and a caller-chosen seed.
    pub fn with_seed(config: SimConfig, seed: u64, now_ms: u64) -> Self {
        Self::new(
            Arc::new(tokio::sync::Mutex::new(SimSession::new(config, seed, now_ms))),
            Arc::new(StdMutex::new(TickLatencyMetrics::new())),
            Arc::new(StdMutex::new(Box::new(InMemoryRunLogWriter::new()))),
        )
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FeedEvent> {
        self.events_tx.subscribe()
    }

    pub fn publish_event(
        &self,
        event: FeedEvent,
    ) -> Result<usize, broadcast::error::SendError<FeedEvent>> {
        self.events_tx.send(event)
    }

    pub fn tick_percentiles(&self) -> Option<LatencyPercentiles> {
        match self.metrics.lock() {
            Ok(metrics) => metrics.percentiles(),
            Err(_) => None,
        }
    }

    /// Best-effort; a poisoned or unavailable run log never fails a trade.
    pub fn log_trade(&self, tick: u64, kind: RunLogEventKind, detail: Option<String>) {
        if let Ok(mut log) = self.run_log.lock() {
            log.write(RunLogEvent::new(tick, kind, detail));
        }
    }
}
