use crate::config::SimConfig;
use crate::generators::PriceGenerator;
use crate::history::{PriceHistory, PricePoint};
use crate::ledger::{Ledger, TradeError, TradeFill};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickUpdate {
    pub tick: u64,
    pub price: f64,
    pub ts_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    pub tick: u64,
    pub price: f64,
    pub wallet: f64,
    pub shares_held: u64,
    pub portfolio_value: f64,
    pub history: Vec<PricePoint>,
}

/// One simulator run: price path, bounded history, and the paper-trading
/// ledger. Owned by whoever drives the ticks; dropped state is gone, there is
/// no persistence.
#[derive(Debug, Clone)]
pub struct SimSession {
    config: SimConfig,
    generator: PriceGenerator,
    history: PriceHistory,
    ledger: Ledger,
    tick: u64,
}

impl SimSession {
    pub fn new(config: SimConfig, seed: u64, now_ms: u64) -> Self {
        let generator = PriceGenerator::new(
            seed,
            config.initial_price,
            config.max_step,
            config.floor_price,
        );
        let mut history = PriceHistory::new(config.history_capacity);
        history.push(PricePoint {
            ts_ms: now_ms,
            price: generator.current_price(),
        });

        Self {
            config,
            generator,
            history,
            ledger: Ledger::new(config.starting_wallet),
            tick: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current_price(&self) -> f64 {
        self.generator.current_price()
    }

    pub fn apply_tick(&mut self, now_ms: u64) -> TickUpdate {
        self.tick += 1;
        let price = self.generator.next_price();
        self.history.push(PricePoint { ts_ms: now_ms, price });

        TickUpdate {
            tick: self.tick,
            price,
            ts_ms: now_ms,
        }
    }

    pub fn buy(&mut self, qty: u64) -> Result<TradeFill, TradeError> {
        self.ledger.buy(qty, self.current_price())
    }

    pub fn sell(&mut self, qty: u64) -> Result<TradeFill, TradeError> {
        self.ledger.sell(qty, self.current_price())
    }

    pub fn snapshot(&self) -> SimSnapshot {
        let price = self.current_price();

        SimSnapshot {
            tick: self.tick,
            price,
            wallet: self.ledger.wallet(),
            shares_held: self.ledger.shares_held(),
            portfolio_value: self.ledger.portfolio_value(price),
            history: self.history.to_vec(),
        }
    }
}
