#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub tick_interval_ms: u64,
    pub max_step: f64,
    pub floor_price: f64,
    pub initial_price: f64,
    pub starting_wallet: f64,
    pub history_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            max_step: 2.5,
            floor_price: 10.0,
            initial_price: 150.0,
            starting_wallet: 50_000.0,
            history_capacity: 50,
        }
    }
}
