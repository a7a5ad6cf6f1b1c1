use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeFill {
    pub side: TradeSide,
    pub qty: u64,
    pub price: f64,
    pub notional: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeError {
    InsufficientFunds,
    InsufficientShares,
    InvalidQuantity,
}

impl fmt::Display for TradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFunds => write!(f, "Not enough funds!"),
            Self::InsufficientShares => write!(f, "Not enough shares to sell!"),
            Self::InvalidQuantity => write!(f, "Quantity must be at least 1"),
        }
    }
}

impl std::error::Error for TradeError {}

/// Virtual wallet and share position. Every operation commits immediately or
/// rejects leaving state untouched; there is no pending phase and no partial
/// fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ledger {
    wallet: f64,
    shares_held: u64,
}

impl Ledger {
    pub fn new(starting_wallet: f64) -> Self {
        assert!(
            starting_wallet.is_finite() && starting_wallet >= 0.0,
            "starting_wallet must be finite and non-negative"
        );

        Self {
            wallet: starting_wallet,
            shares_held: 0,
        }
    }

    pub fn wallet(&self) -> f64 {
        self.wallet
    }

    pub fn shares_held(&self) -> u64 {
        self.shares_held
    }

    pub fn portfolio_value(&self, price: f64) -> f64 {
        self.shares_held as f64 * price
    }

    pub fn buy(&mut self, qty: u64, price: f64) -> Result<TradeFill, TradeError> {
        if qty == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        let cost = price * qty as f64;
        if self.wallet < cost {
            return Err(TradeError::InsufficientFunds);
        }

        self.wallet -= cost;
        self.shares_held += qty;

        Ok(TradeFill {
            side: TradeSide::Buy,
            qty,
            price,
            notional: cost,
        })
    }

    pub fn sell(&mut self, qty: u64, price: f64) -> Result<TradeFill, TradeError> {
        if qty == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        if self.shares_held < qty {
            return Err(TradeError::InsufficientShares);
        }

        let revenue = price * qty as f64;
        self.wallet += revenue;
        self.shares_held -= qty;

        Ok(TradeFill {
            side: TradeSide::Sell,
            qty,
            price,
            notional: revenue,
        })
    }
}
