use serde::{Deserialize, Serialize};

use super::sector::Sector;

/// Default starting share price for a newly listed company.
pub const DEFAULT_SHARE_PRICE: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub sector: Sector,
    /// Fixed product quality in [0, 1].
    pub base_quality: f64,
    /// Nominal price level (> 0). Policies alter the effective price per day,
    /// never this value.
    pub base_price: f64,
    /// Dynamic reputation in [0, 1].
    pub reputation: f64,
    /// Dynamic share price, always > 0.
    pub share_price: f64,
    /// Accumulated retained revenue (>= 0).
    pub cash: f64,
    /// Exponential moving average of retained daily revenue. `None` until the
    /// company has traded once.
    pub trailing_revenue: Option<f64>,
    pub last_day_units_sold: f64,
    pub last_day_revenue: f64,
}

impl Company {
    /// A company with neutral reputation (0.5) and the default share price.
    /// The id is assigned when the company is added to a world.
    pub fn new(name: impl Into<String>, sector: Sector, base_quality: f64, base_price: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            sector,
            base_quality,
            base_price,
            reputation: 0.5,
            share_price: DEFAULT_SHARE_PRICE,
            cash: 0.0,
            trailing_revenue: None,
            last_day_units_sold: 0.0,
            last_day_revenue: 0.0,
        }
    }

    pub fn with_reputation(mut self, reputation: f64) -> Self {
        self.reputation = reputation;
        self
    }

    pub fn with_share_price(mut self, share_price: f64) -> Self {
        self.share_price = share_price;
        self
    }

    pub fn with_cash(mut self, cash: f64) -> Self {
        self.cash = cash;
        self
    }
}
