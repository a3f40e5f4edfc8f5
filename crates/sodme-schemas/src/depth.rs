use serde::{Deserialize, Serialize};

use crate::money::Paise;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Paise,
    pub quantity: i64,
}

/// Up to 5 bid levels and 5 ask levels for one instrument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub instrument_token: i64,
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    pub fn best_bid(&self) -> Option<Paise> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Paise> {
        self.asks.first().map(|l| l.price)
    }

    /// `None` when either side is empty, or when best_bid > best_ask
    /// (crossed book) — callers must treat that as a validation error.
    pub fn mid(&self) -> Option<Paise> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid + ask).scaled_by(0.5))
    }

    /// True when the book is crossed or locked: best_bid >= best_ask.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(b), Some(a)) => b >= a,
            _ => false,
        }
    }

    pub fn opposite_side(&self, side: crate::order::Side) -> &[DepthLevel] {
        match side {
            crate::order::Side::Buy => &self.asks,
            crate::order::Side::Sell => &self.bids,
        }
    }

    pub fn top5_opposite_quantity(&self, side: crate::order::Side) -> i64 {
        self.opposite_side(side).iter().take(5).map(|l| l.quantity).sum()
    }
}
