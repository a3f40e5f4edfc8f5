use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Paise;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Long => 1,
            Direction::Short => -1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub strategy_id: Uuid,
    pub instrument_token: i64,
    pub direction: Direction,
    pub quantity_lots: i64,
    pub average_price: Paise,
    pub current_price: Paise,
    pub previous_settlement_price: Paise,
    pub lot_size: i64,
}

impl Position {
    pub fn is_flat(&self) -> bool {
        self.quantity_lots == 0
    }

    /// Direction-signed P&L = sign × (current − average) × lots × lot_size.
    pub fn pnl(&self) -> Paise {
        let diff = self.current_price - self.average_price;
        let scaled = diff.scaled_by((self.quantity_lots * self.lot_size * self.direction.sign()) as f64);
        scaled
    }

    pub fn contract_value(&self) -> Paise {
        self.current_price
            .scaled_by((self.quantity_lots.abs() * self.lot_size) as f64)
    }
}
