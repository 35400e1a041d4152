use serde::{Deserialize, Serialize};

/// Long-only position in a single instrument.
///
/// `size` is signed for generality but never negative: there is no short state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub size: f64,
    pub avg_entry_price: f64,
}

impl Position {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn is_flat(&self) -> bool {
        self.size == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.size > 0.0
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.size * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.size * (current_price - self.avg_entry_price)
    }

    /// Add units at `price`, updating the volume-weighted entry price.
    pub(crate) fn add(&mut self, size: f64, price: f64) {
        let new_size = self.size + size;
        if new_size > 0.0 {
            self.avg_entry_price = (self.size * self.avg_entry_price + size * price) / new_size;
        }
        self.size = new_size;
    }

    /// Remove units. Entry price is kept until the position is flat.
    pub(crate) fn reduce(&mut self, size: f64) {
        self.size -= size;
        if self.size <= 0.0 {
            *self = Self::flat();
        }
    }
}
