//! Holding model representing a user's current position in one stock.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current position in a single stock, tracked at average cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol
    pub symbol: String,

    /// Company name for display
    pub name: String,

    /// Number of shares held (never negative)
    pub shares: i64,

    /// Average price paid per share
    pub avg_price: Decimal,
}

impl Holding {
    /// Create a new holding from an initial purchase.
    pub fn new(symbol: String, name: String, shares: i64, price: Decimal) -> Self {
        Self {
            symbol,
            name,
            shares,
            avg_price: price,
        }
    }

    /// Add shares at the given price, re-deriving the cost-weighted average.
    pub fn add(&mut self, shares: i64, price: Decimal) {
        let new_total = self.shares + shares;
        if new_total > 0 {
            let total_cost =
                self.avg_price * Decimal::from(self.shares) + price * Decimal::from(shares);
            self.avg_price = total_cost / Decimal::from(new_total);
        }
        self.shares = new_total;
    }

    /// Remove shares, returning how many actually came off.
    ///
    /// The average is untouched by a partial sell; a position sold to zero
    /// resets its average so a later repurchase starts fresh.
    pub fn reduce(&mut self, shares: i64) -> i64 {
        let removed = shares.min(self.shares);
        self.shares -= removed;
        if self.shares == 0 {
            self.avg_price = Decimal::ZERO;
        }
        removed
    }

    /// Total amount paid for the shares currently held.
    pub fn cost_basis(&self) -> Decimal {
        self.avg_price * Decimal::from(self.shares)
    }

    /// Market value of the position at the given price.
    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * Decimal::from(self.shares)
    }

    /// True once every share has been sold.
    pub fn is_empty(&self) -> bool {
        self.shares == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(shares: i64, price: Decimal) -> Holding {
        Holding::new("AAPL".to_string(), "Apple, Inc.".to_string(), shares, price)
    }

    #[test]
    fn test_weighted_average_on_add() {
        let mut h = holding(10, dec!(100));

        // 10 @ 100 + 10 @ 120 -> 20 @ 110
        h.add(10, dec!(120));
        assert_eq!(h.shares, 20);
        assert_eq!(h.avg_price, dec!(110));
        assert_eq!(h.cost_basis(), dec!(2200));
    }

    #[test]
    fn test_partial_sell_keeps_average() {
        let mut h = holding(20, dec!(110));

        let removed = h.reduce(5);
        assert_eq!(removed, 5);
        assert_eq!(h.shares, 15);
        assert_eq!(h.avg_price, dec!(110));
    }

    #[test]
    fn test_sell_to_zero_resets_average() {
        let mut h = holding(8, dec!(42.25));

        let removed = h.reduce(8);
        assert_eq!(removed, 8);
        assert!(h.is_empty());
        assert_eq!(h.avg_price, dec!(0));
        assert_eq!(h.cost_basis(), dec!(0));
    }

    #[test]
    fn test_reduce_caps_at_owned() {
        let mut h = holding(3, dec!(10));

        assert_eq!(h.reduce(100), 3);
        assert_eq!(h.shares, 0);
    }

    #[test]
    fn test_market_value() {
        let h = holding(12, dec!(50));
        assert_eq!(h.market_value(dec!(55.50)), dec!(666));
    }
}
