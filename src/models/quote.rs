//! Quote model returned by the lookup service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price quote for a single stock symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Canonical ticker symbol (uppercase)
    pub symbol: String,

    /// Company name for display
    pub name: String,

    /// Latest price per share in USD
    pub price: Decimal,
}

impl Quote {
    /// Total cost of `shares` shares at this quote.
    pub fn cost_of(&self, shares: i64) -> Decimal {
        self.price * Decimal::from(shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_of() {
        let quote = Quote {
            symbol: "NFLX".to_string(),
            name: "Netflix, Inc.".to_string(),
            price: dec!(212.50),
        };

        assert_eq!(quote.cost_of(4), dec!(850));
        assert_eq!(quote.cost_of(0), dec!(0));
    }
}
