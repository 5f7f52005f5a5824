//! Trade direction for the transaction ledger.

use serde::{Deserialize, Serialize};

/// Direction of a recorded trade.
///
/// The ledger stores a signed share count; negative means a sell, and this
/// enum is how the history page labels the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeKind {
    Buy,
    Sell,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Buy => "BUY",
            TradeKind::Sell => "SELL",
        }
    }

    /// Classify a signed share count from the ledger.
    pub fn from_shares(shares: i64) -> Self {
        if shares < 0 {
            TradeKind::Sell
        } else {
            TradeKind::Buy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shares_sign() {
        assert_eq!(TradeKind::from_shares(10), TradeKind::Buy);
        assert_eq!(TradeKind::from_shares(-3), TradeKind::Sell);
        assert_eq!(TradeKind::from_shares(-3).as_str(), "SELL");
    }
}
