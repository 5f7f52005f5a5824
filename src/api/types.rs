//! Response types for the quote provider API.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Quote;

/// Quote payload from `GET /stock/{symbol}/quote`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub symbol: String,
    #[serde(default)]
    pub company_name: String,
    pub latest_price: Decimal,
}

impl From<QuoteResponse> for Quote {
    fn from(r: QuoteResponse) -> Self {
        Quote {
            symbol: r.symbol.to_uppercase(),
            name: r.company_name,
            price: r.latest_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_provider_payload() {
        let json = r#"{"symbol":"nflx","companyName":"Netflix, Inc.","latestPrice":212.49,"volume":12345}"#;
        let response: QuoteResponse = serde_json::from_str(json).unwrap();
        let quote: Quote = response.into();

        assert_eq!(quote.symbol, "NFLX");
        assert_eq!(quote.name, "Netflix, Inc.");
        assert_eq!(quote.price, dec!(212.49));
    }
}
