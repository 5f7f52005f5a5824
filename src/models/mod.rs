//! Domain models for quotes, holdings, and trade records.

mod holding;
mod quote;
mod trade;

pub use holding::Holding;
pub use quote::Quote;
pub use trade::TradeKind;
