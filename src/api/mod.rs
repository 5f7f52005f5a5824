//! Quote-provider client for stock price lookups.

mod quote_client;
mod types;

pub use quote_client::{QuoteClient, QuoteSource};
pub use types::QuoteResponse;
