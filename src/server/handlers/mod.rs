//! Request handlers, one module per page group.

pub mod auth;
pub mod history;
pub mod portfolio;
pub mod quote;
pub mod trade;
pub mod transfer;

use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use super::error::Apology;
use super::templates;

/// A trimmed, non-empty form field.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Render a page template into a response.
fn page(name: &str, ctx: minijinja::Value) -> Result<Response, Apology> {
    let html = templates::render(name, ctx).map_err(|e| {
        error!(template = name, error = %e, "Template render failed");
        Apology::internal()
    })?;

    Ok(Html(html).into_response())
}
