//! Transaction-history page.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use serde::Serialize;

use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::page;

#[derive(Debug, Serialize)]
struct LedgerView {
    symbol: String,
    kind: &'static str,
    shares: i64,
    price: f64,
    executed_at: String,
}

pub async fn history(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let entries: Vec<LedgerView> = state
        .db
        .get_transactions(user_id)
        .await?
        .into_iter()
        .map(|row| LedgerView {
            symbol: row.symbol.clone(),
            kind: row.kind().as_str(),
            shares: row.shares,
            price: row.price,
            executed_at: row.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    page("history.html", context! { transactions => entries })
}
