//! Portfolio page: current holdings priced at market, plus cash.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use serde::Serialize;

use crate::db::as_real;
use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::page;

#[derive(Debug, Serialize)]
struct PositionView {
    symbol: String,
    name: String,
    shares: i64,
    avg_price: f64,
    price: f64,
    value: f64,
}

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };
    let Some(user) = state.db.get_user(user_id).await? else {
        // Stale cookie from a wiped database.
        return Ok((session::sign_out(jar), Redirect::to("/login")).into_response());
    };

    let mut total = user.balance();
    let mut positions = Vec::new();

    for row in state.db.get_holdings(user_id).await? {
        let holding = row.to_holding();
        // The provider can drop a symbol we still hold; value those at cost.
        let price = match state.quotes.lookup(&holding.symbol).await? {
            Some(quote) => quote.price,
            None => holding.avg_price,
        };
        let value = holding.market_value(price);
        total += value;

        positions.push(PositionView {
            symbol: holding.symbol,
            name: holding.name,
            shares: holding.shares,
            avg_price: as_real(holding.avg_price),
            price: as_real(price),
            value: as_real(value),
        });
    }

    page(
        "portfolio.html",
        context! {
            username => user.username,
            positions => positions,
            cash => user.cash,
            total => as_real(total),
        },
    )
}
