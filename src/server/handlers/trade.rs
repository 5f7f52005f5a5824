//! Buy and sell pages.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use serde::Deserialize;
use tracing::info;

use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::{field, page};

#[derive(Debug, Deserialize)]
pub struct TradeForm {
    symbol: Option<String>,
    shares: Option<String>,
}

/// Parse the shares field; anything but a positive integer is an apology.
fn parse_shares(raw: &Option<String>) -> Result<i64, Apology> {
    let raw = field(raw).ok_or_else(|| Apology::forbidden("must provide shares"))?;
    let shares: i64 = raw
        .parse()
        .map_err(|_| Apology::forbidden("shares must be a positive integer"))?;

    if shares <= 0 {
        return Err(Apology::forbidden("shares must be > 0"));
    }
    Ok(shares)
}

pub async fn buy_page(jar: SignedCookieJar) -> Result<Response, Apology> {
    if session::user_id(&jar).is_none() {
        return Ok(Redirect::to("/login").into_response());
    }
    page("buy.html", context! {})
}

pub async fn buy(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<TradeForm>,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let symbol = field(&form.symbol).ok_or_else(|| Apology::forbidden("must provide symbol"))?;
    let shares = parse_shares(&form.shares)?;

    let Some(quote) = state.quotes.lookup(symbol).await? else {
        return Err(Apology::forbidden("symbol was not recognised"));
    };

    state.db.buy(user_id, &quote, shares).await?;
    info!(user_id, symbol = %quote.symbol, shares, "Executed buy");

    Ok(Redirect::to("/").into_response())
}

pub async fn sell_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let symbols = state.db.owned_symbols(user_id).await?;
    page("sell.html", context! { symbols => symbols })
}

pub async fn sell(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<TradeForm>,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let symbol = field(&form.symbol).ok_or_else(|| Apology::forbidden("must provide symbol"))?;
    let shares = parse_shares(&form.shares)?;

    let Some(quote) = state.quotes.lookup(symbol).await? else {
        return Err(Apology::forbidden("symbol was not recognised"));
    };

    state.db.sell(user_id, &quote, shares).await?;
    info!(user_id, symbol = %quote.symbol, shares, "Executed sell");

    Ok(Redirect::to("/").into_response())
}
