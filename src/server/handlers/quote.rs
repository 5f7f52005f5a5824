//! Quote lookup page.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use serde::Deserialize;

use crate::db::as_real;
use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::{field, page};

#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    symbol: Option<String>,
}

pub async fn quote_page(jar: SignedCookieJar) -> Result<Response, Apology> {
    if session::user_id(&jar).is_none() {
        return Ok(Redirect::to("/login").into_response());
    }
    page("quote.html", context! {})
}

pub async fn lookup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<QuoteForm>,
) -> Result<Response, Apology> {
    if session::user_id(&jar).is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    let symbol = field(&form.symbol).ok_or_else(|| Apology::forbidden("must provide symbol"))?;

    let Some(quote) = state.quotes.lookup(symbol).await? else {
        return Err(Apology::forbidden("symbol was not recognised"));
    };

    page(
        "quoted.html",
        context! {
            symbol => quote.symbol,
            name => quote.name,
            price => as_real(quote.price),
        },
    )
}
