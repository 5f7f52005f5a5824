//! Cash deposit/withdrawal page.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::{field, page};

#[derive(Debug, Deserialize)]
pub struct TransferForm {
    cash: Option<String>,
}

pub async fn transfer_page(jar: SignedCookieJar) -> Result<Response, Apology> {
    if session::user_id(&jar).is_none() {
        return Ok(Redirect::to("/login").into_response());
    }
    page("transfer.html", context! {})
}

pub async fn transfer(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<TransferForm>,
) -> Result<Response, Apology> {
    let Some(user_id) = session::user_id(&jar) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let raw = field(&form.cash).ok_or_else(|| Apology::forbidden("must provide an amount"))?;
    let amount: Decimal = raw
        .parse()
        .map_err(|_| Apology::forbidden("amount must be a number"))?;

    state.db.adjust_cash(user_id, amount).await?;
    info!(user_id, amount = %amount, "Adjusted cash balance");

    Ok(Redirect::to("/").into_response())
}
