//! Registration, login, and logout.

use axum::extract::{Form, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use minijinja::context;
use serde::Deserialize;
use tracing::{error, info};

use crate::server::error::Apology;
use crate::server::{session, AppState};

use super::{field, page};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    username: Option<String>,
    password: Option<String>,
    confirmation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: Option<String>,
    password: Option<String>,
}

pub async fn register_page() -> Result<Response, Apology> {
    page("register.html", context! {})
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, Apology> {
    let username = field(&form.username).ok_or_else(|| Apology::forbidden("must provide username"))?;
    let password = field(&form.password).ok_or_else(|| Apology::forbidden("must provide password"))?;
    let confirmation = field(&form.confirmation)
        .ok_or_else(|| Apology::forbidden("must provide password confirmation"))?;

    if password != confirmation {
        return Err(Apology::forbidden("password and confirmation must be equal"));
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        error!(error = %e, "Password hashing failed");
        Apology::internal()
    })?;

    state.db.create_user(username, &hash, state.starting_cash).await?;
    info!(username, "Registered new user");

    Ok(Redirect::to("/").into_response())
}

pub async fn login_page(jar: SignedCookieJar) -> Result<Response, Apology> {
    // Visiting the login page forgets any existing session.
    let jar = session::sign_out(jar);
    Ok((jar, page("login.html", context! {})?).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, Apology> {
    let jar = session::sign_out(jar);

    let username = field(&form.username).ok_or_else(|| Apology::forbidden("must provide username"))?;
    let password = field(&form.password).ok_or_else(|| Apology::forbidden("must provide password"))?;

    let Some(user) = state.db.get_user_by_username(username).await? else {
        return Err(Apology::forbidden("invalid username and/or password"));
    };

    let verified = bcrypt::verify(password, &user.password_hash).map_err(|e| {
        error!(error = %e, "Password verification failed");
        Apology::internal()
    })?;

    if !verified {
        return Err(Apology::forbidden("invalid username and/or password"));
    }

    info!(username, "User logged in");
    let jar = session::sign_in(jar, user.id);
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn logout(jar: SignedCookieJar) -> Response {
    (session::sign_out(jar), Redirect::to("/")).into_response()
}
