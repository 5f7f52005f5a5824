//! Signed session cookie carrying the logged-in user id.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

const SESSION_COOKIE: &str = "session";

/// The logged-in user's id, if the request carries a valid session cookie.
pub fn user_id(jar: &SignedCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| c.value().parse().ok())
}

/// Remember which user has logged in.
pub fn sign_in(jar: SignedCookieJar, user_id: i64) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, user_id.to_string()))
            .path("/")
            .http_only(true),
    )
}

/// Forget the session.
pub fn sign_out(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
}
