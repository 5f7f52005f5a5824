//! Apology pages: the uniform error surface of the web app.
//!
//! Every user-facing failure renders the same apology template with a
//! message and status code; unexpected errors become a generic 500.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::context;
use tracing::error;

use crate::db::StoreError;

use super::templates;

/// An error page with a message and HTTP status.
#[derive(Debug)]
pub struct Apology {
    pub status: StatusCode,
    pub message: String,
}

impl Apology {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The usual rejection for bad form input or a failed check.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<anyhow::Error> for Apology {
    fn from(e: anyhow::Error) -> Self {
        error!(error = %e, "Unhandled error in request");
        Apology::internal()
    }
}

impl From<StoreError> for Apology {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Db(e) => {
                error!(error = %e, "Database error in request");
                Apology::internal()
            }
            // Typed trade failures carry their own user-facing message.
            other => Apology::forbidden(other.to_string()),
        }
    }
}

impl IntoResponse for Apology {
    fn into_response(self) -> Response {
        let body = templates::render(
            "apology.html",
            context! { status => self.status.as_u16(), message => self.message },
        )
        .unwrap_or_else(|_| format!("{} {}", self.status.as_u16(), self.message));

        (self.status, Html(body)).into_response()
    }
}
