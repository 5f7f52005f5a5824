//! Papertrade: a simulated stock-trading web app plus a grab bag of
//! small course-style utilities exposed as CLI subcommands.

pub mod api;
pub mod db;
pub mod models;
pub mod server;
pub mod tools;
