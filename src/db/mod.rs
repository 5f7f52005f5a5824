//! SQLite persistence for accounts, holdings, and the transaction ledger.
//!
//! Stores everything the web app needs between requests:
//! - Users (username, password hash, cash balance)
//! - Known stocks (symbol -> company name)
//! - Per-user holdings with average cost
//! - Append-only transaction ledger

mod error;
mod trade;

pub use error::{Result, StoreError};

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::models::{Holding, TradeKind};

/// Database connection pool with the full application schema.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// User account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub cash: f64,
    pub created_at: NaiveDateTime,
}

impl User {
    /// Cash balance as a decimal for accounting arithmetic.
    pub fn balance(&self) -> Decimal {
        Decimal::from_f64_retain(self.cash).unwrap_or_default()
    }
}

/// Stored holding row, joined with the stock's display name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HoldingRow {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub name: String,
    pub shares: i64,
    pub avg_price: f64,
    pub updated_at: NaiveDateTime,
}

impl HoldingRow {
    /// Lift the row into the domain holding type.
    pub fn to_holding(&self) -> Holding {
        Holding {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            shares: self.shares,
            avg_price: Decimal::from_f64_retain(self.avg_price).unwrap_or_default(),
        }
    }
}

/// Ledger row; `shares` is negative for sells.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub shares: i64,
    pub price: f64,
    pub executed_at: NaiveDateTime,
}

impl TransactionRow {
    pub fn kind(&self) -> TradeKind {
        TradeKind::from_shares(self.shares)
    }
}

/// Convert a decimal amount to the REAL column representation.
pub(crate) fn as_real(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

impl Database {
    /// Create a new database connection and apply migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Open a throwaway in-memory database, used by the test suites.
    ///
    /// A single connection is mandatory here: each pooled connection to
    /// `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run all database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                cash REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stocks (
                symbol TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS holdings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL DEFAULT 0,
                avg_price REAL NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, symbol),
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (symbol) REFERENCES stocks(symbol)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL,
                price REAL NOT NULL,
                executed_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (symbol) REFERENCES stocks(symbol)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Indexes
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_holdings_user ON holdings(user_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== Users ====================

    /// Create a user with the given starting balance, returning the new id.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        starting_cash: Decimal,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, cash) VALUES (?, ?, ?)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(as_real(starting_cash))
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by username (for login).
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Look up a user by id (for the session cookie).
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    // ==================== Holdings ====================

    /// All non-empty holdings for a user, ordered by symbol.
    pub async fn get_holdings(&self, user_id: i64) -> Result<Vec<HoldingRow>> {
        let rows = sqlx::query_as::<_, HoldingRow>(
            r#"
            SELECT h.id, h.user_id, h.symbol, s.name, h.shares, h.avg_price, h.updated_at
            FROM holdings h
            JOIN stocks s ON s.symbol = h.symbol
            WHERE h.user_id = ? AND h.shares > 0
            ORDER BY h.symbol
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One holding, if the user has ever traded the symbol.
    pub async fn get_holding(&self, user_id: i64, symbol: &str) -> Result<Option<HoldingRow>> {
        let row = sqlx::query_as::<_, HoldingRow>(
            r#"
            SELECT h.id, h.user_id, h.symbol, s.name, h.shares, h.avg_price, h.updated_at
            FROM holdings h
            JOIN stocks s ON s.symbol = h.symbol
            WHERE h.user_id = ? AND h.symbol = ?
            "#,
        )
        .bind(user_id)
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Symbols the user currently owns shares of (for the sell form).
    pub async fn owned_symbols(&self, user_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT symbol FROM holdings WHERE user_id = ? AND shares > 0 ORDER BY symbol",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    // ==================== Ledger ====================

    /// Full transaction history for a user, oldest first.
    pub async fn get_transactions(&self, user_id: i64) -> Result<Vec<TransactionRow>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE user_id = ? ORDER BY executed_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Get the connection pool (for advanced queries).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_username() {
        let db = Database::in_memory().await.unwrap();

        db.create_user("alice", "hash-a", dec!(10000)).await.unwrap();
        let err = db.create_user("alice", "hash-b", dec!(10000)).await;

        assert!(matches!(err, Err(StoreError::UsernameTaken(_))));
    }

    #[tokio::test]
    async fn test_user_lookup_roundtrip() {
        let db = Database::in_memory().await.unwrap();

        let id = db.create_user("bob", "hash", dec!(10000)).await.unwrap();
        let by_name = db.get_user_by_username("bob").await.unwrap().unwrap();
        let by_id = db.get_user(id).await.unwrap().unwrap();

        assert_eq!(by_name.id, id);
        assert_eq!(by_id.username, "bob");
        assert_eq!(by_id.balance(), dec!(10000));
        assert!(db.get_user_by_username("nobody").await.unwrap().is_none());
    }
}
