//! Buy, sell, and cash-transfer operations.
//!
//! Each operation runs inside a single SQL transaction so the ledger entry,
//! the holding update, and the cash adjustment land together or not at all.

use rust_decimal::Decimal;

use super::{as_real, Database, Result, StoreError};
use crate::models::Quote;

impl Database {
    /// Buy `shares` shares at the quoted price.
    ///
    /// Records the stock, appends a ledger entry, folds the purchase into the
    /// holding's average cost, and deducts cash. Fails without side effects
    /// when the user cannot afford the purchase.
    pub async fn buy(&self, user_id: i64, quote: &Quote, shares: i64) -> Result<()> {
        let cost = quote.cost_of(shares);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO stocks (symbol, name) VALUES (?, ?) ON CONFLICT(symbol) DO UPDATE SET name = excluded.name",
        )
        .bind(&quote.symbol)
        .bind(&quote.name)
        .execute(&mut *tx)
        .await?;

        let (cash,): (f64,) = sqlx::query_as("SELECT cash FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let available = Decimal::from_f64_retain(cash).unwrap_or_default();

        if cost > available {
            return Err(StoreError::InsufficientFunds {
                needed: cost,
                available,
            });
        }

        sqlx::query("INSERT INTO transactions (user_id, symbol, shares, price) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(&quote.symbol)
            .bind(shares)
            .bind(as_real(quote.price))
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO holdings (user_id, symbol, shares, avg_price)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, symbol) DO UPDATE SET
                avg_price = (holdings.avg_price * holdings.shares + excluded.avg_price * excluded.shares)
                            / (holdings.shares + excluded.shares),
                shares = holdings.shares + excluded.shares,
                updated_at = datetime('now')
            "#,
        )
        .bind(user_id)
        .bind(&quote.symbol)
        .bind(shares)
        .bind(as_real(quote.price))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET cash = cash - ? WHERE id = ?")
            .bind(as_real(cost))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Sell `shares` shares at the quoted price.
    ///
    /// The ledger records a negative share count. A partial sell leaves the
    /// average cost untouched; selling the whole position resets it to zero.
    pub async fn sell(&self, user_id: i64, quote: &Quote, shares: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64,)> =
            sqlx::query_as("SELECT shares FROM holdings WHERE user_id = ? AND symbol = ?")
                .bind(user_id)
                .bind(&quote.symbol)
                .fetch_optional(&mut *tx)
                .await?;
        let owned = row.map(|(s,)| s).unwrap_or(0);

        if owned <= 0 {
            return Err(StoreError::NotOwned(quote.symbol.clone()));
        }
        if shares > owned {
            return Err(StoreError::InsufficientShares {
                owned,
                requested: shares,
            });
        }

        sqlx::query("INSERT INTO transactions (user_id, symbol, shares, price) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(&quote.symbol)
            .bind(-shares)
            .bind(as_real(quote.price))
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE holdings SET
                shares = shares - ?,
                avg_price = CASE WHEN shares - ? <= 0 THEN 0 ELSE avg_price END,
                updated_at = datetime('now')
            WHERE user_id = ? AND symbol = ?
            "#,
        )
        .bind(shares)
        .bind(shares)
        .bind(user_id)
        .bind(&quote.symbol)
        .execute(&mut *tx)
        .await?;

        let proceeds = quote.cost_of(shares);
        sqlx::query("UPDATE users SET cash = cash + ? WHERE id = ?")
            .bind(as_real(proceeds))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deposit (positive) or withdraw (negative) cash.
    ///
    /// The balance never goes below zero; an overdraw fails the transfer.
    pub async fn adjust_cash(&self, user_id: i64, amount: Decimal) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let (cash,): (f64,) = sqlx::query_as("SELECT cash FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let available = Decimal::from_f64_retain(cash).unwrap_or_default();
        let balance = available + amount;

        if balance < Decimal::ZERO {
            return Err(StoreError::InsufficientFunds {
                needed: -amount,
                available,
            });
        }

        sqlx::query("UPDATE users SET cash = ? WHERE id = ?")
            .bind(as_real(balance))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeKind;
    use rust_decimal_macros::dec;

    fn quote(symbol: &str, price: Decimal) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            price,
        }
    }

    async fn user_with_cash(db: &Database, cash: Decimal) -> i64 {
        db.create_user("trader", "hash", cash).await.unwrap()
    }

    #[tokio::test]
    async fn test_buy_updates_cash_holding_and_ledger() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(10000)).await;

        db.buy(uid, &quote("AAPL", dec!(100)), 10).await.unwrap();
        db.buy(uid, &quote("AAPL", dec!(120)), 10).await.unwrap();

        let user = db.get_user(uid).await.unwrap().unwrap();
        assert_eq!(user.balance(), dec!(7800));

        let holding = db.get_holding(uid, "AAPL").await.unwrap().unwrap();
        assert_eq!(holding.shares, 20);
        assert_eq!(holding.avg_price, 110.0);

        let ledger = db.get_transactions(uid).await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].kind(), TradeKind::Buy);
        assert_eq!(ledger[1].shares, 10);
    }

    #[tokio::test]
    async fn test_buy_rejects_unaffordable_order() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(500)).await;

        let err = db.buy(uid, &quote("AAPL", dec!(100)), 6).await;
        assert!(matches!(err, Err(StoreError::InsufficientFunds { .. })));

        // Nothing was committed.
        let user = db.get_user(uid).await.unwrap().unwrap();
        assert_eq!(user.balance(), dec!(500));
        assert!(db.get_transactions(uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sell_partial_and_to_zero() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(10000)).await;
        db.buy(uid, &quote("NFLX", dec!(200)), 10).await.unwrap();

        db.sell(uid, &quote("NFLX", dec!(250)), 4).await.unwrap();
        let holding = db.get_holding(uid, "NFLX").await.unwrap().unwrap();
        assert_eq!(holding.shares, 6);
        assert_eq!(holding.avg_price, 200.0);

        db.sell(uid, &quote("NFLX", dec!(250)), 6).await.unwrap();
        let holding = db.get_holding(uid, "NFLX").await.unwrap().unwrap();
        assert_eq!(holding.shares, 0);
        assert_eq!(holding.avg_price, 0.0);

        // 10000 - 2000 + 2500
        let user = db.get_user(uid).await.unwrap().unwrap();
        assert_eq!(user.balance(), dec!(10500));

        let ledger = db.get_transactions(uid).await.unwrap();
        assert_eq!(ledger[1].shares, -4);
        assert_eq!(ledger[1].kind(), TradeKind::Sell);
    }

    #[tokio::test]
    async fn test_sell_rejects_oversell_and_unowned() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(10000)).await;
        db.buy(uid, &quote("AAPL", dec!(100)), 5).await.unwrap();

        let err = db.sell(uid, &quote("AAPL", dec!(100)), 6).await;
        assert!(matches!(err, Err(StoreError::InsufficientShares { owned: 5, requested: 6 })));

        let err = db.sell(uid, &quote("MSFT", dec!(100)), 1).await;
        assert!(matches!(err, Err(StoreError::NotOwned(_))));
    }

    #[tokio::test]
    async fn test_adjust_cash_never_overdraws() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(100)).await;

        db.adjust_cash(uid, dec!(50)).await.unwrap();
        db.adjust_cash(uid, dec!(-120)).await.unwrap();

        let err = db.adjust_cash(uid, dec!(-31)).await;
        assert!(matches!(err, Err(StoreError::InsufficientFunds { .. })));

        let user = db.get_user(uid).await.unwrap().unwrap();
        assert_eq!(user.balance(), dec!(30));
    }

    #[tokio::test]
    async fn test_owned_symbols_skips_emptied_positions() {
        let db = Database::in_memory().await.unwrap();
        let uid = user_with_cash(&db, dec!(10000)).await;
        db.buy(uid, &quote("AAPL", dec!(10)), 1).await.unwrap();
        db.buy(uid, &quote("NFLX", dec!(10)), 1).await.unwrap();
        db.sell(uid, &quote("AAPL", dec!(10)), 1).await.unwrap();

        assert_eq!(db.owned_symbols(uid).await.unwrap(), vec!["NFLX".to_string()]);
        assert_eq!(db.get_holdings(uid).await.unwrap().len(), 1);
    }
}
