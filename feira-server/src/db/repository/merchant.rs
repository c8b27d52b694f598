//! Merchant Repository

use super::{RepoError, RepoResult};
use shared::models::{Merchant, MerchantCreate};
use sqlx::SqlitePool;

const MERCHANT_SELECT: &str =
    "SELECT id, name, stall, revenue_total, created_at FROM merchant";

pub async fn create(pool: &SqlitePool, data: MerchantCreate) -> RepoResult<Merchant> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO merchant (id, name, stall, revenue_total, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.stall)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create merchant".into()))
}

pub async fn find_by_id(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Merchant>> {
    let sql = format!("{MERCHANT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Merchant>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Atomically accrue revenue when one of the merchant's items is accepted
pub async fn accrue_revenue(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    merchant_id: i64,
    amount: f64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE merchant SET revenue_total = revenue_total + ?1 WHERE id = ?2",
    )
    .bind(amount)
    .bind(merchant_id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Merchant {merchant_id} not found"
        )));
    }
    Ok(())
}
