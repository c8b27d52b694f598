//! Courier Repository

use super::{RepoError, RepoResult};
use shared::models::{Courier, CourierCreate};
use sqlx::SqlitePool;

const COURIER_SELECT: &str =
    "SELECT id, name, is_available, wallet_balance, deliveries_count, created_at FROM courier";

pub async fn create(pool: &SqlitePool, data: CourierCreate) -> RepoResult<Courier> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO courier (id, name, is_available, wallet_balance, deliveries_count, created_at) VALUES (?1, ?2, 1, 0, 0, ?3)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create courier".into()))
}

pub async fn find_by_id(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    id: i64,
) -> RepoResult<Option<Courier>> {
    let sql = format!("{COURIER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Courier>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Toggle the courier's availability flag
pub async fn set_available(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    courier_id: i64,
    available: bool,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE courier SET is_available = ?1 WHERE id = ?2")
        .bind(available)
        .bind(courier_id)
        .execute(executor)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Courier {courier_id} not found")));
    }
    Ok(())
}

/// Atomically credit the delivery fee and bump the delivery counter.
/// Called exactly once per order, when it reaches DELIVERED.
pub async fn credit_delivery(
    executor: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    courier_id: i64,
    fee: f64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE courier SET wallet_balance = wallet_balance + ?1, deliveries_count = deliveries_count + 1 WHERE id = ?2",
    )
    .bind(fee)
    .bind(courier_id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Courier {courier_id} not found")));
    }
    Ok(())
}
