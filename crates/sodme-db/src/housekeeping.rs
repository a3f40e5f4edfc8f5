use anyhow::{Context, Result};
use sqlx::PgPool;

use sodme_schemas::{CleanupAction, CleanupLog, CleanupReason};

fn reason_str(reason: CleanupReason) -> &'static str {
    match reason {
        CleanupReason::PositionClosed => "position_closed",
        CleanupReason::PositionReduced => "position_reduced",
        CleanupReason::Stale => "stale",
        CleanupReason::ExpiredInstrument => "expired_instrument",
        CleanupReason::Duplicate => "duplicate",
    }
}

fn action_str(action: CleanupAction) -> &'static str {
    match action {
        CleanupAction::Cancelled => "cancelled",
        CleanupAction::Skipped => "skipped",
        CleanupAction::Failed => "failed",
    }
}

/// Inserts a housekeeping event keyed by `{order_id, reason, day}`. The
/// primary key enforces property 4 (at most one CANCEL per key) at the
/// storage layer: a second insert with the same key is rejected by the
/// unique constraint rather than silently duplicating the row.
pub async fn insert(pool: &PgPool, log: &CleanupLog) -> Result<bool> {
    let result = sqlx::query(
        r#"
        insert into housekeeping_events (
            order_id, reason, day, action, was_auto, pre_position_qty, post_position_qty, ts_utc
        ) values ($1, $2, $3, $4, $5, $6, $7, $8)
        on conflict (order_id, reason, day) do nothing
        "#,
    )
    .bind(log.key.order_id)
    .bind(reason_str(log.key.reason))
    .bind(log.key.day)
    .bind(action_str(log.action))
    .bind(log.was_auto)
    .bind(log.pre_position_qty)
    .bind(log.post_position_qty)
    .bind(log.ts_utc)
    .execute(pool)
    .await
    .context("housekeeping_events insert failed")?;

    Ok(result.rows_affected() == 1)
}
