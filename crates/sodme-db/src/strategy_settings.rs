use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use sodme_schemas::StrategySettings;

/// Insert or replace a strategy's settings row wholesale. `sodme-strategy`
/// validates before ever calling this.
pub async fn upsert(pool: &PgPool, strategy_id: Uuid, settings: &StrategySettings) -> Result<()> {
    sqlx::query(
        r#"
        insert into strategy_settings (
            strategy_id, auto_cleanup, cleanup_on_exit, allow_orphans, max_spread_pct,
            min_liquidity_score, max_impact_bps, require_approval_high_impact,
            margin_buffer_pct, check_margin_before_order, max_loss_pct,
            max_margin_utilization_pct, auto_square_off_on_loss, intraday,
            square_off_time, warning_time, stale_order_hours, updated_at
        ) values (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, now()
        )
        on conflict (strategy_id) do update set
            auto_cleanup = excluded.auto_cleanup,
            cleanup_on_exit = excluded.cleanup_on_exit,
            allow_orphans = excluded.allow_orphans,
            max_spread_pct = excluded.max_spread_pct,
            min_liquidity_score = excluded.min_liquidity_score,
            max_impact_bps = excluded.max_impact_bps,
            require_approval_high_impact = excluded.require_approval_high_impact,
            margin_buffer_pct = excluded.margin_buffer_pct,
            check_margin_before_order = excluded.check_margin_before_order,
            max_loss_pct = excluded.max_loss_pct,
            max_margin_utilization_pct = excluded.max_margin_utilization_pct,
            auto_square_off_on_loss = excluded.auto_square_off_on_loss,
            intraday = excluded.intraday,
            square_off_time = excluded.square_off_time,
            warning_time = excluded.warning_time,
            stale_order_hours = excluded.stale_order_hours,
            updated_at = now()
        "#,
    )
    .bind(strategy_id)
    .bind(settings.auto_cleanup)
    .bind(settings.cleanup_on_exit)
    .bind(settings.allow_orphans)
    .bind(settings.max_spread_pct)
    .bind(settings.min_liquidity_score)
    .bind(settings.max_impact_bps)
    .bind(settings.require_approval_high_impact)
    .bind(settings.margin_buffer_pct)
    .bind(settings.check_margin_before_order)
    .bind(settings.max_loss_pct)
    .bind(settings.max_margin_utilization_pct)
    .bind(settings.auto_square_off_on_loss)
    .bind(settings.intraday)
    .bind(settings.square_off_time)
    .bind(settings.warning_time)
    .bind(settings.stale_order_hours)
    .execute(pool)
    .await
    .context("strategy_settings upsert failed")?;

    Ok(())
}

pub async fn fetch(pool: &PgPool, strategy_id: Uuid) -> Result<Option<StrategySettings>> {
    let row = sqlx::query(
        r#"
        select auto_cleanup, cleanup_on_exit, allow_orphans, max_spread_pct, min_liquidity_score,
               max_impact_bps, require_approval_high_impact, margin_buffer_pct,
               check_margin_before_order, max_loss_pct, max_margin_utilization_pct,
               auto_square_off_on_loss, intraday, square_off_time, warning_time, stale_order_hours
        from strategy_settings
        where strategy_id = $1
        "#,
    )
    .bind(strategy_id)
    .fetch_optional(pool)
    .await
    .context("strategy_settings fetch failed")?;

    let Some(row) = row else { return Ok(None) };

    Ok(Some(StrategySettings {
        auto_cleanup: row.try_get("auto_cleanup")?,
        cleanup_on_exit: row.try_get("cleanup_on_exit")?,
        allow_orphans: row.try_get("allow_orphans")?,
        max_spread_pct: row.try_get("max_spread_pct")?,
        min_liquidity_score: row.try_get("min_liquidity_score")?,
        max_impact_bps: row.try_get("max_impact_bps")?,
        require_approval_high_impact: row.try_get("require_approval_high_impact")?,
        margin_buffer_pct: row.try_get("margin_buffer_pct")?,
        check_margin_before_order: row.try_get("check_margin_before_order")?,
        max_loss_pct: row.try_get("max_loss_pct")?,
        max_margin_utilization_pct: row.try_get("max_margin_utilization_pct")?,
        auto_square_off_on_loss: row.try_get("auto_square_off_on_loss")?,
        intraday: row.try_get("intraday")?,
        square_off_time: row.try_get("square_off_time")?,
        warning_time: row.try_get("warning_time")?,
        stale_order_hours: row.try_get("stale_order_hours")?,
    }))
}
