use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use sodme_schemas::{CostBreakdown, ExecutionAnalysis, LiquidityTier, RecommendedAction, RecommendedType};

fn liquidity_tier_str(tier: LiquidityTier) -> &'static str {
    match tier {
        LiquidityTier::High => "high",
        LiquidityTier::Medium => "medium",
        LiquidityTier::Low => "low",
        LiquidityTier::Illiquid => "illiquid",
    }
}

fn recommended_action_str(action: RecommendedAction) -> &'static str {
    match action {
        RecommendedAction::ExecuteMarket => "execute_market",
        RecommendedAction::ExecuteLimit => "execute_limit",
        RecommendedAction::AlertUser => "alert_user",
        RecommendedAction::RequireApproval => "require_approval",
        RecommendedAction::Reject => "reject",
    }
}

fn recommended_type_str(kind: Option<RecommendedType>) -> Option<&'static str> {
    kind.map(|k| match k {
        RecommendedType::Market => "market",
        RecommendedType::Limit => "limit",
    })
}

/// Appends a new execution analysis record. Per SPEC_FULL.md §9 Open
/// Questions #3, a partial-fill re-analysis never mutates an existing row —
/// it inserts a new one with `correlates_with` pointing at the original.
pub async fn insert(pool: &PgPool, analysis: &ExecutionAnalysis) -> Result<()> {
    let warnings = serde_json::to_value(&analysis.warnings).context("serialize warnings")?;

    sqlx::query(
        r#"
        insert into order_execution_analysis (
            id, order_id, correlates_with, spread_abs, spread_pct, liquidity_tier,
            liquidity_score, estimated_fill_price, impact_bps, impact_cost,
            levels_consumed, can_fill_completely, warnings, recommended_action,
            recommended_type, actual_fill_price, actual_slippage, quality_score, created_at
        ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        "#,
    )
    .bind(analysis.id)
    .bind(analysis.order_id)
    .bind(analysis.correlates_with)
    .bind(analysis.spread_abs.raw())
    .bind(analysis.spread_pct)
    .bind(liquidity_tier_str(analysis.liquidity_tier))
    .bind(analysis.liquidity_score)
    .bind(analysis.estimated_fill_price.raw())
    .bind(analysis.impact_bps)
    .bind(analysis.impact_cost.raw())
    .bind(analysis.levels_consumed as i32)
    .bind(analysis.can_fill_completely)
    .bind(warnings)
    .bind(recommended_action_str(analysis.recommended_action))
    .bind(recommended_type_str(analysis.recommended_type))
    .bind(analysis.actual_fill_price.map(|p| p.raw()))
    .bind(analysis.actual_slippage.map(|p| p.raw()))
    .bind(analysis.quality_score)
    .bind(analysis.created_at)
    .execute(pool)
    .await
    .context("order_execution_analysis insert failed")?;

    Ok(())
}

pub async fn fetch_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<Uuid>> {
    let rows = sqlx::query("select id from order_execution_analysis where order_id = $1 order by created_at asc")
        .bind(order_id)
        .fetch_all(pool)
        .await
        .context("order_execution_analysis fetch_for_order failed")?;

    rows.iter().map(|r| r.try_get::<Uuid, _>("id").map_err(Into::into)).collect()
}

pub async fn insert_cost_breakdown(pool: &PgPool, order_id: Uuid, cost: &CostBreakdown) -> Result<()> {
    sqlx::query(
        r#"
        insert into order_cost_breakdown (
            order_id, order_value, brokerage, stt, exchange_charges, gst, sebi_charges,
            stamp_duty, total_charges, net_cost
        ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        on conflict (order_id) do update set
            order_value = excluded.order_value,
            brokerage = excluded.brokerage,
            stt = excluded.stt,
            exchange_charges = excluded.exchange_charges,
            gst = excluded.gst,
            sebi_charges = excluded.sebi_charges,
            stamp_duty = excluded.stamp_duty,
            total_charges = excluded.total_charges,
            net_cost = excluded.net_cost
        "#,
    )
    .bind(order_id)
    .bind(cost.order_value.raw())
    .bind(cost.brokerage.raw())
    .bind(cost.stt.raw())
    .bind(cost.exchange_charges.raw())
    .bind(cost.gst.raw())
    .bind(cost.sebi_charges.raw())
    .bind(cost.stamp_duty.raw())
    .bind(cost.total_charges.raw())
    .bind(cost.net_cost.raw())
    .execute(pool)
    .await
    .context("order_cost_breakdown upsert failed")?;

    Ok(())
}
