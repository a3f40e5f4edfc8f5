use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use sodme_schemas::{AppliedFactor, MarginChangeEvent, MarginSnapshot, MarginSource, SettlementRecord, Severity};

pub async fn insert_snapshot(pool: &PgPool, snapshot: &MarginSnapshot) -> Result<()> {
    let factors = serde_json::to_value(&snapshot.applied_factors).context("serialize applied_factors")?;
    let warnings = serde_json::to_value(&snapshot.warnings).context("serialize warnings")?;
    let source = match snapshot.source {
        MarginSource::Broker => "broker",
        MarginSource::Internal => "internal",
    };

    sqlx::query(
        r#"
        insert into margin_snapshots (
            id, strategy_id, ts_utc, span, exposure, premium, additional, total,
            applied_factors, available_margin, utilization_pct, warnings, source
        ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(snapshot.id)
    .bind(snapshot.strategy_id)
    .bind(snapshot.ts_utc)
    .bind(snapshot.span.raw())
    .bind(snapshot.exposure.raw())
    .bind(snapshot.premium.raw())
    .bind(snapshot.additional.raw())
    .bind(snapshot.total.raw())
    .bind(factors)
    .bind(snapshot.available_margin.raw())
    .bind(snapshot.utilization_pct)
    .bind(warnings)
    .bind(source)
    .execute(pool)
    .await
    .context("margin_snapshots insert failed")?;

    Ok(())
}

fn snapshot_from_row(row: &sqlx::postgres::PgRow) -> Result<MarginSnapshot> {
    use sodme_schemas::Paise;

    let source_str: String = row.try_get("source")?;
    let source = match source_str.as_str() {
        "broker" => MarginSource::Broker,
        _ => MarginSource::Internal,
    };
    let factors_json: serde_json::Value = row.try_get("applied_factors")?;
    let applied_factors: Vec<AppliedFactor> = serde_json::from_value(factors_json).context("deserialize applied_factors")?;
    let warnings_json: serde_json::Value = row.try_get("warnings")?;
    let warnings: Vec<String> = serde_json::from_value(warnings_json).context("deserialize warnings")?;

    Ok(MarginSnapshot {
        id: row.try_get("id")?,
        strategy_id: row.try_get("strategy_id")?,
        ts_utc: row.try_get("ts_utc")?,
        span: Paise::new(row.try_get::<i64, _>("span")?),
        exposure: Paise::new(row.try_get::<i64, _>("exposure")?),
        premium: Paise::new(row.try_get::<i64, _>("premium")?),
        additional: Paise::new(row.try_get::<i64, _>("additional")?),
        total: Paise::new(row.try_get::<i64, _>("total")?),
        applied_factors,
        available_margin: Paise::new(row.try_get::<i64, _>("available_margin")?),
        utilization_pct: row.try_get("utilization_pct")?,
        warnings,
        source,
    })
}

pub async fn fetch_latest(pool: &PgPool, strategy_id: Uuid) -> Result<Option<MarginSnapshot>> {
    let row = sqlx::query(
        r#"
        select id, strategy_id, ts_utc, span, exposure, premium, additional, total,
               applied_factors, available_margin, utilization_pct, warnings, source
        from margin_snapshots
        where strategy_id = $1
        order by ts_utc desc
        limit 1
        "#,
    )
    .bind(strategy_id)
    .fetch_optional(pool)
    .await
    .context("margin_snapshots fetch_latest failed")?;

    row.as_ref().map(snapshot_from_row).transpose()
}

pub async fn fetch_history(pool: &PgPool, strategy_id: Uuid, since: DateTime<Utc>) -> Result<Vec<MarginSnapshot>> {
    let rows = sqlx::query(
        r#"
        select id, strategy_id, ts_utc, span, exposure, premium, additional, total,
               applied_factors, available_margin, utilization_pct, warnings, source
        from margin_snapshots
        where strategy_id = $1 and ts_utc >= $2
        order by ts_utc asc
        "#,
    )
    .bind(strategy_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .context("margin_snapshots fetch_history failed")?;

    rows.iter().map(snapshot_from_row).collect()
}

/// Flags snapshots older than `before` as compressed. The actual rollup
/// (downsampling to one row per day) is the retention job's concern; this
/// only records which rows have passed the compression boundary.
pub async fn compress_snapshots_older_than(pool: &PgPool, before: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query(
        r#"
        update margin_snapshots
        set compressed = true
        where ts_utc < $1 and not compressed
        "#,
    )
    .bind(before)
    .execute(pool)
    .await
    .context("margin_snapshots compression sweep failed")?;

    Ok(result.rows_affected())
}

pub async fn insert_change_event(pool: &PgPool, event: &MarginChangeEvent) -> Result<()> {
    let severity = match event.severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
        Severity::Urgent => "urgent",
    };

    sqlx::query(
        r#"
        insert into margin_change_events (
            strategy_id, old_total, new_total, pct_change, reason, severity, action_taken, ts_utc
        ) values ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(event.strategy_id)
    .bind(event.old_total.raw())
    .bind(event.new_total.raw())
    .bind(event.pct_change)
    .bind(&event.reason)
    .bind(severity)
    .bind(&event.action_taken)
    .bind(event.ts_utc)
    .execute(pool)
    .await
    .context("margin_change_events insert failed")?;

    Ok(())
}

pub async fn upsert_nse_margin_cache(
    pool: &PgPool,
    instrument_token: i64,
    as_of_date: NaiveDate,
    span_pct: f64,
    exposure_pct: f64,
) -> Result<()> {
    sqlx::query(
        r#"
        insert into nse_margin_cache (instrument_token, as_of_date, span_pct, exposure_pct, fetched_at)
        values ($1, $2, $3, $4, now())
        on conflict (instrument_token, as_of_date) do update set
            span_pct = excluded.span_pct,
            exposure_pct = excluded.exposure_pct,
            fetched_at = now()
        "#,
    )
    .bind(instrument_token)
    .bind(as_of_date)
    .bind(span_pct)
    .bind(exposure_pct)
    .execute(pool)
    .await
    .context("nse_margin_cache upsert failed")?;

    Ok(())
}

pub async fn insert_settlement(pool: &PgPool, record: &SettlementRecord) -> Result<()> {
    sqlx::query(
        r#"
        insert into futures_settlement_history (
            instrument_token, settlement_date, previous_settlement, new_settlement, m2m_pnl
        ) values ($1, $2, $3, $4, $5)
        on conflict (instrument_token, settlement_date) do update set
            previous_settlement = excluded.previous_settlement,
            new_settlement = excluded.new_settlement,
            m2m_pnl = excluded.m2m_pnl
        "#,
    )
    .bind(record.instrument_token)
    .bind(record.date)
    .bind(record.previous_settlement.raw())
    .bind(record.new_settlement.raw())
    .bind(record.m2m_pnl.raw())
    .execute(pool)
    .await
    .context("futures_settlement_history insert failed")?;

    Ok(())
}

/// Opens a margin call record for the shortfall grace window. Returns the
/// generated row id.
pub async fn open_margin_call(
    pool: &PgPool,
    strategy_id: Uuid,
    shortfall: sodme_schemas::Paise,
    deadline: DateTime<Utc>,
    opened_at: DateTime<Utc>,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        insert into margin_calls (id, strategy_id, shortfall, deadline, opened_at, resolved_at)
        values ($1, $2, $3, $4, $5, null)
        "#,
    )
    .bind(id)
    .bind(strategy_id)
    .bind(shortfall.raw())
    .bind(deadline)
    .bind(opened_at)
    .execute(pool)
    .await
    .context("margin_calls insert failed")?;

    Ok(id)
}

pub async fn resolve_margin_call(pool: &PgPool, id: Uuid, resolved_at: DateTime<Utc>) -> Result<()> {
    sqlx::query("update margin_calls set resolved_at = $2 where id = $1")
        .bind(id)
        .bind(resolved_at)
        .execute(pool)
        .await
        .context("margin_calls resolve failed")?;

    Ok(())
}
