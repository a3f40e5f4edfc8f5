//! sodme-db
//!
//! Postgres persistence via `sqlx` raw queries, in the reference
//! workspace's style: free functions taking `&PgPool`, embedded
//! `sqlx::migrate!` migrations, `anyhow::Context` on every fallible call.
//! One module per entity group named in SPEC_FULL.md's persisted-state
//! layout.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod alerts;
pub mod execution;
pub mod housekeeping;
pub mod margin;
pub mod strategy_settings;

pub const ENV_DB_URL: &str = "SODME_DATABASE_URL";

/// Connect to Postgres using `SODME_DATABASE_URL`. Bounded pool per
/// SPEC_FULL.md §5's "bounded DB pool with acquisition timeout" note.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Test helper: connect then ensure migrations are applied.
pub async fn testkit_db_pool() -> Result<PgPool> {
    let pool = connect_from_env().await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence), mirroring the
/// reference workspace's CLI readiness check.
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='strategies'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus { ok, has_strategies_table: exists })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_strategies_table: bool,
}
