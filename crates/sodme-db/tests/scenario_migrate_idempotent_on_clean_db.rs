/// DB-backed test, skipped if SODME_DATABASE_URL is not set.
#[tokio::test]
async fn migrate_idempotent_on_clean_db() -> anyhow::Result<()> {
    let url = match std::env::var(sodme_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: SODME_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new().max_connections(2).connect(&url).await?;

    sodme_db::migrate(&pool).await?;
    sodme_db::migrate(&pool).await?;

    let status = sodme_db::status(&pool).await?;
    assert!(status.ok);
    assert!(status.has_strategies_table);

    Ok(())
}
