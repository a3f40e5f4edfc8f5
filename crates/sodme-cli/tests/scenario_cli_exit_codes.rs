//! CLI-level exit code contract: 0 ok, 2 config error, 3 broker unavailable,
//! 4 DB unavailable. Drives the actual `sodme` binary via `assert_cmd`,
//! matching the reference workspace's CLI test style.

use predicates::prelude::*;
use std::io::Write;

#[test]
fn paper_seed_succeeds_with_no_network_or_db() -> anyhow::Result<()> {
    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.args(["paper", "seed", "--available-margin-rupees", "5000000"]);
    cmd.assert().success().stdout(predicate::str::contains("available_margin_rupees=5000000"));
    Ok(())
}

#[test]
fn paper_seed_rejects_negative_margin_as_config_error() -> anyhow::Result<()> {
    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.args(["paper", "seed", "--available-margin-rupees", "-1"]);
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn config_hash_is_stable_across_key_order() -> anyhow::Result<()> {
    let mut a = tempfile::NamedTempFile::new()?;
    write!(a, "rate_limits:\n  orders_per_sec: 10.0\n  margin_calc_per_sec: 0.2\nbroker:\n  keys_env:\n    api_key: X\n")?;
    let mut b = tempfile::NamedTempFile::new()?;
    write!(b, "broker:\n  keys_env:\n    api_key: X\nrate_limits:\n  orders_per_sec: 10.0\n  margin_calc_per_sec: 0.2\n")?;

    let mut cmd_a = assert_cmd::Command::cargo_bin("sodme")?;
    let out_a = cmd_a.args(["config-hash", a.path().to_str().unwrap()]).assert().success();
    let stdout_a = String::from_utf8(out_a.get_output().stdout.clone())?;

    let mut cmd_b = assert_cmd::Command::cargo_bin("sodme")?;
    let out_b = cmd_b.args(["config-hash", b.path().to_str().unwrap()]).assert().success();
    let stdout_b = String::from_utf8(out_b.get_output().stdout.clone())?;

    let hash_line = |s: &str| s.lines().find(|l| l.starts_with("config_hash=")).unwrap().to_string();
    assert_eq!(hash_line(&stdout_a), hash_line(&stdout_b));
    Ok(())
}

#[test]
fn config_hash_missing_file_is_a_config_error() -> anyhow::Result<()> {
    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.args(["config-hash", "/nonexistent/path/does-not-exist.yaml"]);
    cmd.assert().failure().code(2);
    Ok(())
}

#[test]
fn broker_check_without_access_token_is_a_config_error() -> anyhow::Result<()> {
    let mut cfg = tempfile::NamedTempFile::new()?;
    write!(
        cfg,
        "broker:\n  keys_env:\n    api_key: SODME_TEST_NONEXISTENT_KEY\n    api_secret: SODME_TEST_NONEXISTENT_SECRET\n"
    )?;

    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.env_remove("SODME_BROKER_ACCESS_TOKEN")
        .args(["broker", "check", "--config", cfg.path().to_str().unwrap()]);
    cmd.assert().failure().code(2);
    Ok(())
}

/// DB-backed test, skipped if SODME_DATABASE_URL is not set.
#[tokio::test]
async fn db_status_reports_ok_against_a_migrated_database() -> anyhow::Result<()> {
    let url = match std::env::var(sodme_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: SODME_DATABASE_URL not set");
            return Ok(());
        }
    };
    let pool = sqlx::postgres::PgPoolOptions::new().max_connections(2).connect(&url).await?;
    sodme_db::migrate(&pool).await?;

    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.env(sodme_db::ENV_DB_URL, &url).args(["db", "status"]);
    cmd.assert().success().stdout(predicate::str::contains("db_ok=true"));
    Ok(())
}

#[test]
fn db_status_without_a_database_url_is_a_db_unavailable_error() -> anyhow::Result<()> {
    let mut cmd = assert_cmd::Command::cargo_bin("sodme")?;
    cmd.env_remove(sodme_db::ENV_DB_URL).args(["db", "status"]);
    cmd.assert().failure().code(4);
    Ok(())
}
