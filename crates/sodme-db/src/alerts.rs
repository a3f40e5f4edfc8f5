use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use sodme_schemas::{Alert, AlertPayload, AlertResponse, AlertResponseAction, Severity};

fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Critical => "critical",
        Severity::Urgent => "urgent",
    }
}

fn response_action_str(action: AlertResponseAction) -> &'static str {
    match action {
        AlertResponseAction::Acknowledge => "acknowledge",
        AlertResponseAction::Override => "override",
        AlertResponseAction::Dismiss => "dismiss",
    }
}

pub async fn insert(pool: &PgPool, alert: &Alert) -> Result<()> {
    let payload = serde_json::to_value(&alert.payload).context("serialize alert payload")?;
    let proposed_actions = serde_json::to_value(&alert.proposed_actions).context("serialize proposed_actions")?;

    sqlx::query(
        r#"
        insert into user_alerts (
            id, strategy_id, severity, title, body, payload, proposed_actions,
            created_at, expires_at, response_action, responded_at, read
        ) values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(alert.id)
    .bind(alert.strategy_id)
    .bind(severity_str(alert.severity))
    .bind(&alert.title)
    .bind(&alert.body)
    .bind(payload)
    .bind(proposed_actions)
    .bind(alert.created_at)
    .bind(alert.expires_at)
    .bind(alert.response.as_ref().map(|r| response_action_str(r.action)))
    .bind(alert.response.as_ref().map(|r| r.responded_at))
    .bind(alert.read)
    .execute(pool)
    .await
    .context("user_alerts insert failed")?;

    Ok(())
}

pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("update user_alerts set read = true where id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("user_alerts mark_read failed")?;
    Ok(())
}

pub async fn record_response(pool: &PgPool, id: Uuid, response: &AlertResponse) -> Result<()> {
    sqlx::query(
        "update user_alerts set response_action = $2, responded_at = $3 where id = $1",
    )
    .bind(id)
    .bind(response_action_str(response.action))
    .bind(response.responded_at)
    .execute(pool)
    .await
    .context("user_alerts record_response failed")?;

    Ok(())
}

pub async fn list_for_account(pool: &PgPool, strategy_ids: &[Uuid]) -> Result<Vec<Uuid>> {
    let rows = sqlx::query(
        "select id from user_alerts where strategy_id = any($1) order by created_at desc",
    )
    .bind(strategy_ids)
    .fetch_all(pool)
    .await
    .context("user_alerts list_for_account failed")?;

    rows.iter().map(|r| r.try_get::<Uuid, _>("id").map_err(Into::into)).collect()
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Alert>> {
    let row = sqlx::query(
        r#"
        select id, strategy_id, severity, title, body, payload, proposed_actions,
               created_at, expires_at, response_action, responded_at, read
        from user_alerts
        where id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("user_alerts fetch failed")?;

    let Some(row) = row else { return Ok(None) };

    let severity_raw: String = row.try_get("severity")?;
    let severity = match severity_raw.as_str() {
        "warning" => Severity::Warning,
        "critical" => Severity::Critical,
        "urgent" => Severity::Urgent,
        _ => Severity::Info,
    };

    let payload_json: serde_json::Value = row.try_get("payload")?;
    let payload: AlertPayload = serde_json::from_value(payload_json).context("deserialize alert payload")?;
    let actions_json: serde_json::Value = row.try_get("proposed_actions")?;
    let proposed_actions: Vec<String> = serde_json::from_value(actions_json).context("deserialize proposed_actions")?;

    let response_action: Option<String> = row.try_get("response_action")?;
    let responded_at: Option<chrono::DateTime<chrono::Utc>> = row.try_get("responded_at")?;
    let response = match (response_action, responded_at) {
        (Some(action), Some(responded_at)) => Some(AlertResponse {
            action: match action.as_str() {
                "override" => AlertResponseAction::Override,
                "dismiss" => AlertResponseAction::Dismiss,
                _ => AlertResponseAction::Acknowledge,
            },
            responded_at,
        }),
        _ => None,
    };

    Ok(Some(Alert {
        id: row.try_get("id")?,
        strategy_id: row.try_get("strategy_id")?,
        severity,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        payload,
        proposed_actions,
        created_at: row.try_get("created_at")?,
        expires_at: row.try_get("expires_at")?,
        response,
        read: row.try_get("read")?,
    }))
}
