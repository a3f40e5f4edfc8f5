//! Axum router and all HTTP handlers for sodme-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Handlers are `pub(crate)` so scenario tests can
//! compose the router directly.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use futures_util::Stream;
use uuid::Uuid;

use sodme_depth::{analyze, AnalyzeRequest};
use sodme_housekeeping::classify_orphan;
use sodme_margin::MarginFactorContext;
use sodme_risk::{RiskConfig, RiskEvaluation};
use sodme_schemas::Severity;
use sodme_strategy::StrategyStore;

use crate::api_types::{
    AlertsListResponse, AnalyzeExecutionRequest, ApiError, CalculateCostsRequest,
    CalculateMarginRequest, CalculateMarginResponse, CleanupActionReport,
    CleanupOrphanedOrdersResponse, HealthResponse, MarginHistoryQuery, OrphanedOrderReport,
    OrphanedOrdersRequest, OrphanedOrdersResponse, RespondToAlertRequest,
};
use crate::state::{AppState, GatewayCanceller, GatewayFlattener};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events/stream", get(events_stream))
        .route("/orders/analyze-execution", post(analyze_execution))
        .route("/orders/calculate-costs", post(calculate_costs))
        .route("/strategies/:id/calculate-margin", post(calculate_margin))
        .route("/strategies/:id/margin/current", get(margin_current))
        .route("/strategies/:id/margin/history", get(margin_history))
        .route("/strategies/:id/orphaned-orders", get(orphaned_orders))
        .route("/strategies/:id/cleanup-orphaned-orders", post(cleanup_orphaned_orders))
        .route("/strategies/:id/settings", put(update_settings).get(get_settings))
        .route("/alerts/:id/respond", post(respond_to_alert))
        .route("/alerts/:id/mark-read", put(mark_alert_read))
        .route("/users/:id/alerts", get(list_user_alerts))
        .with_state(state)
}

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { ok: true, service: st.build.service, version: st.build.version }))
}

// ---------------------------------------------------------------------------
// POST /orders/analyze-execution
// ---------------------------------------------------------------------------

pub(crate) async fn analyze_execution(
    State(st): State<Arc<AppState>>,
    Json(body): Json<AnalyzeExecutionRequest>,
) -> Response {
    let result = analyze(AnalyzeRequest {
        order_id: body.order_id,
        correlates_with: body.correlates_with,
        instrument_token: body.instrument_token,
        segment: body.segment,
        side: body.side,
        quantity: body.quantity,
        depth: body.depth.as_ref(),
        settings: &body.settings,
    });

    match result {
        Ok(analysis) => {
            if let Err(e) = sodme_db::execution::insert(&st.db, &analysis).await {
                tracing::warn!(error = %e, "failed to persist execution analysis");
            }
            (StatusCode::OK, Json(analysis)).into_response()
        }
        Err(err) => depth_error_response(err),
    }
}

fn depth_error_response(err: sodme_depth::DepthError) -> Response {
    let (status, kind) = match &err {
        sodme_depth::DepthError::ValidationError(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
        sodme_depth::DepthError::DepthUnavailableError { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "DepthUnavailableError")
        }
    };
    (status, Json(ApiError::new(kind, err.to_string()))).into_response()
}

// ---------------------------------------------------------------------------
// POST /orders/calculate-costs
// ---------------------------------------------------------------------------

pub(crate) async fn calculate_costs(
    State(st): State<Arc<AppState>>,
    Json(body): Json<CalculateCostsRequest>,
) -> Response {
    let rates = sodme_depth::CostRateTable::for_segment(body.segment);
    let breakdown = sodme_depth::calculate_costs(body.order_value, body.side, &rates);

    if let Some(order_id) = body.order_id {
        if let Err(e) = sodme_db::execution::insert_cost_breakdown(&st.db, order_id, &breakdown).await {
            tracing::warn!(error = %e, "failed to persist cost breakdown");
        }
    }

    (StatusCode::OK, Json(breakdown)).into_response()
}

// ---------------------------------------------------------------------------
// POST /strategies/{id}/calculate-margin
// ---------------------------------------------------------------------------

pub(crate) async fn calculate_margin(
    State(st): State<Arc<AppState>>,
    Path(strategy_id): Path<Uuid>,
    Json(body): Json<CalculateMarginRequest>,
) -> Response {
    let ctx = MarginFactorContext {
        vix: body.vix,
        price_move_pct: body.price_move_pct,
        regulatory_overrides: body.regulatory_overrides,
        effective_date: body.effective_date,
    };

    let snapshot = {
        let mut engine = st.lock_margin();
        engine.calculate_batch(strategy_id, &body.inputs, &ctx, body.available_margin, body.buffer_pct, body.source)
    };

    let snapshot = match snapshot {
        Ok(s) => s,
        Err(err) => return margin_error_response(err),
    };

    if let Err(e) = sodme_db::margin::insert_snapshot(&st.db, &snapshot).await {
        tracing::warn!(error = %e, "failed to persist margin snapshot");
    }

    let now = Utc::now();
    let shortfall = snapshot.total - body.available_margin;
    if shortfall > sodme_schemas::Paise::ZERO {
        let deadline = now + chrono::Duration::minutes(60);
        if let Err(e) = sodme_db::margin::open_margin_call(&st.db, strategy_id, shortfall, deadline, now).await {
            tracing::warn!(error = %e, "failed to open margin call");
        }
        publish_and_persist(
            &st,
            Some(strategy_id),
            Severity::Urgent,
            "margin shortfall",
            format!("strategy {strategy_id} is short {shortfall:?} of required margin"),
            sodme_schemas::AlertPayload::MarginShortfall { strategy_id, shortfall, deadline },
            vec!["deposit_funds".to_string(), "reduce_position".to_string()],
            now,
        )
        .await;
    }

    let risk_level = match body.risk {
        Some(risk) => {
            let decision = {
                let mut risk_engine = st.lock_risk();
                let mut gateway = st.lock_gateway();
                let mut flattener = GatewayFlattener { gateway: &mut gateway, now };
                risk_engine.evaluate(
                    strategy_id,
                    RiskEvaluation {
                        utilization_pct: snapshot.utilization_pct,
                        loss_pct: risk.loss_pct,
                        max_loss_pct: risk.max_loss_pct,
                        auto_square_off_on_loss: risk.auto_square_off_on_loss,
                        net_greeks: risk.net_greeks,
                    },
                    &RiskConfig::sane_defaults(),
                    &mut flattener,
                    now,
                )
            };
            if decision.level >= sodme_risk::RiskLevel::L3 {
                publish_and_persist(
                    &st,
                    Some(strategy_id),
                    Severity::Warning,
                    "risk level breach",
                    decision.reasons.join("; "),
                    sodme_schemas::AlertPayload::RiskBreach {
                        strategy_id,
                        level: decision.level.as_str().to_string(),
                    },
                    vec![],
                    now,
                )
                .await;
            }
            Some(decision.level.as_str())
        }
        None => None,
    };

    (StatusCode::OK, Json(CalculateMarginResponse { snapshot, risk_level })).into_response()
}

fn margin_error_response(err: sodme_margin::MarginError) -> Response {
    let (status, kind) = match &err {
        sodme_margin::MarginError::MarginShortfallError { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "MarginShortfallError")
        }
        sodme_margin::MarginError::MarginIncreasedError { .. } => (StatusCode::OK, "MarginIncreasedError"),
        sodme_margin::MarginError::CacheMissError { .. } => (StatusCode::SERVICE_UNAVAILABLE, "CacheMissError"),
    };
    (status, Json(ApiError::new(kind, err.to_string()))).into_response()
}

// ---------------------------------------------------------------------------
// GET /strategies/{id}/margin/current, /margin/history
// ---------------------------------------------------------------------------

pub(crate) async fn margin_current(State(st): State<Arc<AppState>>, Path(strategy_id): Path<Uuid>) -> Response {
    match sodme_db::margin::fetch_latest(&st.db, strategy_id).await {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(ApiError::new("NotFound", "no margin snapshot on record"))).into_response(),
        Err(e) => db_error_response(e),
    }
}

pub(crate) async fn margin_history(
    State(st): State<Arc<AppState>>,
    Path(strategy_id): Path<Uuid>,
    Query(query): Query<MarginHistoryQuery>,
) -> Response {
    let days = query.days.unwrap_or(30);
    let since = Utc::now() - chrono::Duration::days(days);
    match sodme_db::margin::fetch_history(&st.db, strategy_id, since).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => db_error_response(e),
    }
}

fn db_error_response(err: anyhow::Error) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, Json(ApiError::new("PersistenceError", err.to_string()))).into_response()
}

/// Publishes an alert to the live bus (SSE fan-out + urgent side channel)
/// and durably persists it to `user_alerts`, so `GET /users/{id}/alerts`
/// and the `respond`/`mark-read` endpoints see the same alert the bus just
/// fanned out.
#[allow(clippy::too_many_arguments)]
async fn publish_and_persist(
    st: &AppState,
    strategy_id: Option<Uuid>,
    severity: Severity,
    title: impl Into<String>,
    body: impl Into<String>,
    payload: sodme_schemas::AlertPayload,
    proposed_actions: Vec<String>,
    now: chrono::DateTime<Utc>,
) {
    match st.alerts.publish_event(strategy_id, severity, title, body, payload, proposed_actions, now).await {
        Ok(alert) => {
            if let Err(e) = sodme_db::alerts::insert(&st.db, &alert).await {
                tracing::warn!(error = %e, "failed to persist alert");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to publish alert"),
    }
}

// ---------------------------------------------------------------------------
// orphaned-orders
// ---------------------------------------------------------------------------

pub(crate) async fn orphaned_orders(
    State(st): State<Arc<AppState>>,
    Path(strategy_id): Path<Uuid>,
    Json(body): Json<OrphanedOrdersRequest>,
) -> Response {
    let settings = match resolve_settings(&st, strategy_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let orphaned: Vec<OrphanedOrderReport> = body
        .orders
        .iter()
        .filter_map(|order| classify_orphan(order, &body.positions).map(|reason| OrphanedOrderReport {
            order_id: order.id,
            reason: format!("{reason:?}"),
        }))
        .collect();
    let _ = settings;
    (StatusCode::OK, Json(OrphanedOrdersResponse { orphaned })).into_response()
}

pub(crate) async fn cleanup_orphaned_orders(
    State(st): State<Arc<AppState>>,
    Path(strategy_id): Path<Uuid>,
    Json(body): Json<OrphanedOrdersRequest>,
) -> Response {
    let settings = match resolve_settings(&st, strategy_id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let now = Utc::now();
    let today = now.date_naive();

    // Run the synchronous engine pass first and drop both locks before any
    // `.await` — `std::sync::MutexGuard` cannot be held across an await point.
    let outcomes: Vec<(Uuid, sodme_housekeeping::HousekeepingOutcome)> = {
        let mut housekeeping = st.lock_housekeeping();
        let mut gateway = st.lock_gateway();
        body.orders
            .iter()
            .filter_map(|order| {
                let mut canceller = GatewayCanceller { gateway: &mut gateway, now };
                housekeeping
                    .process_order(order, &body.positions, &settings, &mut canceller, today, now)
                    .map(|outcome| (order.id, outcome))
            })
            .collect()
    };

    let mut actions = Vec::with_capacity(outcomes.len());
    for (order_id, outcome) in outcomes {
        if let Err(e) = sodme_db::housekeeping::insert(&st.db, &outcome.log).await {
            tracing::warn!(error = %e, "failed to persist housekeeping event");
        }
        actions.push(CleanupActionReport {
            order_id,
            reason: outcome.alert_reason.clone(),
            action: format!("{:?}", outcome.log.action),
        });
        publish_and_persist(
            &st,
            Some(strategy_id),
            outcome.alert_severity,
            "orphaned order",
            format!("order {} flagged orphan: {}", order_id, outcome.alert_reason),
            sodme_schemas::AlertPayload::OrphanedOrder {
                order_id,
                reason: outcome.alert_reason,
                was_auto: outcome.log.was_auto,
            },
            vec![],
            now,
        )
        .await;
    }

    (StatusCode::OK, Json(CleanupOrphanedOrdersResponse { actions })).into_response()
}

async fn resolve_settings(st: &AppState, strategy_id: Uuid) -> Result<sodme_schemas::StrategySettings, Response> {
    if let Some(settings) = st.lock_strategies().settings(strategy_id) {
        return Ok(settings);
    }
    match sodme_db::strategy_settings::fetch(&st.db, strategy_id).await {
        Ok(Some(settings)) => Ok(settings),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new("NotFound", format!("strategy {strategy_id} has no settings on record"))),
        )
            .into_response()),
        Err(e) => Err(db_error_response(e)),
    }
}

// ---------------------------------------------------------------------------
// strategy settings
// ---------------------------------------------------------------------------

pub(crate) async fn get_settings(State(st): State<Arc<AppState>>, Path(strategy_id): Path<Uuid>) -> Response {
    match resolve_settings(&st, strategy_id).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(resp) => resp,
    }
}

pub(crate) async fn update_settings(
    State(st): State<Arc<AppState>>,
    Path(strategy_id): Path<Uuid>,
    Json(settings): Json<sodme_schemas::StrategySettings>,
) -> Response {
    if let Err(e) = settings.validate() {
        return (StatusCode::BAD_REQUEST, Json(ApiError::new("ValidationError", e))).into_response();
    }

    {
        let mut store = st.lock_strategies();
        if store.settings(strategy_id).is_some() {
            if let Err(e) = store.update_settings(strategy_id, settings.clone()) {
                return strategy_error_response(e);
            }
        }
    }

    if let Err(e) = sodme_db::strategy_settings::upsert(&st.db, strategy_id, &settings).await {
        return db_error_response(e);
    }

    (StatusCode::OK, Json(settings)).into_response()
}

fn strategy_error_response(err: sodme_strategy::StrategyError) -> Response {
    let status = match &err {
        sodme_strategy::StrategyError::NotFound(_) => StatusCode::NOT_FOUND,
        sodme_strategy::StrategyError::ValidationError(_) => StatusCode::BAD_REQUEST,
        sodme_strategy::StrategyError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
    };
    (status, Json(ApiError::new("ValidationError", err.to_string()))).into_response()
}

// ---------------------------------------------------------------------------
// alerts
// ---------------------------------------------------------------------------

pub(crate) async fn respond_to_alert(
    State(st): State<Arc<AppState>>,
    Path(alert_id): Path<Uuid>,
    Json(body): Json<RespondToAlertRequest>,
) -> Response {
    let response = sodme_schemas::AlertResponse { action: body.action, responded_at: Utc::now() };
    if let Err(e) = sodme_db::alerts::record_response(&st.db, alert_id, &response).await {
        return db_error_response(e);
    }
    match sodme_db::alerts::fetch(&st.db, alert_id).await {
        Ok(Some(alert)) => (StatusCode::OK, Json(alert)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Json(ApiError::new("NotFound", "alert not found"))).into_response(),
        Err(e) => db_error_response(e),
    }
}

pub(crate) async fn mark_alert_read(State(st): State<Arc<AppState>>, Path(alert_id): Path<Uuid>) -> Response {
    match sodme_db::alerts::mark_read(&st.db, alert_id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(e) => db_error_response(e),
    }
}

pub(crate) async fn list_user_alerts(State(st): State<Arc<AppState>>, Path(owner_account): Path<String>) -> Response {
    let strategy_ids: Vec<Uuid> = st.lock_strategies().list_by_account(&owner_account).into_iter().map(|s| s.id).collect();
    let alert_ids = match sodme_db::alerts::list_for_account(&st.db, &strategy_ids).await {
        Ok(ids) => ids,
        Err(e) => return db_error_response(e),
    };

    let mut alerts = Vec::with_capacity(alert_ids.len());
    for id in alert_ids {
        match sodme_db::alerts::fetch(&st.db, id).await {
            Ok(Some(alert)) => alerts.push(alert),
            Ok(None) => {}
            Err(e) => return db_error_response(e),
        }
    }

    (StatusCode::OK, Json(AlertsListResponse { alerts })).into_response()
}

// ---------------------------------------------------------------------------
// GET /events/stream (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn events_stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert("Cache-Control", axum::http::HeaderValue::from_static("no-cache"));
    headers.insert("Connection", axum::http::HeaderValue::from_static("keep-alive"));

    let queue = st.alerts.subscribe();
    let events = alert_queue_to_sse(queue);
    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn alert_queue_to_sse(
    queue: Arc<sodme_alerts::SubscriberQueue>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures_util::stream::unfold(queue, |queue| async move {
        let alert = queue.pop().await;
        let event_name = alert.payload.type_name();
        let data = serde_json::json!({
            "type": event_name,
            "severity": alert.severity,
            "payload": alert.payload,
            "timestamp": alert.created_at,
        });
        let event = Event::default().event(event_name).data(data.to_string());
        Some((Ok(event), queue))
    })
}
