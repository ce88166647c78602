use crate::infra::{deserialize_optional_date, AppState};
use aidvantage::alerts::{
    AlertDraft, AlertFeed, AlertFeedError, AlertId, AlertPredictor, DashboardOverview,
    DraftChannel, PredictiveAlert,
};
use aidvantage::allocation::{allocation_router, AllocationService, ScenarioStore, SessionId};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictRequest {
    /// Fixed seed for reproducible predictions; entropy otherwise.
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictResponse {
    pub(crate) generated_for: NaiveDate,
    pub(crate) active_count: usize,
    pub(crate) alerts: Vec<PredictiveAlert>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DraftRequest {
    pub(crate) alert: PredictiveAlert,
    pub(crate) channel: DraftChannel,
}

#[derive(Debug, Serialize)]
pub(crate) struct DraftResponse {
    pub(crate) county_name: Option<String>,
    pub(crate) frame_count: usize,
    pub(crate) frame_delay_ms: u64,
    #[serde(flatten)]
    pub(crate) draft: AlertDraft,
}

pub(crate) fn with_allocation_routes<S>(service: Arc<AllocationService<S>>) -> axum::Router
where
    S: ScenarioStore + 'static,
{
    allocation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/alerts/predict",
            axum::routing::post(predict_endpoint),
        )
        .route("/api/v1/alerts/draft", axum::routing::post(draft_endpoint))
        .route(
            "/api/v1/sessions/:session_id/alerts",
            axum::routing::get(alert_feed_endpoint),
        )
        .route(
            "/api/v1/sessions/:session_id/alerts/predict",
            axum::routing::post(session_predict_endpoint),
        )
        .route(
            "/api/v1/sessions/:session_id/alerts/:alert_id",
            axum::routing::delete(acknowledge_endpoint),
        )
        .route(
            "/api/v1/sessions/:session_id/overview",
            axum::routing::get(overview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Preview only: the predictions are returned but not added to any feed.
pub(crate) async fn predict_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PredictRequest>,
) -> Json<PredictResponse> {
    Json(predict(&state, payload))
}

pub(crate) async fn session_predict_endpoint(
    Extension(state): Extension<AppState>,
    Path(session_id): Path<String>,
    Json(payload): Json<PredictRequest>,
) -> Response {
    let session = SessionId(session_id);
    let response = predict(&state, payload);
    match state.alerts.extend(&session, response.alerts.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(err) => feed_error_response(err),
    }
}

fn predict(state: &AppState, request: PredictRequest) -> PredictResponse {
    let PredictRequest { seed, today } = request;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let alerts = AlertPredictor::default().predict(&state.dataset.counties, today, &mut rng);
    let active_count = alerts.iter().filter(|alert| alert.is_active()).count();
    info!(?seed, alerts = alerts.len(), active_count, "predictive alerts generated");

    PredictResponse {
        generated_for: today,
        active_count,
        alerts,
    }
}

pub(crate) async fn alert_feed_endpoint(
    Extension(state): Extension<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.alerts.list(&SessionId(session_id)) {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(err) => feed_error_response(err),
    }
}

pub(crate) async fn acknowledge_endpoint(
    Extension(state): Extension<AppState>,
    Path((session_id, alert_id)): Path<(String, String)>,
) -> Response {
    let session = SessionId(session_id);
    match state.alerts.acknowledge(&session, &AlertId(alert_id)) {
        Ok(alert) => {
            info!(%session, alert = %alert.id.0, "alert acknowledged");
            (StatusCode::OK, Json(alert)).into_response()
        }
        Err(err) => feed_error_response(err),
    }
}

pub(crate) async fn overview_endpoint(
    Extension(state): Extension<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.alerts.list(&SessionId(session_id)) {
        Ok(alerts) => {
            let overview = DashboardOverview::compute(
                &state.dataset.counties,
                &state.dataset.resources,
                &alerts,
            );
            (StatusCode::OK, Json(overview)).into_response()
        }
        Err(err) => feed_error_response(err),
    }
}

fn feed_error_response(err: AlertFeedError) -> Response {
    let status = match &err {
        AlertFeedError::NotFound => StatusCode::NOT_FOUND,
        AlertFeedError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn draft_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DraftRequest>,
) -> Json<DraftResponse> {
    let DraftRequest { alert, channel } = payload;
    let county_name = state.dataset.county_name(&alert.county_id).map(str::to_string);
    let draft = AlertDraft::render(channel, &alert, county_name.as_deref());

    Json(DraftResponse {
        county_name,
        frame_count: draft.frames().len(),
        frame_delay_ms: channel.frame_delay().as_millis() as u64,
        draft,
    })
}
