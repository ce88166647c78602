use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::scenario::ScenarioId;
use super::service::{AllocationService, AllocationServiceError, RunRequest};
use super::store::{ScenarioStore, SessionId, StoreError};
use crate::data::export_inventory_csv;

/// Router exposing scenario runs, per-session history, and the base dataset.
pub fn allocation_router<S>(service: Arc<AllocationService<S>>) -> Router
where
    S: ScenarioStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sessions/:session_id/scenarios",
            get(history_handler::<S>).post(run_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/scenarios/:scenario_id",
            get(scenario_handler::<S>),
        )
        .route("/api/v1/counties", get(counties_handler::<S>))
        .route("/api/v1/resources", get(resources_handler::<S>))
        .route("/api/v1/resources/export", get(export_handler::<S>))
        .with_state(service)
}

pub(crate) async fn run_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<RunRequest>,
) -> Response
where
    S: ScenarioStore + 'static,
{
    match service.run(&SessionId(session_id), request) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: ScenarioStore + 'static,
{
    match service.history(&SessionId(session_id)) {
        Ok(scenarios) => (StatusCode::OK, Json(scenarios)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn scenario_handler<S>(
    State(service): State<Arc<AllocationService<S>>>,
    Path((session_id, scenario_id)): Path<(String, String)>,
) -> Response
where
    S: ScenarioStore + 'static,
{
    match service.get(&SessionId(session_id), &ScenarioId(scenario_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn counties_handler<S>(State(service): State<Arc<AllocationService<S>>>) -> Response
where
    S: ScenarioStore + 'static,
{
    Json(&service.dataset().counties).into_response()
}

async fn resources_handler<S>(State(service): State<Arc<AllocationService<S>>>) -> Response
where
    S: ScenarioStore + 'static,
{
    Json(&service.dataset().resources).into_response()
}

async fn export_handler<S>(State(service): State<Arc<AllocationService<S>>>) -> Response
where
    S: ScenarioStore + 'static,
{
    (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        export_inventory_csv(&service.dataset().resources),
    )
        .into_response()
}

fn error_response(err: AllocationServiceError) -> Response {
    let status = match &err {
        AllocationServiceError::Allocation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AllocationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AllocationServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
