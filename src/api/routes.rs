use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::SampleStore;
use crate::types::{HistoryResponse, IngestResponse, LatestResponse, MetricsPoint, Sample};
use super::error::ApiError;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub device_id: Option<String>,
    pub limit: Option<u64>,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Smart Writing Stability Backend running" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "message": "Backend is working!" }))
}

pub async fn ingest<S: SampleStore + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Sample>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    // 请求体不合法时直接拒绝，不触碰缓存和数据库
    let Json(sample) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    let service = Arc::clone(&state.service);
    let metrics = tokio::task::spawn_blocking(move || service.ingest(sample)).await??;

    Ok(Json(IngestResponse::ok(metrics)))
}

pub async fn latest<S: SampleStore + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Query<LatestParams>, QueryRejection>,
) -> Result<Json<LatestResponse<MetricsPoint>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let device_id = params
        .device_id
        .unwrap_or_else(|| state.query.default_device_id.clone());

    let service = Arc::clone(&state.service);
    let point = tokio::task::spawn_blocking(move || service.latest(&device_id)).await??;

    Ok(Json(point.into()))
}

pub async fn history<S: SampleStore + 'static>(
    State(state): State<AppState<S>>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse<MetricsPoint>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let device_id = params
        .device_id
        .unwrap_or_else(|| state.query.default_device_id.clone());
    let limit = params.limit.unwrap_or(state.query.default_history_limit);

    let service = Arc::clone(&state.service);
    let data = tokio::task::spawn_blocking(move || service.history(&device_id, limit)).await??;

    Ok(Json(HistoryResponse { data }))
}
