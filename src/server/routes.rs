//! HTTP handlers for the analysis endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::state::AppState;
use crate::telemetry;
use crate::types::{AnalysisType, Envelope};
use crate::validation::{validate, validate_batch};
use crate::version::version_string;
use crate::{MarketscopeError, Result};

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// `POST /analysis`
pub async fn create_analysis(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_json(&body).and_then(|value| validate(&value)) {
        Ok(request) => request,
        Err(e) => return reject(&e),
    };
    respond(state.service.analyze(&request).await)
}

/// `POST /analysis/batch`
pub async fn create_batch_analysis(State(state): State<AppState>, body: Bytes) -> Response {
    let items = match parse_json(&body).and_then(|value| validate_batch(&value)) {
        Ok(items) => items,
        Err(e) => return reject(&e),
    };
    respond(state.service.analyze_batch(&items).await)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInfo {
    ok: bool,
    info: &'static str,
    model_requested: String,
    analysis_types: Vec<AnalysisTypeInfo>,
    version: String,
}

#[derive(Debug, Serialize)]
struct AnalysisTypeInfo {
    id: &'static str,
    label: &'static str,
}

/// `GET /analysis`: static description, no side effects.
pub async fn analysis_info(State(state): State<AppState>) -> Json<AnalysisInfo> {
    Json(AnalysisInfo {
        ok: true,
        info: "POST { product, objective, segment, analysisType } to generate analysis",
        model_requested: state.service.model().to_string(),
        analysis_types: AnalysisType::ALL
            .into_iter()
            .map(|t| AnalysisTypeInfo {
                id: t.as_str(),
                label: t.label(),
            })
            .collect(),
        version: version_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: String,
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: version_string(),
    })
}

fn parse_json(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| MarketscopeError::MalformedRequest(e.to_string()))
}

fn reject(error: &MarketscopeError) -> Response {
    let reason = match error {
        MarketscopeError::MalformedRequest(_) => "malformed",
        _ => "validation",
    };
    metrics::counter!(telemetry::REJECTIONS_TOTAL, "reason" => reason).increment(1);
    warn!(reason, error = %error, "request rejected");
    respond(Envelope::<()>::rejected(error))
}

fn respond<T: Serialize>(envelope: Envelope<T>) -> Response {
    let status =
        StatusCode::from_u16(envelope.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CACHE_CONTROL, NO_CACHE)], Json(envelope)).into_response()
}
