//! HTTP API handlers.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{Calculation, Calculator, EngineProfile, Outcome};
use crate::error::ValidationError;
use crate::metrics;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Calculator bound to the configured profile.
    pub calculator: Calculator,
    /// Prometheus handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(profile: EngineProfile) -> Self {
        Self {
            calculator: Calculator::new(profile),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineProfile::default())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Calculation request, field names as in the form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Total amount to split.
    #[serde(default)]
    pub total_investment: Decimal,
    /// Outcomes in display order.
    #[serde(default)]
    pub odds: Vec<Outcome>,
}

/// One field-level validation issue.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    /// Form field path, e.g. `odds.1.tax`.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&ValidationError> for FieldIssue {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field(),
            message: err.to_string(),
        }
    }
}

/// Calculation response.
#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    /// Whether the input passed validation.
    pub valid: bool,
    /// Validation issues, computed alongside the result.
    pub errors: Vec<FieldIssue>,
    /// Calculation result, absent on a numeric domain error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation: Option<Calculation>,
    /// Numeric domain error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Profile handler - returns the active engine profile.
pub async fn profile(State(state): State<AppState>) -> impl IntoResponse {
    Json(*state.calculator.profile())
}

/// Calculate handler - validates and recomputes in one pass.
///
/// Validation issues do not block the calculation, so a caller editing the
/// inputs live sees both. Only a numeric domain error withholds the result.
pub async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> impl IntoResponse {
    let start = Instant::now();

    let issues = state
        .calculator
        .validate(request.total_investment, &request.odds);
    if !issues.is_empty() {
        metrics::inc_validation_failures();
        debug!(issues = issues.len(), "Request has validation issues");
    }
    let errors: Vec<FieldIssue> = issues.iter().map(FieldIssue::from).collect();
    let valid = errors.is_empty();

    let (status, response) = match state
        .calculator
        .calculate(request.total_investment, &request.odds)
    {
        Ok(calculation) => (
            StatusCode::OK,
            CalculateResponse {
                valid,
                errors,
                calculation: Some(calculation),
                error: None,
            },
        ),
        Err(e) => {
            warn!("Calculation rejected: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                CalculateResponse {
                    valid,
                    errors,
                    calculation: None,
                    error: Some(e.to_string()),
                },
            )
        }
    };

    metrics::record_http_latency(start, "/api/v1/calculate");
    (status, Json(response))
}

/// Metrics handler - Prometheus text exposition, empty without a recorder.
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state
        .prometheus
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}
