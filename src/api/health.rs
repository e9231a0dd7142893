//! Health check endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness response
///
/// Every integration degrades instead of failing, so readiness is reported
/// but never turns into a non-200 status.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct ReadinessChecks {
    pub credentials: CheckResult,
    pub lead_sheet: CheckResult,
    pub speech: CheckResult,
}

/// Result of a single check
#[derive(Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl CheckResult {
    const fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    const fn unavailable(message: &'static str) -> Self {
        Self {
            status: "unavailable",
            message: Some(message),
        }
    }

    const fn from_flag(available: bool, message: &'static str) -> Self {
        if available {
            Self::ok()
        } else {
            Self::unavailable(message)
        }
    }
}

/// Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check: which integrations came up at startup
async fn ready(State(state): State<Arc<ApiState>>) -> Json<ReadinessResponse> {
    let checks = ReadinessChecks {
        credentials: CheckResult::from_flag(
            state.credentials_available,
            "service account not loaded",
        ),
        lead_sheet: CheckResult::from_flag(
            state.conversation.leads().remote_available(),
            "leads are written to the local file",
        ),
        speech: CheckResult::from_flag(state.speech.is_available(), "no speech API key"),
    };

    let all_ok = [&checks.credentials, &checks.lead_sheet, &checks.speech]
        .iter()
        .all(|c| c.status == "ok");

    Json(ReadinessResponse {
        status: if all_ok { "ok" } else { "degraded" },
        checks,
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build readiness router
pub fn ready_router(state: Arc<ApiState>) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
