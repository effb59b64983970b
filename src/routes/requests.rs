use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{MatchTelemetry, RequestMatcher};
use crate::models::{
    Confidence, CreateRequestBody, ErrorResponse, FindRequestsRequest, FindRequestsResponse,
    HealthResponse, RequestStatus, SearchCriteria, TrainerRequestsResponse, UpdateStatusRequest,
};
use crate::services::{RequestStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RequestStore>,
    pub telemetry: Arc<MatchTelemetry>,
    pub matcher: RequestMatcher,
    pub matching: MatchingSettings,
}

impl AppState {
    pub fn new(matching: MatchingSettings) -> Self {
        Self {
            store: Arc::new(RequestStore::new()),
            telemetry: Arc::new(MatchTelemetry::new()),
            matcher: RequestMatcher::new(),
            matching,
        }
    }
}

/// Configure all request-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/requests", web::post().to(create_request))
        .route("/requests/find", web::post().to(find_requests))
        .route("/requests/trainer/{trainer_id}", web::get().to(list_trainer_requests))
        .route("/requests/{id}/status", web::post().to(update_status))
        .route("/stats/matching", web::get().to(matching_stats))
        .route("/stats/matching/reset", web::post().to(reset_matching_stats));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn store_error_response(err: StoreError) -> HttpResponse {
    use actix_web::http::StatusCode;

    match &err {
        StoreError::NotFound(_) => error_response(StatusCode::NOT_FOUND, "Request not found", err.to_string()),
        StoreError::InvalidTransition { .. } => {
            error_response(StatusCode::CONFLICT, "Invalid status transition", err.to_string())
        }
        StoreError::DuplicatePending { .. } | StoreError::DuplicateId(_) => {
            error_response(StatusCode::CONFLICT, "Duplicate request", err.to_string())
        }
        StoreError::InvalidInput(_) => {
            error_response(StatusCode::BAD_REQUEST, "Validation failed", err.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        stored_requests: state.store.len().await,
    })
}

/// Create request endpoint
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// {
///   "trainerId": "string",
///   "memberId": "account id or email",
///   "message": "string"
/// }
/// ```
async fn create_request(
    state: web::Data<AppState>,
    req: web::Json<CreateRequestBody>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_request: field_errors={:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let body = req.into_inner();
    match state.store.create(&body.trainer_id, &body.member_id, body.message).await {
        Ok(request) => HttpResponse::Created().json(request),
        Err(e) => {
            tracing::warn!("Failed to create request for trainer {}: {}", body.trainer_id, e);
            store_error_response(e)
        }
    }
}

/// Find the caller's requests
///
/// POST /api/v1/requests/find
///
/// Request body:
/// ```json
/// {
///   "accountId": "string",
///   "email": "string"
/// }
/// ```
async fn find_requests(
    state: web::Data<AppState>,
    req: web::Json<FindRequestsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let criteria = SearchCriteria::from(req.into_inner());
    if criteria.is_empty() {
        tracing::debug!("find_requests called without accountId or email");
    }

    let snapshot = state.store.snapshot().await;
    let result = state
        .matcher
        .find_requests_recorded(&criteria, &snapshot, &state.telemetry);

    if result.is_match() && result.confidence < Confidence::High {
        tracing::warn!(
            "Low-certainty match for accountId={:?}, email={:?}: method={}, confidence={}, {} requests",
            criteria.account_id(),
            criteria.email(),
            result.method,
            result.confidence,
            result.requests.len()
        );
    }

    let withheld = result.is_match() && result.confidence < state.matching.min_confidence;
    if withheld {
        tracing::info!(
            "Withholding {} requests matched at {} confidence (minimum {})",
            result.requests.len(),
            result.confidence,
            state.matching.min_confidence
        );
    }

    let response = FindRequestsResponse {
        requests: if withheld { Vec::new() } else { result.requests },
        method: result.method,
        confidence: result.confidence,
        total_candidates: result.total_candidates,
        trace: state.matching.include_trace.then_some(result.trace),
    };

    tracing::info!(
        "Returning {} requests via {} (from {} candidates)",
        response.requests.len(),
        response.method,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// List a trainer's requests
///
/// GET /api/v1/requests/trainer/{trainerId}
async fn list_trainer_requests(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let trainer_id = path.into_inner();
    let requests = state.store.list_for_trainer(&trainer_id).await;

    HttpResponse::Ok().json(TrainerRequestsResponse {
        count: requests.len(),
        trainer_id,
        requests,
    })
}

/// Approve or reject a request
///
/// POST /api/v1/requests/{id}/status
///
/// Request body:
/// ```json
/// { "status": "approved|rejected" }
/// ```
async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let status = match req.status.trim().to_lowercase().as_str() {
        "approved" => RequestStatus::Approved,
        "rejected" => RequestStatus::Rejected,
        _ => {
            return error_response(
                actix_web::http::StatusCode::BAD_REQUEST,
                "Invalid status",
                "Status must be one of: approved, rejected".to_string(),
            );
        }
    };

    let id = path.into_inner();
    match state.store.transition(&id, status).await {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(e) => {
            tracing::warn!("Failed to set request {} to {}: {}", id, status, e);
            store_error_response(e)
        }
    }
}

/// Matching telemetry snapshot
///
/// GET /api/v1/stats/matching
async fn matching_stats(state: web::Data<AppState>) -> impl Responder {
    let stats = state.telemetry.stats();
    HttpResponse::Ok().json(serde_json::json!({
        "stats": stats,
        "successRate": stats.success_rate(),
    }))
}

/// POST /api/v1/stats/matching/reset
async fn reset_matching_stats(state: web::Data<AppState>) -> impl Responder {
    state.telemetry.reset();
    tracing::info!("Matching telemetry reset");
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_store_error_status_codes() {
        let cases = [
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                StoreError::InvalidTransition { id: "x".into(), status: RequestStatus::Approved },
                StatusCode::CONFLICT,
            ),
            (StoreError::DuplicateId("x".into()), StatusCode::CONFLICT),
            (StoreError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(store_error_response(err).status(), expected);
        }
    }
}
