use serde::{Deserialize, Serialize};
use crate::models::domain::{Confidence, MatchMethod, StoredRequest, TraceStep};

/// Response for the find requests endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindRequestsResponse {
    pub requests: Vec<StoredRequest>,
    pub method: MatchMethod,
    pub confidence: Confidence,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceStep>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub stored_requests: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Requests belonging to one trainer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerRequestsResponse {
    #[serde(rename = "trainerId")]
    pub trainer_id: String,
    pub requests: Vec<StoredRequest>,
    pub count: usize,
}
