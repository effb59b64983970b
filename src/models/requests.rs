use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::SearchCriteria;

/// Request to create a trainer-to-member registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestBody {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "trainer_id", rename = "trainerId")]
    pub trainer_id: String,
    #[validate(length(min = 1, max = 320))]
    #[serde(alias = "member_id", rename = "memberId")]
    pub member_id: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub message: Option<String>,
}

/// Request to resolve the caller's registration requests
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FindRequestsRequest {
    #[validate(length(max = 320))]
    #[serde(default, alias = "account_id", rename = "accountId")]
    pub account_id: Option<String>,
    #[validate(length(max = 320))]
    #[serde(default)]
    pub email: Option<String>,
}

impl From<FindRequestsRequest> for SearchCriteria {
    fn from(req: FindRequestsRequest) -> Self {
        SearchCriteria::new(req.account_id, req.email)
    }
}

/// Request to approve or reject a pending request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}
