// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{StoredRequest, RequestStatus, MemberRef, SearchCriteria, Confidence, MatchMethod, TraceStep};
pub use requests::{CreateRequestBody, FindRequestsRequest, UpdateStatusRequest};
pub use responses::{FindRequestsResponse, HealthResponse, ErrorResponse, TrainerRequestsResponse};
