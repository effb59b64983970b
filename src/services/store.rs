use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::normalize::normalize_string;
use crate::models::{RequestStatus, StoredRequest};

/// Errors that can occur with request store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Request not found: {0}")]
    NotFound(String),

    #[error("Request {id} is already {status}")]
    InvalidTransition { id: String, status: RequestStatus },

    #[error("A pending request from {trainer_id} to {member_id} already exists")]
    DuplicatePending { trainer_id: String, member_id: String },

    #[error("Duplicate request id: {0}")]
    DuplicateId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// In-memory table of registration requests
///
/// Owns the request lifecycle: requests are created `pending` and move to
/// `approved` or `rejected` exactly once. The matcher only ever sees
/// [`snapshot`](Self::snapshot) copies.
#[derive(Debug, Default)]
pub struct RequestStore {
    requests: RwLock<HashMap<String, StoredRequest>>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending request from a trainer to a member
    pub async fn create(
        &self,
        trainer_id: &str,
        member_id: &str,
        message: Option<String>,
    ) -> Result<StoredRequest, StoreError> {
        let trainer_id = trainer_id.trim();
        let member_id = member_id.trim();

        if trainer_id.is_empty() {
            return Err(StoreError::InvalidInput("trainerId must not be empty".into()));
        }
        if member_id.is_empty() {
            return Err(StoreError::InvalidInput("memberId must not be empty".into()));
        }

        let now = chrono::Utc::now();
        let request = StoredRequest {
            id: uuid::Uuid::new_v4().to_string(),
            trainer_id: trainer_id.to_string(),
            member_id: member_id.to_string(),
            status: RequestStatus::Pending,
            message: message.filter(|m| !m.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        self.insert(request).await
    }

    /// Insert a fully-formed request, enforcing id uniqueness and the pending-duplicate rule
    pub async fn insert(&self, request: StoredRequest) -> Result<StoredRequest, StoreError> {
        let mut requests = self.requests.write().await;

        if requests.contains_key(&request.id) {
            return Err(StoreError::DuplicateId(request.id));
        }

        if request.status == RequestStatus::Pending {
            let member_key = normalize_string(&request.member_id);
            let duplicate = requests.values().any(|existing| {
                existing.status == RequestStatus::Pending
                    && existing.trainer_id == request.trainer_id
                    && normalize_string(&existing.member_id) == member_key
            });

            if duplicate {
                return Err(StoreError::DuplicatePending {
                    trainer_id: request.trainer_id,
                    member_id: request.member_id,
                });
            }
        }

        requests.insert(request.id.clone(), request.clone());

        tracing::info!(
            "Stored request {}: {} -> {} ({})",
            request.id,
            request.trainer_id,
            request.member_id,
            request.status
        );

        Ok(request)
    }

    pub async fn get(&self, id: &str) -> Option<StoredRequest> {
        self.requests.read().await.get(id).cloned()
    }

    /// All requests, oldest first
    pub async fn snapshot(&self) -> Vec<StoredRequest> {
        let requests = self.requests.read().await;
        let mut snapshot: Vec<StoredRequest> = requests.values().cloned().collect();
        sort_by_creation(&mut snapshot);
        snapshot
    }

    /// Requests created by one trainer, oldest first
    pub async fn list_for_trainer(&self, trainer_id: &str) -> Vec<StoredRequest> {
        let requests = self.requests.read().await;
        let mut listed: Vec<StoredRequest> = requests
            .values()
            .filter(|r| r.trainer_id == trainer_id)
            .cloned()
            .collect();
        sort_by_creation(&mut listed);
        listed
    }

    /// Approve or reject a pending request
    pub async fn transition(
        &self,
        id: &str,
        status: RequestStatus,
    ) -> Result<StoredRequest, StoreError> {
        let mut requests = self.requests.write().await;

        let request = requests
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if request.status.is_terminal() || !status.is_terminal() {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                status: request.status,
            });
        }

        request.status = status;
        request.updated_at = chrono::Utc::now();

        tracing::info!("Request {} is now {}", id, status);

        Ok(request.clone())
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.requests.read().await.is_empty()
    }
}

fn sort_by_creation(requests: &mut [StoredRequest]) {
    requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = RequestStore::new();

        let created = store
            .create("trainer_1", " member@gym.io ", Some("Welcome aboard".to_string()))
            .await
            .unwrap();

        assert_eq!(created.status, RequestStatus::Pending);
        assert_eq!(created.member_id, "member@gym.io");
        assert_eq!(created.created_at, created.updated_at);
        let fetched = store.get(&created.id).await;
        assert_eq!(fetched, Some(created));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_ids() {
        let store = RequestStore::new();

        assert!(matches!(
            store.create("  ", "member", None).await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.create("trainer", "", None).await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_pending_rejected() {
        let store = RequestStore::new();
        store.create("trainer_1", "Member@Gym.io", None).await.unwrap();

        let result = store.create("trainer_1", "member@gym.io", None).await;
        assert!(matches!(result, Err(StoreError::DuplicatePending { .. })));

        // A different trainer may still ask the same member
        assert!(store.create("trainer_2", "member@gym.io", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_new_request_allowed_after_rejection() {
        let store = RequestStore::new();
        let first = store.create("trainer_1", "user_1", None).await.unwrap();
        store.transition(&first.id, RequestStatus::Rejected).await.unwrap();

        assert!(store.create("trainer_1", "user_1", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_transition_once() {
        let store = RequestStore::new();
        let created = store.create("trainer_1", "user_1", None).await.unwrap();

        let approved = store.transition(&created.id, RequestStatus::Approved).await.unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert!(approved.updated_at >= created.updated_at);

        let again = store.transition(&created.id, RequestStatus::Rejected).await;
        assert_eq!(
            again,
            Err(StoreError::InvalidTransition {
                id: created.id.clone(),
                status: RequestStatus::Approved,
            })
        );
    }

    #[tokio::test]
    async fn test_transition_to_pending_rejected() {
        let store = RequestStore::new();
        let created = store.create("trainer_1", "user_1", None).await.unwrap();

        let result = store.transition(&created.id, RequestStatus::Pending).await;
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_transition_unknown_id() {
        let store = RequestStore::new();
        let result = store.transition("missing", RequestStatus::Approved).await;
        assert_eq!(result, Err(StoreError::NotFound("missing".to_string())));
    }

    #[tokio::test]
    async fn test_list_for_trainer() {
        let store = RequestStore::new();
        store.create("trainer_1", "a@gym.io", None).await.unwrap();
        store.create("trainer_2", "b@gym.io", None).await.unwrap();
        store.create("trainer_1", "c@gym.io", None).await.unwrap();

        let listed = store.list_for_trainer("trainer_1").await;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.trainer_id == "trainer_1"));
        assert_eq!(store.snapshot().await.len(), 3);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let store = RequestStore::new();
        let created = store.create("trainer_1", "user_1", None).await.unwrap();

        let mut copy = created.clone();
        copy.member_id = "user_2".to_string();

        assert_eq!(
            store.insert(copy).await,
            Err(StoreError::DuplicateId(created.id))
        );
    }
}
