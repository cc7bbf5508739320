//! Neighbour help requests.
//!
//! Requests move `pending → assigned → confirmed` through explicit calls.
//! Nothing here checks that the caller of [`RequestStore::assign`] or
//! [`RequestStore::confirm`] is the elder or the assignee, and rewards can be
//! claimed more than once for the same request.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::AuthError;
use crate::auth::credentials::CredentialStore;
use crate::geo::{HELPER_RADIUS_METERS, distance_meters};
use crate::models::geo::GeoPoint;
use crate::models::help::{HelpRequest, RequestStatus};
use crate::store::{HelpRequestStore, StoreError};
use crate::uuid::help_request_id;

/// Reward credited to a helper per claimed request.
pub const REWARD_PER_REQUEST: i64 = 10;

/// Transcript used when a request carries no audio or its transcription
/// failed.
pub const DEFAULT_TRANSCRIPT: &str = "Audio help request from elderly person";

/// Help request errors.
#[derive(Debug, Error)]
pub enum HelpError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} request {id} in its current state")]
    InvalidTransition { id: String, action: &'static str },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<StoreError> for HelpError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => HelpError::NotFound(what),
            other => HelpError::Store(other),
        }
    }
}

/// Help request lifecycle over a document store.
///
/// `helpers` is the neighbourhood credential store; it supplies helper
/// locations and holds reward balances.
#[derive(Clone)]
pub struct RequestStore {
    requests: Arc<dyn HelpRequestStore>,
    helpers: CredentialStore,
}

impl RequestStore {
    pub fn new(requests: Arc<dyn HelpRequestStore>, helpers: CredentialStore) -> Self {
        Self { requests, helpers }
    }

    /// Record a new pending request at the elder's current location.
    ///
    /// A blank `transcript` is replaced by [`DEFAULT_TRANSCRIPT`].
    pub async fn create(
        &self,
        elder_id: &str,
        location: GeoPoint,
        transcript: &str,
        audio_url: Option<String>,
    ) -> Result<HelpRequest, HelpError> {
        let elder_id = elder_id.trim();
        if elder_id.is_empty() {
            return Err(HelpError::Validation("elderId required".into()));
        }
        if !location.is_valid() {
            return Err(HelpError::Validation("location out of range".into()));
        }

        let now = Utc::now();
        let transcript = match transcript.trim() {
            "" => DEFAULT_TRANSCRIPT.to_string(),
            t => t.to_string(),
        };
        let request = HelpRequest {
            id: help_request_id(elder_id),
            elder_id: elder_id.to_string(),
            elder_location: location,
            title: format!("Help Request - {}", now.format("%H:%M")),
            audio_url: audio_url.filter(|u| !u.trim().is_empty()),
            transcript,
            status: RequestStatus::Pending,
            helper_id: None,
            created_at: now,
        };

        let created = self.requests.insert_request(request).await?;
        info!(id = %created.id, elder_id = %created.elder_id, "help request created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<HelpRequest, HelpError> {
        self.requests
            .get_request(id)
            .await?
            .ok_or_else(|| HelpError::NotFound(format!("help request {id}")))
    }

    /// Requests a helper should see, oldest first: those assigned to them,
    /// plus pending ones within [`HELPER_RADIUS_METERS`] of their location.
    pub async fn list_for_helper(&self, helper_id: &str) -> Result<Vec<HelpRequest>, HelpError> {
        let helper = self
            .helpers
            .find_by_id(helper_id)
            .await?
            .ok_or_else(|| HelpError::NotFound(format!("helper {helper_id}")))?;

        let requests = self.requests.list_requests().await?;
        Ok(requests
            .into_iter()
            .filter(|r| match r.status {
                RequestStatus::Pending => helper.location.is_some_and(|at| {
                    distance_meters(at, r.elder_location) <= HELPER_RADIUS_METERS
                }),
                _ => r.helper_id.as_deref() == Some(helper.id.as_str()),
            })
            .collect())
    }

    /// Assign `helper_id` to the request. An already assigned request gets
    /// the new assignee.
    pub async fn assign(&self, request_id: &str, helper_id: &str) -> Result<HelpRequest, HelpError> {
        let helper_id = helper_id.trim();
        if helper_id.is_empty() {
            return Err(HelpError::Validation("helperId required".into()));
        }
        let from: Vec<_> = RequestStatus::ALL
            .into_iter()
            .filter(|s| s.assign().is_some())
            .collect();

        let updated = self
            .requests
            .transition_request(request_id, &from, RequestStatus::Assigned, Some(helper_id))
            .await?
            .ok_or_else(|| HelpError::InvalidTransition {
                id: request_id.to_string(),
                action: "assign",
            })?;
        info!(id = %updated.id, helper_id, "help request assigned");
        Ok(updated)
    }

    pub async fn confirm(&self, request_id: &str) -> Result<HelpRequest, HelpError> {
        let from: Vec<_> = RequestStatus::ALL
            .into_iter()
            .filter(|s| s.confirm().is_some())
            .collect();

        let updated = self
            .requests
            .transition_request(request_id, &from, RequestStatus::Confirmed, None)
            .await?
            .ok_or_else(|| HelpError::InvalidTransition {
                id: request_id.to_string(),
                action: "confirm",
            })?;
        info!(id = %updated.id, "help request confirmed");
        Ok(updated)
    }

    /// Credit [`REWARD_PER_REQUEST`] to the helper and return the new
    /// balance. Claiming the same request again credits again.
    pub async fn claim_reward(&self, helper_id: &str, request_id: &str) -> Result<i64, HelpError> {
        let request = self.get(request_id).await?;
        if request.helper_id.as_deref() != Some(helper_id) {
            warn!(request_id, helper_id, "reward claimed by a helper other than the assignee");
        }
        let balance = match self.helpers.add_reward(helper_id, REWARD_PER_REQUEST).await {
            Err(AuthError::Store(StoreError::NotFound(_))) => {
                return Err(HelpError::NotFound(format!("helper {helper_id}")));
            }
            other => other?,
        };
        info!(request_id, helper_id, balance, "reward claimed");
        Ok(balance)
    }
}
