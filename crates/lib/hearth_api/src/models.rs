//! Request and response bodies. All JSON is camelCase.

use chrono::{DateTime, Utc};
use hearth_core::models::auth::Identity;
use hearth_core::models::feed::Post;
use hearth_core::models::geo::GeoPoint;
use hearth_core::models::help::{HelpRequest, RequestStatus};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for Location {
    fn from(p: GeoPoint) -> Self {
        Self {
            lat: p.lat,
            lng: p.lng,
        }
    }
}

impl From<Location> for GeoPoint {
    fn from(l: Location) -> Self {
        GeoPoint::new(l.lat, l.lng)
    }
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighbourSignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub location: Option<Location>,
    pub reward: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for UserResponse {
    fn from(identity: &Identity) -> Self {
        let public = identity.to_public();
        Self {
            id: public.id,
            name: public.name,
            email: public.email,
            role: public.role,
            location: public.location.map(Location::from),
            reward: public.reward,
            created_at: public.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub media_url: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub section: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionQuery {
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub media_url: String,
    pub media_type: String,
    pub section: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            user_name: p.user_name,
            content: p.content,
            media_url: p.media_url,
            media_type: p.media_type,
            section: p.section,
            tags: p.tags,
            created_at: p.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Help requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHelpRequest {
    #[serde(default)]
    pub elder_id: String,
    pub elder_lat: Option<f64>,
    pub elder_lng: Option<f64>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperQuery {
    #[serde(default)]
    pub helper_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub helper_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRewardRequest {
    #[serde(default)]
    pub helper_id: String,
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestResponse {
    pub id: String,
    pub elder_id: String,
    pub elder_location: Location,
    pub title: String,
    pub audio_url: Option<String>,
    pub transcription: String,
    pub status: RequestStatus,
    pub helper_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<HelpRequest> for HelpRequestResponse {
    fn from(r: HelpRequest) -> Self {
        Self {
            id: r.id,
            elder_id: r.elder_id,
            elder_location: r.elder_location.into(),
            title: r.title,
            audio_url: r.audio_url,
            transcription: r.transcript,
            status: r.status,
            helper_id: r.helper_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHelpRequestResponse {
    pub message: String,
    pub request: HelpRequestResponse,
    /// Ids of helpers within matching distance of the elder.
    pub nearby_helpers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelperRequestsResponse {
    pub requests: Vec<HelpRequestResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestUpdateResponse {
    pub message: String,
    pub request: HelpRequestResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRewardResponse {
    pub message: String,
    pub new_balance: i64,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
}
