//! Neighbourhood flows: accounts and help request intake.

use hearth_core::ai::Transcriber;
use hearth_core::auth::credentials::CredentialStore;
use hearth_core::auth::jwt::SessionTokenService;
use hearth_core::geo::HELPER_RADIUS_METERS;
use hearth_core::help::RequestStore;
use hearth_core::models::auth::{HELPER_ROLE, NewIdentity};
use hearth_core::models::geo::GeoPoint;
use tracing::{info, warn};

use super::auth::session_response;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthResponse, CreateHelpRequest, CreateHelpRequestResponse, NeighbourSignupRequest,
};

pub async fn signup(
    neighbours: &CredentialStore,
    tokens: &SessionTokenService,
    body: NeighbourSignupRequest,
) -> AppResult<AuthResponse> {
    let identity = neighbours
        .create(NewIdentity {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            location: body.location.map(GeoPoint::from),
        })
        .await?;
    session_response(tokens, &identity, "User created")
}

pub async fn signin(
    neighbours: &CredentialStore,
    tokens: &SessionTokenService,
    email: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let identity = neighbours.authenticate(email, password).await?;
    info!(user_id = %identity.id, role = %identity.role, "neighbour signed in");
    session_response(tokens, &identity, "Sign in successful")
}

/// Record a help request and find the helpers near the elder.
///
/// The audio transcript is best-effort; without one the request keeps the
/// default transcript.
pub async fn create_help_request(
    requests: &RequestStore,
    neighbours: &CredentialStore,
    transcriber: &dyn Transcriber,
    body: CreateHelpRequest,
) -> AppResult<CreateHelpRequestResponse> {
    let (Some(lat), Some(lng)) = (body.elder_lat, body.elder_lng) else {
        return Err(AppError::Validation("elderLat and elderLng required".into()));
    };
    let location = GeoPoint::new(lat, lng);
    if body.elder_id.trim().is_empty() {
        return Err(AppError::Validation("elderId required".into()));
    }
    if !location.is_valid() {
        return Err(AppError::Validation("location out of range".into()));
    }
    let audio_url = body.audio_url.filter(|u| !u.trim().is_empty());

    let transcript = match &audio_url {
        Some(url) => transcriber.transcribe(url).await.unwrap_or_else(|e| {
            warn!(audio_url = %url, "help request transcription failed: {e}");
            String::new()
        }),
        None => String::new(),
    };

    let request = requests
        .create(&body.elder_id, location, &transcript, audio_url)
        .await?;

    let nearby_helpers: Vec<String> = neighbours
        .find_by_role_near(HELPER_ROLE, location, HELPER_RADIUS_METERS)
        .await?
        .map(|helper| helper.id)
        .collect();
    info!(id = %request.id, helpers = nearby_helpers.len(), "matched nearby helpers");

    Ok(CreateHelpRequestResponse {
        message: "Audio uploaded and request created".into(),
        request: request.into(),
        nearby_helpers,
    })
}
