//! Feed account flows: signup, login, and resolving the session's member.

use hearth_core::auth::credentials::CredentialStore;
use hearth_core::auth::jwt::SessionTokenService;
use hearth_core::models::auth::{Identity, NewIdentity, SessionClaims};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, UserResponse};

/// Issue a session for `identity` and wrap it in an [`AuthResponse`].
pub fn session_response(
    tokens: &SessionTokenService,
    identity: &Identity,
    message: &str,
) -> AppResult<AuthResponse> {
    let token = tokens.issue(&identity.id, &identity.email, &identity.role)?;
    Ok(AuthResponse {
        message: message.to_string(),
        user: UserResponse::from(identity),
        token,
        expires_in: tokens.expires_in(),
    })
}

/// Register a feed member and sign them in.
pub async fn signup(
    members: &CredentialStore,
    tokens: &SessionTokenService,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let identity = members
        .create(NewIdentity {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        })
        .await?;
    session_response(tokens, &identity, "User created")
}

pub async fn login(
    members: &CredentialStore,
    tokens: &SessionTokenService,
    email: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let identity = members.authenticate(email, password).await?;
    info!(user_id = %identity.id, "member logged in");
    session_response(tokens, &identity, "Login successful")
}

/// The member a verified session belongs to.
///
/// Tokens for identities outside `members` (or since removed) are
/// rejected as unauthorized.
pub async fn current_member(
    members: &CredentialStore,
    claims: &SessionClaims,
) -> AppResult<Identity> {
    members
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown session subject".into()))
}
