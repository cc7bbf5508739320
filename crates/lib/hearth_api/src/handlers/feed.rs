//! Feed handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use hearth_core::models::feed::PostPayload;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreatePostRequest, PostResponse, SectionQuery};
use crate::services::auth::current_member;

/// `POST /posts` — publish a post as the session's member.
pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Json(body): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostResponse>)> {
    let author = current_member(&state.members, &claims).await?;
    let payload = PostPayload {
        content: body.content,
        media_url: body.media_url,
        media_type: body.media_type,
        section: body.section,
    };
    let post = state.feed.create_post(&author, payload).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// `GET /feed` — every post.
pub async fn list_feed_handler(State(state): State<AppState>) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.feed.list_feed().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// `POST /user/posts?section=` — the session member's posts.
pub async fn user_posts_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(claims)): Extension<AuthenticatedUser>,
    Query(query): Query<SectionQuery>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let author = current_member(&state.members, &claims).await?;
    let posts = state
        .feed
        .list_by_author(&author.id, query.section.as_deref())
        .await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}
