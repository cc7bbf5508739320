//! Integration tests — neighbourhood accounts, help requests and the assistant.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};

use common::{app, get, post_json, send};

async fn neighbour(app: &axum::Router, email: &str, role: &str, at: Option<(f64, f64)>) -> Value {
    let mut body = json!({"name": "N", "email": email, "password": "pw", "role": role});
    if let Some((lat, lng)) = at {
        body["location"] = json!({"lat": lat, "lng": lng});
    }
    let (status, resp) = send(app, post_json("/api/signup", body, None)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    resp
}

async fn create_request(app: &axum::Router, audio_url: Option<&str>) -> Value {
    let mut body = json!({"elderId": "elder@example.com", "elderLat": 40.7128, "elderLng": -74.0060});
    if let Some(url) = audio_url {
        body["audioUrl"] = json!(url);
    }
    let (status, resp) = send(app, post_json("/api/upload", body, None)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    resp
}

#[tokio::test]
async fn signup_keys_by_email_and_signin_checks_password() {
    let (app, _dir) = app();
    let created = neighbour(&app, "Helper@Example.com", "helper", Some((40.7128, -74.0045))).await;
    assert_eq!(created["user"]["id"], "helper@example.com");
    assert_eq!(created["user"]["reward"], 0);

    let (status, _) = send(
        &app,
        post_json(
            "/api/signin",
            json!({"email": "helper@example.com", "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        post_json(
            "/api/signin",
            json!({"email": "helper@example.com", "password": "pw"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "helper");
}

#[tokio::test]
async fn signup_requires_role_and_rejects_duplicates() {
    let (app, _dir) = app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/signup",
            json!({"name": "N", "email": "a@example.com", "password": "pw"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    neighbour(&app, "a@example.com", "elder", None).await;
    let (status, _) = send(
        &app,
        post_json(
            "/api/signup",
            json!({"name": "N", "email": "A@example.com", "password": "pw", "role": "helper"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn upload_matches_helpers_within_500m() {
    let (app, _dir) = app();
    neighbour(&app, "near@example.com", "helper", Some((40.7128, -74.0045))).await;
    neighbour(&app, "far@example.com", "helper", Some((40.80, -74.0060))).await;
    neighbour(&app, "elder@example.com", "elder", Some((40.7128, -74.0060))).await;

    let resp = create_request(&app, None).await;
    assert_eq!(resp["nearbyHelpers"], json!(["near@example.com"]));
    assert_eq!(resp["request"]["status"], "pending");
    assert_eq!(
        resp["request"]["transcription"],
        "Audio help request from elderly person"
    );
    assert!(
        resp["request"]["id"]
            .as_str()
            .is_some_and(|id| id.starts_with("elder@example.com-"))
    );
}

#[tokio::test]
async fn upload_transcribes_audio_best_effort() {
    let (app, _dir) = app();
    let ok = create_request(&app, Some("https://cdn.example.com/help.wav")).await;
    assert_eq!(ok["request"]["transcription"], "need groceries");
    assert_eq!(ok["request"]["audioUrl"], "https://cdn.example.com/help.wav");

    let degraded = create_request(&app, Some("https://cdn.example.com/broken.wav")).await;
    assert_eq!(
        degraded["request"]["transcription"],
        "Audio help request from elderly person"
    );
}

#[tokio::test]
async fn upload_without_location_is_rejected() {
    let (app, _dir) = app();
    let (status, body) = send(
        &app,
        post_json("/api/upload", json!({"elderId": "elder@example.com"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn request_lifecycle_and_rewards() {
    let (app, _dir) = app();
    neighbour(&app, "near@example.com", "helper", Some((40.7128, -74.0045))).await;
    let created = create_request(&app, None).await;
    let id = created["request"]["id"].as_str().expect("id").to_string();

    let (status, listed) = send(&app, get("/api/helper?helperId=near@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["requests"][0]["id"], id.as_str());

    let (status, _) = send(
        &app,
        post_json("/api/eld-people/confirm", json!({"requestId": id}), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "pending requests cannot be confirmed");

    let (status, assigned) = send(
        &app,
        post_json(
            "/api/assignRequest",
            json!({"requestId": id, "helperId": "near@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["request"]["status"], "assigned");
    assert_eq!(assigned["request"]["helperId"], "near@example.com");

    let (status, confirmed) = send(
        &app,
        post_json("/api/eld-people/confirm", json!({"requestId": id}), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["request"]["status"], "confirmed");

    let (status, _) = send(
        &app,
        post_json(
            "/api/assignRequest",
            json!({"requestId": id, "helperId": "near@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let claim = json!({"helperId": "near@example.com", "requestId": id});
    let (status, first) = send(&app, post_json("/api/reward/claim", claim.clone(), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["newBalance"], 10);
    let (_, second) = send(&app, post_json("/api/reward/claim", claim, None)).await;
    assert_eq!(second["newBalance"], 20);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (app, _dir) = app();
    let (status, _) = send(&app, get("/api/helper?helperId=ghost@example.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post_json(
            "/api/assignRequest",
            json!({"requestId": "missing", "helperId": "h@example.com"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post_json("/api/assignRequest", json!({}), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audio_chat_writes_a_spoken_reply() {
    let (app, dir) = app();
    let boundary = "hearthboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"audio\"; filename=\"question.webm\"\r\n\
         Content-Type: audio/webm\r\n\r\n\
         not-really-audio\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/audio-chat")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");

    let (status, reply) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "{reply}");
    assert_eq!(reply["reply"], "Hola, ¿cómo estás?");

    let path = reply["audioPath"].as_str().expect("audioPath");
    let file = path.strip_prefix("/audio/").expect("served under /audio");
    assert!(dir.path().join(file).exists());

    let resp = tower::ServiceExt::oneshot(app.clone(), get(path)).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn audio_chat_without_audio_part_is_rejected() {
    let (app, _dir) = app();
    let boundary = "hearthboundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         value\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/audio-chat")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
