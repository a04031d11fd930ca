mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use image::ImageFormat;
use serde_json::{json, Value};
use tower::ServiceExt;

use photo_contest::create_routes;
use photo_contest::entities::user::{self, Role};
use photo_contest::middleware::auth::issue_access_token;
use photo_contest::services::media::MediaStore;

use common::{biography, image_bytes, seed_contest, seed_user, setup, SECRET};

const BOUNDARY: &str = "contest-test-boundary";

fn bearer(u: &user::Model) -> String {
    format!("Bearer {}", issue_access_token(u, SECRET).unwrap())
}

fn multipart_body(text: &[(&str, String)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in text {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    for (name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn entry_form(signature: &str) -> Vec<(&'static str, String)> {
    vec![
        ("signature", signature.to_string()),
        ("subject_name", "Marta Silva".to_string()),
        ("subject_age", "71".to_string()),
        ("subject_country", "Portugal".to_string()),
        ("subject_origin", "Lisbon".to_string()),
        ("location", "Cais do Sodre".to_string()),
        ("subject_biography", biography()),
    ]
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn register_login_and_me() {
    let env = setup().await;
    let app = create_routes(env.state.clone());

    let register = Request::builder()
        .method(Method::POST)
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Jane Doe",
                "email": "Jane@Example.com",
                "password": "correct horse",
                "password_confirm": "correct horse",
                "street": "1 Main St",
                "city": "Springfield",
                "state": "IL",
                "zip": "62701",
                "phone": "555-0100",
                "age": 40,
                "gender": "F",
                "ethnicity": "wh"
            })
            .to_string(),
        ))
        .unwrap();
    let res = app.clone().oneshot(register).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let profile = json_body(res).await;
    assert_eq!(profile["email"], "jane@example.com");
    assert_eq!(profile["state_name"], "Illinois");

    let login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": "jane@example.com", "password": "correct horse"}).to_string()))
        .unwrap();
    let res = app.clone().oneshot(login).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tokens = json_body(res).await;
    let access = tokens["access_token"].as_str().unwrap().to_string();

    let me = Request::builder()
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(me).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["name"], "Jane Doe");

    let bad_login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": "jane@example.com", "password": "nope"}).to_string()))
        .unwrap();
    let res = app.oneshot(bad_login).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_are_gated() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let app = create_routes(env.state.clone());
    let uri = format!("/admin/contests/{}/entries", contest.id);

    let anonymous = Request::builder().uri(&uri).body(Body::empty()).unwrap();
    assert_eq!(app.clone().oneshot(anonymous).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let as_member = Request::builder()
        .uri(&uri)
        .header(header::AUTHORIZATION, bearer(&member))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.oneshot(as_member).await.unwrap().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn multipart_submission_then_moderation() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let admin = seed_user(&env.repo, "Ada Judge", "ada@example.com", Role::Admin).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let app = create_routes(env.state.clone());

    let jpeg = image_bytes(500, 320, ImageFormat::Jpeg);
    let body = multipart_body(
        &entry_form("Jane Doe"),
        &[("file", "image/jpeg", &jpeg), ("release", "application/pdf", b"%PDF-1.4")],
    );
    let submit = Request::builder()
        .method(Method::POST)
        .uri(format!("/contests/{}/entries", contest.id))
        .header(header::AUTHORIZATION, bearer(&member))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    let res = app.clone().oneshot(submit).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let entry = json_body(res).await;
    assert_eq!(entry["status"], "active");
    let entry_id = entry["id"].as_i64().unwrap();

    let vote = Request::builder()
        .method(Method::PUT)
        .uri(format!("/admin/entries/{entry_id}/vote"))
        .header(header::AUTHORIZATION, bearer(&admin))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"score": 4}).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(vote).await.unwrap().status(), StatusCode::OK);

    let listing = Request::builder()
        .uri(format!("/admin/contests/{}/entries", contest.id))
        .header(header::AUTHORIZATION, bearer(&admin))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(listing).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let rows = json_body(res).await;
    assert_eq!(rows[0]["score"], 4);
    let small = rows[0]["file_path"].as_str().unwrap().to_string();

    let media = Request::builder().uri(format!("/media/{small}")).body(Body::empty()).unwrap();
    assert_eq!(app.oneshot(media).await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn signature_errors_are_reported_to_the_participant() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let app = create_routes(env.state.clone());

    let png = image_bytes(100, 100, ImageFormat::Png);
    let body = multipart_body(
        &entry_form("Someone Else"),
        &[("file", "image/png", &png), ("release", "application/pdf", b"%PDF-1.4")],
    );
    let submit = Request::builder()
        .method(Method::POST)
        .uri(format!("/contests/{}/entries", contest.id))
        .header(header::AUTHORIZATION, bearer(&member))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    let res = app.oneshot(submit).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["error"], "Signature must match the name on your account");
}

#[tokio::test]
async fn public_gallery_and_contest_lookup() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    env.state
        .pipeline
        .submit(member.id, contest.id, common::submission("Jane Doe", 240, 240))
        .await
        .unwrap();
    let app = create_routes(env.state.clone());

    let by_slug = Request::builder().uri("/contests/working-hands").body(Body::empty()).unwrap();
    let res = app.clone().oneshot(by_slug).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["id"], contest.id);

    let gallery = Request::builder()
        .uri(format!("/contests/{}/gallery?status=active", contest.id))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(gallery).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 1);

    let missing = Request::builder().uri("/contests/nope").body(Body::empty()).unwrap();
    assert_eq!(app.oneshot(missing).await.unwrap().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn release_documents_are_not_served_under_media() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    let contest = seed_contest(&env.repo, "Working Hands").await;
    let app = create_routes(env.state.clone());

    let png = image_bytes(240, 240, ImageFormat::Png);
    let body = multipart_body(
        &entry_form("Jane Doe"),
        &[("image", "image/png", &png), ("release", "application/pdf", b"%PDF-1.4")],
    );
    let submit = Request::builder()
        .method(Method::POST)
        .uri(format!("/contests/{}/entries", contest.id))
        .header(header::AUTHORIZATION, bearer(&member))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    let res = app.clone().oneshot(submit).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let photo_id = json_body(res).await["photo_id"].as_str().unwrap().to_string();

    let release = MediaStore::release_name(photo_id.parse().unwrap(), "pdf");
    assert!(env.state.pipeline.releases().resolve(&release).exists());

    for uri in [format!("/media/{release}"), format!("/media/../releases/{release}")] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        assert_ne!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);
    }

    let thumb = Request::builder()
        .uri(format!("/media/photo-{photo_id}-thumb.jpg"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.oneshot(thumb).await.unwrap().status(), StatusCode::OK);
}

fn json_request(method: Method, uri: &str, auth: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, auth)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn profile_and_password_can_be_changed() {
    let env = setup().await;
    let member = seed_user(&env.repo, "Jane Doe", "jane@example.com", Role::User).await;
    seed_user(&env.repo, "John Roe", "john@example.com", Role::User).await;
    let app = create_routes(env.state.clone());
    let auth = bearer(&member);

    let profile = json!({
        "name": "Jane Q. Doe",
        "email": "jane@example.com",
        "street": "2 Harbour Rd",
        "city": "Lisbon",
        "state": "OO",
        "zip": "1200",
        "phone": "555-0199",
        "age": 41,
        "gender": "F",
        "ethnicity": "wh"
    });
    let res = app
        .clone()
        .oneshot(json_request(Method::PATCH, "/auth/me", &auth, profile.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Jane Q. Doe");
    assert_eq!(body["city"], "Lisbon");

    let mut taken = profile.clone();
    taken["email"] = json!("john@example.com");
    let res = app.clone().oneshot(json_request(Method::PATCH, "/auth/me", &auth, taken)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let anonymous = Request::builder()
        .method(Method::PUT)
        .uri("/auth/password")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"current_password": "x", "password": "y", "password_confirm": "y"}).to_string()))
        .unwrap();
    assert_eq!(app.clone().oneshot(anonymous).await.unwrap().status(), StatusCode::UNAUTHORIZED);

    let wrong = json!({"current_password": "guess", "password": "new secret", "password_confirm": "new secret"});
    let res = app.clone().oneshot(json_request(Method::PUT, "/auth/password", &auth, wrong)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["error"], "Current password is incorrect");

    let mismatch = json!({"current_password": "correct horse", "password": "new secret", "password_confirm": "nope"});
    let res = app.clone().oneshot(json_request(Method::PUT, "/auth/password", &auth, mismatch)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let ok = json!({"current_password": "correct horse", "password": "new secret", "password_confirm": "new secret"});
    let res = app.clone().oneshot(json_request(Method::PUT, "/auth/password", &auth, ok)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let login = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"email": "jane@example.com", "password": "new secret"}).to_string()))
        .unwrap();
    assert_eq!(app.oneshot(login).await.unwrap().status(), StatusCode::OK);
}
