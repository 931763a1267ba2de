//! End-to-end tests over a real Postgres instance.
//!
//! Run with a provisioned database:
//! `DATABASE_URL=... cargo test -- --ignored`

mod common;

use std::time::Duration;

use actix_web::http::header;
use actix_web::{test, web, App};

use conference_cert_server::certificate::{build_renderer, RenderStrategy};
use conference_cert_server::{certificate, AppState};

async fn state_with_overlay(honorific: &str) -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("database is reachable");
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let templates = common::provision_templates(dir.path());
    let renderer = build_renderer(
        RenderStrategy::Overlay,
        templates.clone(),
        "unused".into(),
        Duration::from_secs(10),
    );
    AppState::with_parts(pool, templates, renderer, honorific)
}

async fn insert_registrant(state: &AppState, name: &str, day1: bool, day2: bool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO registrants \
         (name, designation, organization, email, mobile, city, mode, \
          attendance_day1, attendance_day2) \
         VALUES ($1, 'Engineer', 'Example Org', $2, $3, 'London', 'In-person', $4, $5) \
         RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@example.org", name.to_lowercase()))
    .bind(format!("9{:09}", rand_suffix()))
    .bind(day1)
    .bind(day2)
    .fetch_one(&state.pool)
    .await
    .unwrap()
}

fn rand_suffix() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos()
        % 1_000_000_000
}

async fn delete_registrant(state: &AppState, id: i64) {
    sqlx::query("DELETE FROM registrants WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await
        .unwrap();
}

macro_rules! certificate_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .service(
                    web::resource("/certificate/{id}")
                        .route(web::get().to(certificate::handlers::download_certificate)),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[ignore = "requires database connection"]
async fn day1_attendee_downloads_a_personalized_certificate() {
    let state = state_with_overlay("Mr. ").await;
    let id = insert_registrant(&state, "Ada", true, false).await;
    let app = certificate_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/certificate/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(content_type, "application/pdf");
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("certificate_Ada.pdf"));

    let body = test::read_body(resp).await;
    let needle = b"Mr. Ada";
    assert!(body.windows(needle.len()).any(|w| w == needle));

    delete_registrant(&state, id).await;
}

#[actix_web::test]
#[ignore = "requires database connection"]
async fn no_attendance_yields_the_not_eligible_page() {
    let state = state_with_overlay("").await;
    let id = insert_registrant(&state, "Grace", false, false).await;
    let app = certificate_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/certificate/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let body = test::read_body(resp).await;
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("Not eligible"));

    delete_registrant(&state, id).await;
}

#[actix_web::test]
#[ignore = "requires database connection"]
async fn unknown_registrant_yields_not_found() {
    let state = state_with_overlay("").await;
    let app = certificate_app!(state);

    let req = test::TestRequest::get()
        .uri("/certificate/999999999")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("User not found"));
}

#[actix_web::test]
#[ignore = "requires database connection"]
async fn identifier_lookup_returns_matches_ordered_by_id() {
    let state = state_with_overlay("").await;
    let first = insert_registrant(&state, "Ada", true, false).await;
    let second = insert_registrant(&state, "Ada", false, true).await;

    // Same mobile for both so the identifier matches twice.
    sqlx::query("UPDATE registrants SET mobile = '9998887776' WHERE id IN ($1, $2)")
        .bind(first)
        .bind(second)
        .execute(&state.pool)
        .await
        .unwrap();

    let matches = state
        .find_registrants_by_identifier("9998887776")
        .await
        .unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches[0].id < matches[1].id);

    delete_registrant(&state, first).await;
    delete_registrant(&state, second).await;
}
