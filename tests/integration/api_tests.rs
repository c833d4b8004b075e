// tests/integration/api_tests.rs
use actix_web::{http::StatusCode, test, App};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use seguro_defeso::core::records::inss::contribution_for;

use crate::common::TestContext;

macro_rules! app {
    ($ctx:expr) => {{
        let state = $ctx.app.state().clone();
        test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

const NORTE: &str = "Norte%20-%20Bacia%20Amaz%C3%B4nica";

#[actix_web::test]
async fn test_health_reports_status() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_defeso_window_for_region() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/defeso/{}", NORTE))
            .to_request(),
    )
    .await;

    assert_eq!(body["source"], "computed");
    assert_eq!(body["data"]["status"], "upcoming");
    assert_eq!(body["data"]["days_remaining"], 45);
    assert_eq!(body["display"]["start"], "15/11/2026");
    assert_eq!(body["display"]["end"], "15/03/2027");

    let again: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/defeso/{}", NORTE))
            .to_request(),
    )
    .await;
    assert_eq!(again["source"], "cache");
}

#[actix_web::test]
async fn test_regions_listing() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/defeso/regions").to_request(),
    )
    .await;
    assert_eq!(body["regions"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_register_and_pin_login() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/identity")
            .set_json(json!({
                "name": "José Ribamar",
                "cpf": "123.456.789-00",
                "rgp": "MA-445566",
                "security": { "type": "pin", "pin": "1357", "confirmation": "1357" }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let profile: Value = test::read_body_json(resp).await;
    assert_eq!(profile["security_mode"], "pin");
    assert!(profile.get("security").is_none());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/identity/12345678900/login")
            .set_json(json!({ "type": "pin", "pin": "1357" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/identity/12345678900/login")
            .set_json(json!({ "type": "pin", "pin": "0000" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "authentication");

    let current: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/identity/current").to_request(),
    )
    .await;
    assert_eq!(current["cpf"], "12345678900");
}

#[actix_web::test]
async fn test_mismatched_pins_are_rejected() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/identity")
            .set_json(json!({
                "name": "Ana",
                "cpf": "98765432100",
                "rgp": "PA-1",
                "security": { "type": "pin", "pin": "1234", "confirmation": "4321" }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_body_keeps_error_shape() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/identity")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
}

#[actix_web::test]
async fn test_liveness_without_face() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/biometry/liveness")
            .set_json(json!({ "detection": null, "frame_width": 640, "frame_height": 480 }))
            .to_request(),
    )
    .await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["message"], "Nenhuma face detectada");
}

#[actix_web::test]
async fn test_compare_rejects_length_mismatch() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/biometry/compare")
            .set_json(json!({ "a": [0.1, 0.2], "b": [0.1, 0.2, 0.3] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_inss_calculation_from_typed_income() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/records/inss/calculate")
            .set_json(json!({ "month": "2026-09", "income": "R$ 1.500,00" }))
            .to_request(),
    )
    .await;
    assert_eq!(body["income_cents"], 150_000);
    assert_eq!(body["contribution_cents"], contribution_for(150_000).unwrap());
    assert_eq!(body["status"], "generated");
}

#[actix_web::test]
async fn test_inss_calculation_rejects_absurd_income() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/records/inss/calculate")
            .set_json(json!({ "month": "2026-09", "income": "10.000.000.000.000.000" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
}

#[actix_web::test]
async fn test_document_upload_and_fetch() {
    let ctx = TestContext::new().await;
    let app = app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/records/documents/rgp")
            .set_json(json!({ "content_type": "image/jpeg", "content": STANDARD.encode([1u8, 2, 3]) }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/records/documents/rgp").to_request(),
    )
    .await;
    assert_eq!(body["bytes"], STANDARD.encode([1u8, 2, 3]));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/records/documents/passaporte").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
