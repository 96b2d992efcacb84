
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bookly_booking::routes::routes;
use bookly_common::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use fixtures::*;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    identity: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = identity {
        builder = builder
            .header(USER_ID_HEADER, user_id)
            .header(USER_ROLE_HEADER, role);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

const PROVIDER_ID: Option<(&str, &str)> = Some((PROVIDER, "SERVICE_PROVIDER"));
const USER_ID: Option<(&str, &str)> = Some((USER_A, "USER"));

async fn app_with_service() -> (TestEnv, Router, String) {
    let env = create_test_env().await;
    let app = routes(create_state(&env));

    let (status, service) = send(
        &app,
        "POST",
        "/services",
        PROVIDER_ID,
        Some(json!({"name": "Checkup", "type": "MEDICAL", "durationMinutes": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let service_id = service["id"].as_str().unwrap().to_string();
    (env, app, service_id)
}

#[tokio::test]
async fn test_health() {
    let env = create_test_env().await;
    let app = routes(create_state(&env));
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_booking_flow_over_http() {
    let (_env, app, service_id) = app_with_service().await;
    let availability = format!("/services/{service_id}/availability");

    let (status, body) = send(
        &app,
        "PUT",
        &availability,
        PROVIDER_ID,
        Some(json!([{"dayOfWeek": 1, "startTime": "09:00", "endTime": "10:00"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["windows"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/services/{service_id}/slots?date=2025-03-10"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-03-10");
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["slotId"], format!("{service_id}_2025-03-10_09:00"));
    assert_eq!(slots[0]["startTime"], "09:00");
    assert_eq!(slots[0]["endTime"], "09:30");

    let slot_id = slots[0]["slotId"].clone();
    let (status, appointment) =
        send(&app, "POST", "/appointments", USER_ID, Some(json!({"slotId": slot_id}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "BOOKED");

    let (status, body) = send(
        &app,
        "POST",
        "/appointments",
        Some((USER_B, "USER")),
        Some(json!({"slotId": slot_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "CONFLICT");

    let (status, mine) = send(&app, "GET", "/appointments/me", USER_ID, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["serviceName"], "Checkup");
    assert_eq!(mine[0]["type"], "MEDICAL");

    let cancel = format!("/appointments/{}/cancel", appointment["id"].as_str().unwrap());
    let (status, body) = send(&app, "PATCH", &cancel, USER_ID, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    let (status, _) = send(&app, "PATCH", &cancel, USER_ID, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_identity_and_role_gates() {
    let (_env, app, service_id) = app_with_service().await;

    let (status, body) = send(&app, "GET", "/appointments/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        "POST",
        "/services",
        USER_ID,
        Some(json!({"name": "Nope", "type": "OTHER", "durationMinutes": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/appointments",
        PROVIDER_ID,
        Some(json!({"slotId": format!("{service_id}_2025-03-10_09:00")})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/services/{service_id}/availability"),
        Some(("provider-2", "SERVICE_PROVIDER")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_input_errors_are_bad_requests() {
    let (_env, app, service_id) = app_with_service().await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/services/{service_id}/slots?date=2025-3-10"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", &format!("/services/{service_id}/slots"), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/services?type=SPA", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/services/{service_id}/availability"),
        PROVIDER_ID,
        Some(json!({"dayOfWeek": 1, "startTime": "09:15", "endTime": "10:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/services/{service_id}/availability"),
        PROVIDER_ID,
        Some(json!([])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/appointments", USER_ID, Some(json!({"slot": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/services/{service_id}"),
        PROVIDER_ID,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/services/ghost/slots?date=2025-03-10", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provider_views() {
    let (_env, app, service_id) = app_with_service().await;

    let (status, services) = send(&app, "GET", "/providers/me/services", PROVIDER_ID, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(services[0]["id"], service_id.as_str());

    let (status, schedule) = send(
        &app,
        "GET",
        "/providers/me/schedule?date=2025-03-10",
        PROVIDER_ID,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schedule["services"][0]["serviceName"], "Checkup");
    assert_eq!(schedule["services"][0]["appointments"], json!([]));

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/services/{service_id}"),
        PROVIDER_ID,
        Some(json!({"name": "Annual checkup"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Annual checkup");
    assert_eq!(updated["durationMinutes"], 30);
}
