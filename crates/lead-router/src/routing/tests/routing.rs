use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::routing::clock::FixedClock;
use crate::routing::router::{assign_handler, register_handler, AtQuery};
use crate::routing::LeadRoutingService;

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn register_route_creates_clients() {
    let (service, _) = build_service("12:00", Vec::new());
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/clients",
            json!({
                "name": "New Client",
                "priority": 5,
                "leadCapacity": 10,
                "currentLeadCount": 0,
                "workingHoursStart": "09:00",
                "workingHoursEnd": "17:00",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], "New Client");
    assert_eq!(payload["workingHours"], json!({ "start": "09:00", "end": "17:00" }));
    assert!(payload["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn register_route_rejects_invalid_json() {
    let (service, _) = build_service("12:00", Vec::new());
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/clients")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{invalid json}"))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_route_rejects_bad_time_format() {
    let (service, _) = build_service("12:00", Vec::new());
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/clients",
            json!({
                "name": "New Client",
                "priority": 5,
                "leadCapacity": 10,
                "workingHoursStart": "9am",
                "workingHoursEnd": "17:00",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("working hours start"));
}

#[tokio::test]
async fn register_handler_returns_conflict_on_duplicate() {
    let (service, _) = build_service("12:00", vec![office_hours("acme", 1, 0)]);

    let response = register_handler(
        State(Arc::new(service)),
        Ok(axum::Json(new_client(Some("acme"), 3))),
    )
    .await;

    assert_conflict_response(response);
}

#[tokio::test]
async fn list_route_reports_not_found_when_empty() {
    let (service, _) = build_service("12:00", Vec::new());
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/clients"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_route_returns_all_clients() {
    let (service, _) = build_service(
        "12:00",
        vec![office_hours("b", 1, 0), office_hours("a", 2, 50)],
    );
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/clients"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ids: Vec<&str> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .filter_map(|client| client["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn client_route_finds_and_misses() {
    let (service, _) = build_service("12:00", vec![office_hours("1", 1, 50)]);
    let router = router_with_service(service);

    let found = router
        .clone()
        .oneshot(get("/api/v1/clients/1"))
        .await
        .expect("route executes");
    assert_eq!(found.status(), StatusCode::OK);
    let payload = read_json_body(found).await;
    assert_eq!(payload["currentLeadCount"], 50);
    assert_eq!(payload["leadCapacity"], 100);

    let missing = router
        .oneshot(get("/api/v1/clients/2"))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn eligible_route_previews_without_committing() {
    let (service, repository) = build_service(
        "12:00",
        vec![office_hours("high", 10, 20), office_hours("low", 5, 10)],
    );
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/leads/eligible"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "high");
    assert_eq!(payload["currentLeadCount"], 20);

    use crate::routing::repository::ClientRepository;
    let stored = repository
        .fetch(&crate::routing::ClientId("high".to_string()))
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.current_lead_count, 20);
}

#[tokio::test]
async fn eligible_route_reports_not_found_for_closed_overnight_desk() {
    let (service, _) = build_service("12:00", vec![client("night", 10, 0, ("22:00", "06:00"))]);
    let router = router_with_service(service);

    let closed = router
        .clone()
        .oneshot(get("/api/v1/leads/eligible"))
        .await
        .expect("route executes");
    assert_eq!(closed.status(), StatusCode::NOT_FOUND);

    let open = router
        .oneshot(get("/api/v1/leads/eligible?at=23:00"))
        .await
        .expect("route executes");
    assert_eq!(open.status(), StatusCode::OK);
}

#[tokio::test]
async fn eligible_route_rejects_malformed_time() {
    let (service, _) = build_service("12:00", vec![office_hours("acme", 1, 0)]);
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/leads/eligible?at=25:99"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assign_route_commits_the_lead() {
    let (service, _) = build_service("12:00", vec![office_hours("acme", 1, 4)]);
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/leads/assign")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["currentLeadCount"], 5);
}

#[tokio::test]
async fn assign_handler_returns_conflict_on_stale_snapshot() {
    let repository = Arc::new(RacingRepository::default());
    crate::routing::repository::ClientRepository::insert(
        repository.as_ref(),
        office_hours("acme", 1, 0),
    )
    .expect("seed client");
    let service = Arc::new(LeadRoutingService::new(
        repository,
        Arc::new(FixedClock(hm("12:00"))),
    ));

    let response = assign_handler(State(service), Query(AtQuery::default())).await;

    assert_conflict_response(response);
}

#[tokio::test]
async fn release_route_maps_outcomes() {
    let (service, _) = build_service("12:00", vec![office_hours("acme", 1, 1)]);
    let router = router_with_service(service);

    let released = router
        .clone()
        .oneshot(
            Request::post("/api/v1/clients/acme/release")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(released.status(), StatusCode::OK);

    let empty = router
        .clone()
        .oneshot(
            Request::post("/api/v1/clients/acme/release")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_conflict_response(empty);

    let unknown = crate::routing::router::release_handler(
        State(Arc::new(build_service("12:00", Vec::new()).0)),
        Path("ghost".to_string()),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}
