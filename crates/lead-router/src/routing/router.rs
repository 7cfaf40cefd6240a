use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::clock::Clock;
use super::domain::{ClientId, NewClient, TimeOfDay, TimeOfDayError};
use super::repository::{ClientRepository, RepositoryError};
use super::service::{LeadRoutingError, LeadRoutingService};

/// Router builder exposing client registration and lead assignment endpoints.
pub fn client_router<R, C>(service: Arc<LeadRoutingService<R, C>>) -> Router
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/clients",
            post(register_handler::<R, C>).get(list_handler::<R, C>),
        )
        .route("/api/v1/clients/:client_id", get(client_handler::<R, C>))
        .route(
            "/api/v1/clients/:client_id/release",
            post(release_handler::<R, C>),
        )
        .route("/api/v1/leads/eligible", get(eligible_handler::<R, C>))
        .route("/api/v1/leads/assign", post(assign_handler::<R, C>))
        .with_state(service)
}

/// Optional `?at=HH:MM` override for the reference time.
#[derive(Debug, Default, Deserialize)]
pub struct AtQuery {
    pub at: Option<String>,
}

impl AtQuery {
    fn time_of_day(&self) -> Result<Option<TimeOfDay>, TimeOfDayError> {
        self.at.as_deref().map(str::parse).transpose()
    }
}

pub(crate) async fn register_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_body(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match service.register(request) {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(LeadRoutingError::Repository(RepositoryError::Conflict)) => {
            error_body(StatusCode::CONFLICT, "client id already exists")
        }
        Err(other) => routing_error_response(other),
    }
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    match service.list() {
        Ok(clients) if clients.is_empty() => error_body(StatusCode::NOT_FOUND, "no clients found"),
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(other) => routing_error_response(other),
    }
}

pub(crate) async fn client_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
    Path(client_id): Path<String>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    match service.get(&ClientId(client_id)) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(other) => routing_error_response(other),
    }
}

pub(crate) async fn release_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
    Path(client_id): Path<String>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    match service.release(&ClientId(client_id)) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(other) => routing_error_response(other),
    }
}

pub(crate) async fn eligible_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
    Query(query): Query<AtQuery>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    let at = match query.time_of_day() {
        Ok(at) => at,
        Err(error) => return error_body(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.preview(at) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(other) => routing_error_response(other),
    }
}

pub(crate) async fn assign_handler<R, C>(
    State(service): State<Arc<LeadRoutingService<R, C>>>,
    Query(query): Query<AtQuery>,
) -> Response
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    let at = match query.time_of_day() {
        Ok(at) => at,
        Err(error) => return error_body(StatusCode::BAD_REQUEST, error.to_string()),
    };

    match service.assign(at) {
        Ok(client) => (StatusCode::OK, Json(client)).into_response(),
        Err(other) => routing_error_response(other),
    }
}

fn routing_error_response(error: LeadRoutingError) -> Response {
    let status = match &error {
        LeadRoutingError::Validation(_) => StatusCode::BAD_REQUEST,
        LeadRoutingError::NoEligibleClient { .. }
        | LeadRoutingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeadRoutingError::Repository(
            RepositoryError::Conflict
            | RepositoryError::StaleSnapshot { .. }
            | RepositoryError::CapacityReached { .. }
            | RepositoryError::NothingToRelease { .. },
        ) => StatusCode::CONFLICT,
        LeadRoutingError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_body(status, error.to_string())
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (status, Json(payload)).into_response()
}
