use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::routing::clock::FixedClock;
use crate::routing::domain::{Client, ClientId, NewClient, TimeOfDay, WorkingHours};
use crate::routing::repository::{ClientRepository, InMemoryClientRepository, RepositoryError};
use crate::routing::{client_router, LeadRoutingService};

pub(super) fn hm(raw: &str) -> TimeOfDay {
    raw.parse().expect("valid time of day")
}

pub(super) fn client(id: &str, priority: i32, count: u32, hours: (&str, &str)) -> Client {
    Client {
        id: ClientId(id.to_string()),
        name: format!("Client {id}"),
        priority,
        lead_capacity: 100,
        current_lead_count: count,
        working_hours: WorkingHours::new(hm(hours.0), hm(hours.1)),
    }
}

pub(super) fn office_hours(id: &str, priority: i32, count: u32) -> Client {
    client(id, priority, count, ("09:00", "17:00"))
}

pub(super) fn new_client(id: Option<&str>, priority: i32) -> NewClient {
    NewClient {
        id: id.map(str::to_string),
        name: "Acme Corp".to_string(),
        priority,
        lead_capacity: 10,
        current_lead_count: 0,
        working_hours_start: "09:00".to_string(),
        working_hours_end: "17:00".to_string(),
    }
}

pub(super) type MemoryService = LeadRoutingService<InMemoryClientRepository, FixedClock>;

pub(super) fn build_service(
    now: &str,
    clients: Vec<Client>,
) -> (MemoryService, Arc<InMemoryClientRepository>) {
    let repository = Arc::new(InMemoryClientRepository::default());
    for client in clients {
        repository.insert(client).expect("seed client");
    }
    let service = LeadRoutingService::new(repository.clone(), Arc::new(FixedClock(hm(now))));
    (service, repository)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    client_router(Arc::new(service))
}

/// Reports the count it was seeded with but rejects every commit, as a store
/// would after another request already took the slot.
#[derive(Default)]
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryClientRepository,
}

impl ClientRepository for RacingRepository {
    fn insert(&self, client: Client) -> Result<Client, RepositoryError> {
        self.inner.insert(client)
    }

    fn fetch(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        self.inner.list()
    }

    fn commit_assignment(
        &self,
        id: &ClientId,
        _observed_count: u32,
    ) -> Result<Client, RepositoryError> {
        Err(RepositoryError::StaleSnapshot {
            client_id: id.clone(),
        })
    }

    fn release(&self, id: &ClientId) -> Result<Client, RepositoryError> {
        self.inner.release(id)
    }
}

pub(super) struct UnavailableRepository;

impl ClientRepository for UnavailableRepository {
    fn insert(&self, _client: Client) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn commit_assignment(
        &self,
        _id: &ClientId,
        _observed_count: u32,
    ) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn release(&self, _id: &ClientId) -> Result<Client, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
