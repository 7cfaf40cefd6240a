use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::domain::{Client, ClientId, ClientValidationError, NewClient, TimeOfDay};
use super::repository::{ClientRepository, RepositoryError};
use super::selector::select_eligible;

/// Service composing the client store, the clock, and the eligibility selector.
pub struct LeadRoutingService<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
}

static CLIENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = CLIENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ClientId(format!("client-{id:06}"))
}

impl<R, C> LeadRoutingService<R, C>
where
    R: ClientRepository + 'static,
    C: Clock + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validate and store a new client, generating an id when none was given.
    pub fn register(&self, request: NewClient) -> Result<Client, LeadRoutingError> {
        let stored = match request.requested_id() {
            Some(id) => self.repository.insert(request.into_client(id)?)?,
            None => self.insert_with_generated_id(request.into_client(next_client_id())?)?,
        };
        info!(client_id = %stored.id, priority = stored.priority, "client registered");
        Ok(stored)
    }

    /// Register a batch of clients, stopping at the first rejection.
    pub fn register_all<I>(&self, requests: I) -> Result<usize, LeadRoutingError>
    where
        I: IntoIterator<Item = NewClient>,
    {
        let mut registered = 0;
        for request in requests {
            self.register(request)?;
            registered += 1;
        }
        Ok(registered)
    }

    pub fn get(&self, id: &ClientId) -> Result<Client, LeadRoutingError> {
        let client = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(client)
    }

    /// All clients ordered by id.
    pub fn list(&self) -> Result<Vec<Client>, LeadRoutingError> {
        let mut clients = self.repository.list()?;
        clients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(clients)
    }

    pub fn now(&self) -> TimeOfDay {
        self.clock.now()
    }

    /// Report the client that would receive the next lead without committing.
    pub fn preview(&self, at: Option<TimeOfDay>) -> Result<Client, LeadRoutingError> {
        let now = at.unwrap_or_else(|| self.clock.now());
        let snapshot = self.snapshot()?;
        select_eligible(&snapshot, now)
            .cloned()
            .ok_or(LeadRoutingError::NoEligibleClient { at: now })
    }

    /// Select the next client and commit the lead against the store.
    ///
    /// The commit only succeeds if the selected client's count is unchanged
    /// since the snapshot was read; a concurrent assignment surfaces as
    /// [`RepositoryError::StaleSnapshot`] rather than overshooting capacity.
    pub fn assign(&self, at: Option<TimeOfDay>) -> Result<Client, LeadRoutingError> {
        let selected = self.preview(at)?;
        let assigned = self
            .repository
            .commit_assignment(&selected.id, selected.current_lead_count)?;
        info!(
            client_id = %assigned.id,
            lead_count = assigned.current_lead_count,
            lead_capacity = assigned.lead_capacity,
            "lead assigned"
        );
        Ok(assigned)
    }

    /// Return one lead slot to a client once a lead closes.
    pub fn release(&self, id: &ClientId) -> Result<Client, LeadRoutingError> {
        let client = self.repository.release(id)?;
        debug!(client_id = %client.id, lead_count = client.current_lead_count, "lead released");
        Ok(client)
    }

    /// Generated ids skip over values callers already claimed explicitly.
    fn insert_with_generated_id(&self, mut client: Client) -> Result<Client, RepositoryError> {
        loop {
            match self.repository.insert(client.clone()) {
                Err(RepositoryError::Conflict) => {
                    debug!(client_id = %client.id, "generated id already taken");
                    client.id = next_client_id();
                }
                result => return result,
            }
        }
    }

    fn snapshot(&self) -> Result<Vec<Client>, LeadRoutingError> {
        let clients = self.repository.list()?;
        for client in clients.iter().filter(|client| client.is_over_capacity()) {
            warn!(
                client_id = %client.id,
                lead_count = client.current_lead_count,
                lead_capacity = client.lead_capacity,
                "client exceeds lead capacity; excluded from selection"
            );
        }
        Ok(clients)
    }
}

/// Error raised by the lead routing service.
#[derive(Debug, thiserror::Error)]
pub enum LeadRoutingError {
    #[error(transparent)]
    Validation(#[from] ClientValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no eligible client at {at}")]
    NoEligibleClient { at: TimeOfDay },
}
