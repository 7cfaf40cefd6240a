use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Client, ClientId};

/// Storage abstraction so the routing service can be exercised in isolation.
///
/// `commit_assignment` is the only way lead counts grow: implementations must
/// check the observed count and the capacity and apply the increment as one
/// atomic step.
pub trait ClientRepository: Send + Sync {
    fn insert(&self, client: Client) -> Result<Client, RepositoryError>;
    fn fetch(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError>;
    fn list(&self) -> Result<Vec<Client>, RepositoryError>;
    fn commit_assignment(
        &self,
        id: &ClientId,
        observed_count: u32,
    ) -> Result<Client, RepositoryError>;
    fn release(&self, id: &ClientId) -> Result<Client, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("lead count for {client_id} changed since it was selected")]
    StaleSnapshot { client_id: ClientId },
    #[error("client {client_id} is at lead capacity")]
    CapacityReached { client_id: ClientId },
    #[error("client {client_id} holds no leads to release")]
    NothingToRelease { client_id: ClientId },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store guarded by a single mutex.
#[derive(Debug, Default, Clone)]
pub struct InMemoryClientRepository {
    records: Arc<Mutex<BTreeMap<ClientId, Client>>>,
}

impl InMemoryClientRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ClientId, Client>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("client store mutex poisoned".to_string()))
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn insert(&self, client: Client) -> Result<Client, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&client.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(client.id.clone(), client.clone());
        Ok(client)
    }

    fn fetch(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }

    fn commit_assignment(
        &self,
        id: &ClientId,
        observed_count: u32,
    ) -> Result<Client, RepositoryError> {
        let mut guard = self.lock()?;
        let client = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if client.current_lead_count != observed_count {
            return Err(RepositoryError::StaleSnapshot {
                client_id: id.clone(),
            });
        }
        if !client.has_capacity() {
            return Err(RepositoryError::CapacityReached {
                client_id: id.clone(),
            });
        }
        client.current_lead_count += 1;
        Ok(client.clone())
    }

    fn release(&self, id: &ClientId) -> Result<Client, RepositoryError> {
        let mut guard = self.lock()?;
        let client = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if client.current_lead_count == 0 {
            return Err(RepositoryError::NothingToRelease {
                client_id: id.clone(),
            });
        }
        client.current_lead_count -= 1;
        Ok(client.clone())
    }
}
