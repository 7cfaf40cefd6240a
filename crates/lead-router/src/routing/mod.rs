//! Lead routing: client registration, eligibility selection, and assignment.

pub mod clock;
pub mod domain;
pub mod repository;
pub mod roster;
pub mod router;
pub mod selector;
pub mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Client, ClientId, ClientValidationError, NewClient, TimeOfDay, TimeOfDayError, WorkingHours,
};
pub use repository::{ClientRepository, InMemoryClientRepository, RepositoryError};
pub use roster::{ClientRoster, RosterImportError};
pub use router::client_router;
pub use selector::{is_candidate, ranked_candidates, select_eligible};
pub use service::{LeadRoutingError, LeadRoutingService};
