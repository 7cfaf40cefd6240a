use lead_router::error::AppError;
use lead_router::routing::{
    Clock, ClientRoster, InMemoryClientRepository, LeadRoutingService, TimeOfDay,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build a service over a fresh in-memory store, seeded from a roster when one is given.
pub(crate) fn build_routing_service<C>(
    clock: C,
    roster: Option<&Path>,
) -> Result<LeadRoutingService<InMemoryClientRepository, C>, AppError>
where
    C: Clock + 'static,
{
    let repository = Arc::new(InMemoryClientRepository::default());
    let service = LeadRoutingService::new(repository, Arc::new(clock));

    if let Some(path) = roster {
        let clients = ClientRoster::from_path(path)?;
        let registered = service.register_all(clients)?;
        info!(roster = %path.display(), registered, "client roster loaded");
    }

    Ok(service)
}

pub(crate) fn parse_time_of_day(raw: &str) -> Result<TimeOfDay, String> {
    raw.parse::<TimeOfDay>().map_err(|err| err.to_string())
}
