use crate::infra::{build_routing_service, parse_time_of_day};
use clap::Args;
use lead_router::config::{AppConfig, ClockZone};
use lead_router::error::AppError;
use lead_router::routing::{
    ranked_candidates, Clock, FixedClock, LeadRoutingError, SystemClock, TimeOfDay,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SelectArgs {
    /// CSV roster of clients to select from
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Reference time of day (HH:MM). Defaults to the current time in APP_CLOCK_ZONE.
    #[arg(long, value_parser = parse_time_of_day)]
    pub(crate) at: Option<TimeOfDay>,
    /// Also list every other eligible client in rank order
    #[arg(long)]
    pub(crate) all: bool,
}

/// Pin the selection time once so the pick and the ranked listing agree.
pub(crate) fn reference_clock(at: Option<TimeOfDay>, zone: ClockZone) -> FixedClock {
    FixedClock(at.unwrap_or_else(|| SystemClock::new(zone).now()))
}

pub(crate) fn run_select(args: SelectArgs) -> Result<(), AppError> {
    let SelectArgs { roster, at, all } = args;

    let config = AppConfig::load()?;
    let clock = reference_clock(at, config.routing.clock_zone);
    let now = clock.now();
    let service = build_routing_service(clock, Some(roster.as_path()))?;

    match service.preview(None) {
        Ok(client) => {
            println!(
                "{} ({}) priority {} leads {}/{} hours {}-{}",
                client.id,
                client.name,
                client.priority,
                client.current_lead_count,
                client.lead_capacity,
                client.working_hours.start,
                client.working_hours.end,
            );
        }
        Err(LeadRoutingError::NoEligibleClient { at }) => {
            println!("no eligible client at {at}");
            return Ok(());
        }
        Err(other) => return Err(other.into()),
    }

    if all {
        let clients = service.list()?;
        let ranked = ranked_candidates(&clients, now);
        println!("\nEligible at {now}:");
        for (rank, client) in ranked.iter().enumerate() {
            println!(
                "  {}. {} priority {} leads {}/{}",
                rank + 1,
                client.id,
                client.priority,
                client.current_lead_count,
                client.lead_capacity
            );
        }
    }

    Ok(())
}
