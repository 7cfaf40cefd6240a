use std::cmp::Ordering;

use super::domain::{Client, TimeOfDay};

/// A client is a candidate when it has spare capacity and `now` falls inside
/// its working hours.
pub fn is_candidate(client: &Client, now: TimeOfDay) -> bool {
    client.has_capacity() && client.working_hours.contains(now)
}

/// Ranking used to order candidates: highest priority first, then the least
/// loaded client, then the lowest id so equal clients always resolve the same
/// way.
pub fn rank(a: &Client, b: &Client) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.current_lead_count.cmp(&b.current_lead_count))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the client that should receive the next lead, if any.
///
/// Pure over the snapshot it is given; committing the assignment is the
/// caller's job.
pub fn select_eligible<'a, I>(clients: I, now: TimeOfDay) -> Option<&'a Client>
where
    I: IntoIterator<Item = &'a Client>,
{
    clients
        .into_iter()
        .filter(|client| is_candidate(client, now))
        .min_by(|a, b| rank(a, b))
}

/// Every candidate at `now`, best first.
pub fn ranked_candidates<'a, I>(clients: I, now: TimeOfDay) -> Vec<&'a Client>
where
    I: IntoIterator<Item = &'a Client>,
{
    let mut candidates: Vec<&Client> = clients
        .into_iter()
        .filter(|client| is_candidate(client, now))
        .collect();
    candidates.sort_by(|a, b| rank(a, b));
    candidates
}
