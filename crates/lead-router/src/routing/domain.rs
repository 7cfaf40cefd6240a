use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for registered clients.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wall-clock time of day at minute resolution, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub const FORMAT: &'static str = "%H:%M";

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Drop seconds and sub-second precision from a clock reading.
    pub fn truncated(time: NaiveTime) -> Self {
        let minutes = time
            .with_nanosecond(0)
            .and_then(|time| time.with_second(0))
            .unwrap_or(time);
        Self(minutes)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(raw.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|_| TimeOfDayError::Invalid {
                value: raw.to_string(),
            })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Malformed time-of-day input supplied at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeOfDayError {
    #[error("invalid time of day '{value}': expected HH:MM")]
    Invalid { value: String },
}

/// Daily recurring window during which a client accepts leads.
///
/// A window whose start is later than its end wraps past midnight, so
/// `22:00`-`06:00` covers the late evening and the early morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl WorkingHours {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, now: TimeOfDay) -> bool {
        if self.wraps_midnight() {
            now >= self.start || now <= self.end
        } else {
            self.start <= now && now <= self.end
        }
    }
}

/// Account capable of receiving leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub priority: i32,
    pub lead_capacity: u32,
    pub current_lead_count: u32,
    pub working_hours: WorkingHours,
}

impl Client {
    pub fn has_capacity(&self) -> bool {
        self.current_lead_count < self.lead_capacity
    }

    /// True when a prior assignment pushed the count past capacity.
    pub fn is_over_capacity(&self) -> bool {
        self.current_lead_count > self.lead_capacity
    }
}

/// Registration payload accepted from HTTP callers and roster imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub priority: i32,
    pub lead_capacity: u32,
    #[serde(default)]
    pub current_lead_count: u32,
    pub working_hours_start: String,
    pub working_hours_end: String,
}

impl NewClient {
    /// Caller supplied identifier, ignoring blank values.
    pub fn requested_id(&self) -> Option<ClientId> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| ClientId(id.to_string()))
    }

    pub fn into_client(self, id: ClientId) -> Result<Client, ClientValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientValidationError::BlankName);
        }

        let start = self
            .working_hours_start
            .parse()
            .map_err(ClientValidationError::WorkingHoursStart)?;
        let end = self
            .working_hours_end
            .parse()
            .map_err(ClientValidationError::WorkingHoursEnd)?;

        if self.current_lead_count > self.lead_capacity {
            return Err(ClientValidationError::LeadCountExceedsCapacity {
                count: self.current_lead_count,
                capacity: self.lead_capacity,
            });
        }

        Ok(Client {
            id,
            name: name.to_string(),
            priority: self.priority,
            lead_capacity: self.lead_capacity,
            current_lead_count: self.current_lead_count,
            working_hours: WorkingHours::new(start, end),
        })
    }
}

/// Rejection raised while turning a registration payload into a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    #[error("client name must not be blank")]
    BlankName,
    #[error("invalid working hours start: {0}")]
    WorkingHoursStart(TimeOfDayError),
    #[error("invalid working hours end: {0}")]
    WorkingHoursEnd(TimeOfDayError),
    #[error("current lead count {count} exceeds lead capacity {capacity}")]
    LeadCountExceedsCapacity { count: u32, capacity: u32 },
}
