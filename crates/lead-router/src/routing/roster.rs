use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::NewClient;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read client roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid client roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads client registrations from a CSV roster.
///
/// Expected header:
/// `id,name,priority,lead_capacity,current_lead_count,working_hours_start,working_hours_end`.
/// `id` and `current_lead_count` may be left blank.
pub struct ClientRoster;

impl ClientRoster {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewClient>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NewClient>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut clients: Vec<NewClient> = Vec::new();
        for record in csv_reader.deserialize::<RosterRow>() {
            clients.push(record?.into());
        }
        Ok(clients)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    name: String,
    priority: i32,
    lead_capacity: u32,
    #[serde(default)]
    current_lead_count: Option<u32>,
    working_hours_start: String,
    working_hours_end: String,
}

impl From<RosterRow> for NewClient {
    fn from(row: RosterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            priority: row.priority,
            lead_capacity: row.lead_capacity,
            current_lead_count: row.current_lead_count.unwrap_or_default(),
            working_hours_start: row.working_hours_start,
            working_hours_end: row.working_hours_end,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
