use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub venue_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Input for creating an event; the store assigns the id.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventDraft {
    pub name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub venue_id: Option<i64>,
    pub description: Option<String>,
}

/// Input for creating or replacing a venue.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct VenueDraft {
    pub name: String,
    pub capacity: i64,
    pub address: String,
}

/// Partial event update: absent fields keep their stored values.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub venue_id: Option<i64>,
    pub description: Option<String>,
}

impl Event {
    /// Merge a patch into this event. A blank name means "leave unchanged".
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(name) = &patch.name {
            if !name.trim().is_empty() {
                self.name = name.clone();
            }
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = Some(time);
        }
        if let Some(venue_id) = patch.venue_id {
            self.venue_id = Some(venue_id);
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
    }
}
