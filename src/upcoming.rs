use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Event;

/// Events with no time sort after timed events on the same date.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).expect("valid end-of-day time")
}

fn sort_key(event: &Event) -> (NaiveDate, NaiveTime) {
    (event.date, event.time.unwrap_or_else(end_of_day))
}

/// An event is upcoming when it is strictly later than `as_of`. A date-only
/// event on the reference date counts as upcoming for the rest of that day.
pub fn is_upcoming(event: &Event, as_of: NaiveDateTime) -> bool {
    if event.date > as_of.date() {
        return true;
    }
    if event.date < as_of.date() {
        return false;
    }
    match event.time {
        None => true,
        Some(time) => time > as_of.time(),
    }
}

/// Chronologically ordered upcoming events for one venue, optionally capped.
///
/// Events without a venue are skipped. An unknown venue id yields an empty
/// vec; existence checks belong to the caller.
pub fn upcoming_for_venue(
    events: &[Event],
    venue_id: i64,
    as_of: NaiveDateTime,
    limit: Option<usize>,
) -> Vec<Event> {
    let mut upcoming: Vec<Event> = events
        .iter()
        .filter(|event| event.venue_id == Some(venue_id) && is_upcoming(event, as_of))
        .cloned()
        .collect();

    upcoming.sort_by_key(sort_key);

    if let Some(limit) = limit {
        upcoming.truncate(limit);
    }
    upcoming
}

/// All events linked to a venue, in input order, without the upcoming cutoff.
pub fn events_for_venue(events: &[Event], venue_id: i64) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.venue_id == Some(venue_id))
        .cloned()
        .collect()
}

/// Case-insensitive substring search on event names.
pub fn search_by_name(events: &[Event], query: &str) -> Vec<Event> {
    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|event| event.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
