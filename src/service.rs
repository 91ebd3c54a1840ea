use chrono::{Local, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::address::{validate_address, AddressError};
use crate::models::{Event, EventDraft, EventPatch, Venue, VenueDraft};
use crate::models::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::store::Store;
use crate::upcoming;

pub const NEXT_EVENTS_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error("venue {0} not found")]
    VenueNotFound(i64),
    #[error("venue {0} still has events linked to it")]
    VenueInUse(i64),
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] AddressError),
    #[error("name must be between 1 and {MAX_NAME_LEN} characters")]
    InvalidName,
    #[error("description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,
    #[error("event date must be in the future")]
    DateNotInFuture,
    #[error("venue capacity must be positive")]
    InvalidCapacity,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Application façade over the store: validation, existence checks, and the
/// lifecycle rules the pure helpers in `upcoming` and `address` stay out of.
pub struct EventLite {
    store: Store,
}

impl EventLite {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn open_default() -> Result<Self, ServiceError> {
        Ok(Self::new(Store::open_default()?))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // Events

    pub fn all_events(&self) -> Result<Vec<Event>, ServiceError> {
        Ok(self.store.find_all_events()?)
    }

    pub fn event(&self, id: i64) -> Result<Event, ServiceError> {
        self.store
            .find_event(id)?
            .ok_or(ServiceError::EventNotFound(id))
    }

    pub fn create_event(&self, draft: &EventDraft) -> Result<Event, ServiceError> {
        validate_name(&draft.name)?;
        validate_description(draft.description.as_deref())?;
        validate_future_date(draft.date, Local::now().date_naive())?;
        if let Some(venue_id) = draft.venue_id {
            self.require_venue(venue_id)?;
        }
        Ok(self.store.insert_event(draft)?)
    }

    /// Partial update: only fields present in the patch replace stored
    /// values. A patched date must still be in the future.
    pub fn update_event(&self, id: i64, patch: &EventPatch) -> Result<Event, ServiceError> {
        let mut event = self.event(id)?;

        if let Some(name) = &patch.name {
            if !name.trim().is_empty() {
                validate_name(name)?;
            }
        }
        validate_description(patch.description.as_deref())?;
        if let Some(date) = patch.date {
            validate_future_date(date, Local::now().date_naive())?;
        }
        if let Some(venue_id) = patch.venue_id {
            self.require_venue(venue_id)?;
        }

        event.apply_patch(patch);
        self.store.update_event(&event)?;
        Ok(event)
    }

    pub fn delete_event(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.exists_event(id)? {
            return Err(ServiceError::EventNotFound(id));
        }
        self.store.delete_event(id)?;
        Ok(())
    }

    pub fn delete_all_events(&self) -> Result<(), ServiceError> {
        self.store.delete_all_events()?;
        Ok(())
    }

    pub fn search_events(&self, query: &str) -> Result<Vec<Event>, ServiceError> {
        let events = self.store.find_all_events()?;
        Ok(upcoming::search_by_name(&events, query))
    }

    // Venues

    pub fn all_venues(&self) -> Result<Vec<Venue>, ServiceError> {
        Ok(self.store.find_all_venues()?)
    }

    pub fn venue(&self, id: i64) -> Result<Venue, ServiceError> {
        self.store
            .find_venue(id)?
            .ok_or(ServiceError::VenueNotFound(id))
    }

    pub fn search_venues(&self, query: &str) -> Result<Vec<Venue>, ServiceError> {
        Ok(self.store.find_venues_by_name(query)?)
    }

    /// Coordinates come from the caller, which geocodes only after the
    /// address has passed validation.
    pub fn create_venue(
        &self,
        draft: &VenueDraft,
        coordinates: Option<(f64, f64)>,
    ) -> Result<Venue, ServiceError> {
        validate_venue_draft(draft)?;
        Ok(self.store.insert_venue(draft, coordinates)?)
    }

    /// Replaces name, capacity, and address. Coordinates update only when a
    /// new pair is supplied; otherwise the stored ones stay.
    pub fn update_venue(
        &self,
        id: i64,
        draft: &VenueDraft,
        coordinates: Option<(f64, f64)>,
    ) -> Result<Venue, ServiceError> {
        let mut venue = self.venue(id)?;
        validate_venue_draft(draft)?;

        venue.name = draft.name.clone();
        venue.capacity = draft.capacity;
        venue.address = draft.address.clone();
        if let Some((latitude, longitude)) = coordinates {
            venue.latitude = Some(latitude);
            venue.longitude = Some(longitude);
        }

        self.store.update_venue(&venue)?;
        Ok(venue)
    }

    pub fn delete_venue(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.exists_venue(id)? {
            return Err(ServiceError::VenueNotFound(id));
        }
        if self.store.exists_event_for_venue(id)? {
            return Err(ServiceError::VenueInUse(id));
        }
        self.store.delete_venue(id)?;
        Ok(())
    }

    // Upcoming events

    /// Ordered upcoming events at a venue. Unlike the pure engine, this
    /// rejects unknown venue ids.
    pub fn upcoming_for_venue(
        &self,
        venue_id: i64,
        as_of: NaiveDateTime,
        limit: Option<usize>,
    ) -> Result<Vec<Event>, ServiceError> {
        self.require_venue(venue_id)?;
        let events = self.store.find_all_events()?;
        Ok(upcoming::upcoming_for_venue(&events, venue_id, as_of, limit))
    }

    pub fn next_three_events(
        &self,
        venue_id: i64,
        as_of: NaiveDateTime,
    ) -> Result<Vec<Event>, ServiceError> {
        self.upcoming_for_venue(venue_id, as_of, Some(NEXT_EVENTS_COUNT))
    }

    pub fn venue_events(&self, venue_id: i64) -> Result<Vec<Event>, ServiceError> {
        self.require_venue(venue_id)?;
        let events = self.store.find_all_events()?;
        Ok(upcoming::events_for_venue(&events, venue_id))
    }

    fn require_venue(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.exists_venue(id)? {
            return Err(ServiceError::VenueNotFound(id));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::InvalidName);
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ServiceError> {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ServiceError::DescriptionTooLong);
        }
    }
    Ok(())
}

fn validate_future_date(date: NaiveDate, today: NaiveDate) -> Result<(), ServiceError> {
    if date <= today {
        return Err(ServiceError::DateNotInFuture);
    }
    Ok(())
}

fn validate_venue_draft(draft: &VenueDraft) -> Result<(), ServiceError> {
    validate_name(&draft.name)?;
    if draft.capacity <= 0 {
        return Err(ServiceError::InvalidCapacity);
    }
    validate_address(&draft.address)?;
    Ok(())
}
