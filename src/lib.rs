pub mod address;
pub mod config;
pub mod geocode;
pub mod mastodon;
pub mod models;
pub mod paths;
pub mod service;
pub mod store;
pub mod upcoming;

pub use address::{is_valid_address, validate_address, AddressError};
pub use config::{AppConfig, ConfigStore};
pub use models::{Event, EventDraft, EventPatch, Venue, VenueDraft};
pub use service::{EventLite, ServiceError};
pub use store::Store;
pub use upcoming::upcoming_for_venue;
