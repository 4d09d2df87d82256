//! Client-side character sheet store for 5e.
//!
//! The store holds every character of a session, merges partial edits
//! into them, recomputes derived cells, and notifies observers of the
//! exact paths that changed.

pub mod config;
pub mod logging;
pub mod seed;
pub mod store;

pub use config::{ClientConfig, ConfigError, LogFormat, LogLevel, LoggingConfig};
pub use seed::{CharacterSource, JsonFileSource, SeedError};
pub use store::{
    CharacterStore, ObserverRegistry, StoreError, StoreEvent, SubscriptionId, Topic,
    UpdateOutcome, PROFICIENCY_BONUS_FIELD,
};
