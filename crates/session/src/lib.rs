//! Session State
//!
//! Holds everything the single logical actor mutates between requests:
//! the cache of parsed tables keyed by upload identity, the active log,
//! and the sensor selection map.

mod store;

pub use store::{LogInfo, SensorEntry, SessionStore, UploadKey};

use thiserror::Error;

/// Errors from session state operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// A selection operation referenced a sensor the session does not know
    #[error("unknown sensor: {0}")]
    UnknownSensor(String),
}
