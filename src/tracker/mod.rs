#![doc = include_str!("README.md")]
mod api;
mod config;
mod constants;
pub(crate) mod context;
mod engine;
mod empty;
pub(crate) mod error;
mod logger;
mod types;

#[doc(inline)]
pub use api::{get_tracker, is_started, start_with_configuration, started_instance, GrowingTracker};

#[doc(inline)]
pub use config::CdpTrackConfiguration;

#[doc(inline)]
pub use constants::{
    DEFAULT_DATA_COLLECTION_SERVER_HOST, DEFAULT_SESSION_INTERVAL, MAX_LOGIN_USER_ID_LENGTH,
    MIN_SUPPORTED_API_LEVEL, SDK_VERSION,
};

#[doc(inline)]
pub use context::Location;

#[doc(inline)]
pub use engine::Tracker;

#[doc(inline)]
pub use empty::EmptyGrowingTracker;

#[doc(inline)]
pub use error::{TrackerError, TrackerResult};

#[doc(inline)]
pub use types::{GrowingTrackerApi, ResultCallback};
