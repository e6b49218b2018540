//! Event model: types, resource items and the builder completed on the track-main worker.

mod builder;
mod types;

pub(crate) use builder::CommonProperties;
pub use builder::EventBuilder;
pub use types::{EventType, ResourceItem, TrackEvent, RESERVED_EVENT_KEYS};
