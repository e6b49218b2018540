use crate::event::{EventBuilder, TrackEvent};

/// Hook invoked by the track-main worker around building each event.
///
/// Interceptors run in registration order on the worker thread.
pub trait EventBuildInterceptor: Send + Sync {
    /// Called before the common properties are stamped. Typically adds extra parameters.
    fn event_will_build(&self, _builder: &mut EventBuilder) {}

    fn event_did_build(&self, _event: &TrackEvent) {}
}
