use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use crate::event::{CommonProperties, EventType};
use crate::platform::Application;
use crate::tracker::config::CdpTrackConfiguration;
use crate::tracker::constants::SDK_VERSION;
use crate::util::{generate_device_id, generate_session_id};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Mutable tracking state shared by the tracker and its track-main worker.
///
/// Mutated only on the worker, so state changes and event stamping follow posting order.
pub(crate) struct TrackContext {
    application: Application,
    configuration: CdpTrackConfiguration,
    device_id: String,
    data_collection_enabled: AtomicBool,
    state: Mutex<ContextState>,
}

struct ContextState {
    session_id: String,
    last_activity: Option<Instant>,
    user_id: Option<String>,
    location: Option<Location>,
    global_sequence_id: u64,
    event_sequence_ids: HashMap<EventType, u64>,
}

impl TrackContext {
    pub(crate) fn new(application: Application, configuration: CdpTrackConfiguration) -> Self {
        let device_id = application
            .device_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(generate_device_id);
        let data_collection_enabled = configuration.data_collection_enabled();
        Self {
            application,
            configuration,
            device_id,
            data_collection_enabled: AtomicBool::new(data_collection_enabled),
            state: Mutex::new(ContextState {
                session_id: generate_session_id(),
                last_activity: None,
                user_id: None,
                location: None,
                global_sequence_id: 0,
                event_sequence_ids: HashMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    pub(crate) fn application(&self) -> &Application {
        &self.application
    }

    pub(crate) fn configuration(&self) -> &CdpTrackConfiguration {
        &self.configuration
    }

    pub(crate) fn device_id(&self) -> &str {
        &self.device_id
    }

    pub(crate) fn data_collection_enabled(&self) -> bool {
        self.data_collection_enabled.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub(crate) fn set_data_collection_enabled(&self, enabled: bool) -> bool {
        self.data_collection_enabled.swap(enabled, Ordering::SeqCst)
    }

    pub(crate) fn session_id(&self) -> String {
        self.state().session_id.clone()
    }

    pub(crate) fn rotate_session(&self) -> String {
        let mut state = self.state();
        state.session_id = generate_session_id();
        state.last_activity = None;
        state.session_id.clone()
    }

    /// Records activity at `now`. Returns `true` when the idle gap since the previous activity
    /// exceeded the session interval, in which case a new session has been opened.
    pub(crate) fn refresh_session(&self, now: Instant) -> bool {
        let interval = self.configuration.session_interval();
        let mut state = self.state();
        let expired = state
            .last_activity
            .map(|last| now.saturating_duration_since(last) > interval)
            .unwrap_or(false);
        if expired {
            state.session_id = generate_session_id();
        }
        state.last_activity = Some(now);
        expired
    }

    pub(crate) fn user_id(&self) -> Option<String> {
        self.state().user_id.clone()
    }

    /// Returns the previous user id.
    pub(crate) fn set_user_id(&self, user_id: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.state().user_id, user_id)
    }

    pub(crate) fn location(&self) -> Option<Location> {
        self.state().location
    }

    pub(crate) fn set_location(&self, location: Option<Location>) {
        self.state().location = location;
    }

    /// Snapshot of the fields stamped on every event. Advances the global and per-type
    /// sequence counters.
    pub(crate) fn common_properties(&self, event_type: EventType) -> CommonProperties {
        let mut state = self.state();
        state.global_sequence_id += 1;
        let global_sequence_id = state.global_sequence_id;
        let event_sequence_id = {
            let counter = state.event_sequence_ids.entry(event_type).or_insert(0);
            *counter += 1;
            *counter
        };

        CommonProperties {
            device_id: self.device_id.clone(),
            user_id: state.user_id.clone(),
            session_id: state.session_id.clone(),
            project_id: self.configuration.project_id().to_string(),
            domain: self.application.package_name().to_string(),
            url_scheme: self.configuration.url_scheme().to_string(),
            platform: self.application.platform().to_string(),
            platform_version: self.application.api_level().map(|level| level.to_string()),
            sdk_version: SDK_VERSION.to_string(),
            app_version: self.application.app_version().map(str::to_string),
            app_channel: self.configuration.channel().map(str::to_string),
            global_sequence_id,
            event_sequence_id,
            latitude: state.location.map(|l| l.latitude),
            longitude: state.location.map(|l| l.longitude),
        }
    }
}
