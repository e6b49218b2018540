//! Test utilities shared across crate-level unit tests.

use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

use crate::event::{EventType, TrackEvent};
use crate::platform::Application;

static GLOBAL_STATE_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Serializes tests that touch process-wide state: the tracker singleton, the global log level
/// and the user log handler.
pub fn global_test_guard() -> MutexGuard<'static, ()> {
    GLOBAL_STATE_MUTEX
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Application whose main thread is the calling test thread.
pub fn test_application() -> Application {
    Application::new("com.example.shop")
        .with_app_version("1.0.0")
        .with_api_level(30)
}

pub fn sample_event(name: &str) -> TrackEvent {
    TrackEvent {
        event_type: EventType::Custom,
        device_id: "device".into(),
        user_id: None,
        session_id: "session".into(),
        project_id: "project".into(),
        domain: "com.example.shop".into(),
        url_scheme: "growing.abc".into(),
        platform: "linux".into(),
        platform_version: None,
        sdk_version: crate::tracker::SDK_VERSION.into(),
        app_version: None,
        app_channel: None,
        timestamp: 0,
        global_sequence_id: 1,
        event_sequence_id: 1,
        latitude: None,
        longitude: None,
        event_name: Some(name.to_string()),
        attributes: None,
        resource_item: None,
        extra_params: BTreeMap::new(),
    }
}
