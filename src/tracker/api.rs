use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use crate::cdp::CdpEventBuildInterceptor;
use crate::event::{EventBuilder, ResourceItem};
use crate::platform::Application;
use crate::tracker::config::CdpTrackConfiguration;
use crate::tracker::constants::{MIN_SUPPORTED_API_LEVEL, SDK_VERSION};
use crate::tracker::engine::Tracker;
use crate::tracker::empty::EmptyGrowingTracker;
use crate::tracker::error::{TrackerError, TrackerResult};
use crate::tracker::logger::LOGGER;
use crate::tracker::types::{GrowingTrackerApi, ResultCallback};

static INSTANCE: LazyLock<RwLock<Option<Arc<GrowingTracker>>>> =
    LazyLock::new(|| RwLock::new(None));

// Serializes start-up. `INSTANCE` itself is never held while logging: user log handlers may call
// back into the facade.
static START_LOCK: Mutex<()> = Mutex::new(());

/// The started, process-wide tracker.
pub struct GrowingTracker {
    tracker: Tracker,
}

impl GrowingTracker {
    fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn configuration(&self) -> &CdpTrackConfiguration {
        self.tracker.configuration()
    }

    /// Waits until the track-main worker has processed every call made so far.
    pub fn flush(&self) {
        self.tracker.flush();
    }
}

/// Starts the process-wide tracker.
///
/// Must be called on the application's main thread. Invalid configuration is reported as an
/// error and nothing is started. A second call, or a call on an unsupported API level, is
/// logged and otherwise ignored.
pub fn start_with_configuration(
    application: Application,
    configuration: CdpTrackConfiguration,
) -> TrackerResult<()> {
    if is_started() {
        LOGGER.error("GrowingTracker is running");
        return Ok(());
    }

    let _starting = START_LOCK
        .lock()
        .unwrap_or_else(|poison| poison.into_inner());
    if is_started() {
        LOGGER.error("GrowingTracker is running");
        return Ok(());
    }

    if application.package_name().is_empty() {
        return Err(TrackerError::InvalidApplication);
    }
    configuration.validate()?;
    if !application.running_on_main_thread() {
        return Err(TrackerError::NotOnMainThread);
    }
    if let Some(level) = application.api_level() {
        if level < MIN_SUPPORTED_API_LEVEL {
            LOGGER.error(format!(
                "GrowingTracker does not support API levels below {MIN_SUPPORTED_API_LEVEL} (found {level})"
            ));
            return Ok(());
        }
    }

    let data_source_id = configuration.data_source_id().to_string();
    let tracker = Tracker::new(application, configuration)?;
    tracker
        .track_main()
        .add_event_build_interceptor(Arc::new(CdpEventBuildInterceptor::new(data_source_id)));
    tracker.launch();
    publish(Arc::new(GrowingTracker::new(tracker)));

    LOGGER.info(
        "!!! Thank you very much for using GrowingIO. We will do our best to provide you with the best service. !!!",
    );
    LOGGER.info(format!("!!! GrowingIO Tracker version: {SDK_VERSION} !!!"));
    Ok(())
}

fn publish(tracker: Arc<GrowingTracker>) {
    *INSTANCE
        .write()
        .unwrap_or_else(|poison| poison.into_inner()) = Some(tracker);
}

/// Returns the started tracker, or a shared no-op tracker (with an error logged) before
/// [`start_with_configuration`] has succeeded.
pub fn get_tracker() -> Arc<dyn GrowingTrackerApi> {
    if let Some(tracker) = started_instance() {
        return tracker;
    }
    let instance = INSTANCE
        .write()
        .unwrap_or_else(|poison| poison.into_inner())
        .clone();
    match instance {
        Some(tracker) => tracker as Arc<dyn GrowingTrackerApi>,
        None => make_empty(),
    }
}

/// Returns the started tracker, if any.
pub fn started_instance() -> Option<Arc<GrowingTracker>> {
    INSTANCE
        .read()
        .unwrap_or_else(|poison| poison.into_inner())
        .clone()
}

pub fn is_started() -> bool {
    started_instance().is_some()
}

fn make_empty() -> Arc<dyn GrowingTrackerApi> {
    LOGGER.error("GrowingTracker is UNINITIALIZED, please initialized before use API");
    EmptyGrowingTracker::shared()
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
    let previous = INSTANCE
        .write()
        .unwrap_or_else(|poison| poison.into_inner())
        .take();
    if let Some(previous) = previous {
        previous.flush();
    }
}

impl GrowingTrackerApi for GrowingTracker {
    fn track_custom_event(&self, event_name: &str) {
        self.tracker.track_custom_event(event_name, None);
    }

    fn track_custom_event_with_attributes(
        &self,
        event_name: &str,
        attributes: &BTreeMap<String, String>,
    ) {
        self.tracker.track_custom_event(event_name, Some(attributes));
    }

    fn track_custom_event_with_item(&self, event_name: &str, item_key: &str, item_id: &str) {
        self.track_custom_event_with_attributes_and_item(event_name, None, item_key, item_id);
    }

    fn track_custom_event_with_attributes_and_item(
        &self,
        event_name: &str,
        attributes: Option<&BTreeMap<String, String>>,
        item_key: &str,
        item_id: &str,
    ) {
        if item_key.is_empty() || item_id.is_empty() {
            LOGGER.error("trackCustomEvent: itemKey or itemId is NULL");
            return;
        }
        if event_name.is_empty() {
            LOGGER.error("trackCustomEvent: eventName is NULL");
            return;
        }

        self.tracker.track_main().post_event(
            EventBuilder::custom(event_name)
                .with_attributes(attributes)
                .with_resource_item(ResourceItem::new(item_key, item_id)),
        );
    }

    fn set_login_user_attributes(&self, attributes: &BTreeMap<String, String>) {
        self.tracker.set_login_user_attributes(attributes);
    }

    fn device_id(&self, callback: ResultCallback<String>) {
        self.tracker.device_id(callback);
    }

    fn set_data_collection_enabled(&self, enabled: bool) {
        self.tracker.set_data_collection_enabled(enabled);
    }

    fn set_login_user_id(&self, user_id: &str) {
        self.tracker.set_login_user_id(user_id);
    }

    fn clean_login_user_id(&self) {
        self.tracker.clean_login_user_id();
    }

    fn set_location(&self, latitude: f64, longitude: f64) {
        self.tracker.set_location(latitude, longitude);
    }

    fn clean_location(&self) {
        self.tracker.clean_location();
    }
}
