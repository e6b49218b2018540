use std::collections::BTreeMap;
use std::sync::Arc;

use crate::event::EventBuilder;
use crate::logger::{set_log_level, LogLevel};
use crate::platform::Application;
use crate::track_main::{LoggingEventSink, TrackMain};
use crate::tracker::config::CdpTrackConfiguration;
use crate::tracker::constants::MAX_LOGIN_USER_ID_LENGTH;
use crate::tracker::context::{Location, TrackContext};
use crate::tracker::error::TrackerResult;
use crate::tracker::logger::LOGGER;
use crate::tracker::types::ResultCallback;

/// Tracking engine behind the facade: owns the context and the track-main pipeline.
pub struct Tracker {
    context: Arc<TrackContext>,
    track_main: TrackMain,
}

impl Tracker {
    pub(crate) fn new(
        application: Application,
        configuration: CdpTrackConfiguration,
    ) -> TrackerResult<Self> {
        if configuration.debug_enabled() {
            let _ = set_log_level(LogLevel::Debug);
        }

        let context = Arc::new(TrackContext::new(application, configuration));
        let track_main = TrackMain::start(context.clone())?;
        for sink in context.configuration().event_sinks() {
            track_main.add_event_sink(sink.clone());
        }
        if context.configuration().debug_enabled() {
            track_main.add_event_sink(Arc::new(LoggingEventSink));
        }

        LOGGER.debug(format!(
            "tracker created for {} (device id {})",
            context.application().package_name(),
            context.device_id()
        ));
        Ok(Self {
            context,
            track_main,
        })
    }

    /// Opens the first session by posting a `VISIT`. Call after interceptors are registered.
    pub(crate) fn launch(&self) {
        self.track_main.post_event(EventBuilder::visit());
    }

    pub fn track_main(&self) -> &TrackMain {
        &self.track_main
    }

    pub fn configuration(&self) -> &CdpTrackConfiguration {
        self.context.configuration()
    }

    pub fn session_id(&self) -> String {
        self.context.session_id()
    }

    pub fn login_user_id(&self) -> Option<String> {
        self.context.user_id()
    }

    pub fn location(&self) -> Option<Location> {
        self.context.location()
    }

    /// Setting as last applied by the track-main worker.
    pub fn data_collection_enabled(&self) -> bool {
        self.context.data_collection_enabled()
    }

    pub fn track_custom_event(
        &self,
        event_name: &str,
        attributes: Option<&BTreeMap<String, String>>,
    ) {
        if event_name.is_empty() {
            LOGGER.error("trackCustomEvent: eventName is NULL");
            return;
        }
        self.track_main
            .post_event(EventBuilder::custom(event_name).with_attributes(attributes));
    }

    pub fn set_login_user_attributes(&self, attributes: &BTreeMap<String, String>) {
        if attributes.is_empty() {
            LOGGER.error("setLoginUserAttributes: attributes is NULL");
            return;
        }
        self.track_main
            .post_event(EventBuilder::login_user_attributes(attributes));
    }

    /// Sets the login user. An empty id clears it; switching from one user to another opens a
    /// new session.
    pub fn set_login_user_id(&self, user_id: &str) {
        if user_id.is_empty() {
            self.clean_login_user_id();
            return;
        }
        if user_id.chars().count() > MAX_LOGIN_USER_ID_LENGTH {
            LOGGER.error(format!(
                "setLoginUserId: userId is longer than {MAX_LOGIN_USER_ID_LENGTH} characters"
            ));
            return;
        }

        let user_id = user_id.to_string();
        self.track_main.post_action(move |ctx| {
            match ctx.set_user_id(Some(user_id.clone())) {
                Some(previous) if previous != user_id => {
                    LOGGER.debug("login user changed, opening a new session");
                    ctx.rotate_session();
                    Some(EventBuilder::visit())
                }
                _ => None,
            }
        });
    }

    pub fn clean_login_user_id(&self) {
        self.track_main.post_action(|ctx| {
            ctx.set_user_id(None);
            None
        });
    }

    pub fn set_location(&self, latitude: f64, longitude: f64) {
        if !valid_coordinates(latitude, longitude) {
            LOGGER.error(format!(
                "setLocation: invalid coordinates ({latitude}, {longitude})"
            ));
            return;
        }
        self.track_main.post_action(move |ctx| {
            ctx.set_location(Some(Location {
                latitude,
                longitude,
            }));
            None
        });
    }

    pub fn clean_location(&self) {
        self.track_main.post_action(|ctx| {
            ctx.set_location(None);
            None
        });
    }

    /// Applied on the track-main worker in call order: events posted before this call are
    /// judged by the old setting, later ones by the new. Turning collection back on opens a new
    /// session with a `VISIT`.
    pub fn set_data_collection_enabled(&self, enabled: bool) {
        self.track_main.post_action(move |ctx| {
            if ctx.set_data_collection_enabled(enabled) == enabled {
                return None;
            }
            LOGGER.info(format!("data collection enabled: {enabled}"));
            if !enabled {
                return None;
            }
            ctx.rotate_session();
            Some(EventBuilder::visit())
        });
    }

    /// Answers on the track-main worker once all earlier calls have been applied.
    pub fn device_id(&self, callback: ResultCallback<String>) {
        self.track_main.post_action(move |ctx| {
            callback(Some(ctx.device_id().to_string()));
            None
        });
    }

    /// Waits until every call made so far has been processed.
    pub fn flush(&self) {
        self.track_main.flush();
    }
}

fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude.abs() <= 90.0
        && longitude.abs() <= 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::logger::{
        log_level, set_user_log_handler, set_user_log_handler_fn, LogCallbackParams,
    };
    use crate::test_support::{global_test_guard, test_application};
    use std::sync::Mutex;
    use crate::track_main::MemoryEventSink;

    fn tracker_with(config: CdpTrackConfiguration) -> (Tracker, Arc<MemoryEventSink>) {
        let sink = Arc::new(MemoryEventSink::new());
        let tracker = Tracker::new(test_application(), config.with_event_sink(sink.clone())).unwrap();
        (tracker, sink)
    }

    fn tracker() -> (Tracker, Arc<MemoryEventSink>) {
        tracker_with(CdpTrackConfiguration::new("project", "growing.abc", "ds"))
    }

    fn attributes(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn launch_posts_visit() {
        let (tracker, sink) = tracker();
        tracker.launch();
        tracker.flush();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Visit);
        assert_eq!(events[0].session_id, tracker.session_id());
        assert_eq!(events[0].domain, "com.example.shop");
    }

    #[test]
    fn custom_event_carries_copied_attributes() {
        let (tracker, sink) = tracker();
        let mut attrs = attributes(&[("plan", "pro")]);
        tracker.track_custom_event("upgrade", Some(&attrs));
        attrs.insert("plan".into(), "free".into());
        tracker.flush();

        let event = &sink.events()[0];
        assert_eq!(event.event_type, EventType::Custom);
        assert_eq!(event.event_name.as_deref(), Some("upgrade"));
        assert_eq!(event.attributes, Some(attributes(&[("plan", "pro")])));
    }

    #[test]
    fn empty_event_name_is_ignored() {
        let (tracker, sink) = tracker();
        tracker.track_custom_event("", None);
        tracker.flush();
        assert!(sink.is_empty());
    }

    #[test]
    fn login_user_attributes_require_entries() {
        let (tracker, sink) = tracker();
        tracker.set_login_user_attributes(&BTreeMap::new());
        tracker.set_login_user_attributes(&attributes(&[("gender", "f")]));
        tracker.flush();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::LoginUserAttributes);
        assert_eq!(events[0].attributes, Some(attributes(&[("gender", "f")])));
    }

    #[test]
    fn first_login_keeps_the_session() {
        let (tracker, sink) = tracker();
        tracker.launch();
        tracker.flush();
        let session = tracker.session_id();

        tracker.set_login_user_id("alice");
        tracker.track_custom_event("buy", None);
        tracker.flush();

        assert_eq!(tracker.session_id(), session);
        assert_eq!(tracker.login_user_id().as_deref(), Some("alice"));
        let last = sink.events().pop().unwrap();
        assert_eq!(last.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn switching_users_opens_a_new_session() {
        let (tracker, sink) = tracker();
        tracker.set_login_user_id("alice");
        tracker.flush();
        let session = tracker.session_id();

        tracker.set_login_user_id("alice");
        tracker.flush();
        assert_eq!(tracker.session_id(), session);
        assert!(sink.is_empty());

        tracker.set_login_user_id("bob");
        tracker.flush();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Visit);
        assert_eq!(events[0].user_id.as_deref(), Some("bob"));
        assert_ne!(events[0].session_id, session);
    }

    #[test]
    fn empty_user_id_clears_without_new_session() {
        let (tracker, _sink) = tracker();
        tracker.set_login_user_id("alice");
        tracker.flush();
        let session = tracker.session_id();

        tracker.set_login_user_id("");
        tracker.flush();
        assert_eq!(tracker.login_user_id(), None);
        assert_eq!(tracker.session_id(), session);

        tracker.set_login_user_id("bob");
        tracker.flush();
        assert_eq!(tracker.session_id(), session);
    }

    #[test]
    fn overlong_user_id_is_rejected() {
        let (tracker, _sink) = tracker();
        tracker.set_login_user_id(&"x".repeat(MAX_LOGIN_USER_ID_LENGTH + 1));
        tracker.flush();
        assert_eq!(tracker.login_user_id(), None);
    }

    #[test]
    fn location_is_validated_and_cleared() {
        let (tracker, _sink) = tracker();
        tracker.set_location(95.0, 10.0);
        tracker.set_location(f64::NAN, 10.0);
        tracker.flush();
        assert_eq!(tracker.location(), None);

        tracker.set_location(31.23, 121.47);
        tracker.flush();
        assert_eq!(
            tracker.location(),
            Some(Location {
                latitude: 31.23,
                longitude: 121.47
            })
        );

        tracker.clean_location();
        tracker.flush();
        assert_eq!(tracker.location(), None);
    }

    #[test]
    fn data_collection_toggle() {
        let (tracker, sink) = tracker();
        let session = tracker.session_id();

        tracker.set_data_collection_enabled(false);
        tracker.track_custom_event("hidden", None);
        tracker.flush();
        assert!(sink.is_empty());

        tracker.set_data_collection_enabled(true);
        tracker.track_custom_event("shown", None);
        tracker.flush();

        let events = sink.events();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::Visit, EventType::Custom]);
        assert_ne!(events[0].session_id, session);
    }

    #[test]
    fn enabling_twice_is_a_no_op() {
        let (tracker, sink) = tracker();
        tracker.set_data_collection_enabled(true);
        tracker.flush();
        assert!(sink.is_empty());
    }

    #[test]
    fn initially_disabled_collection_suppresses_launch_visit() {
        let (tracker, sink) = tracker_with(
            CdpTrackConfiguration::new("project", "growing.abc", "ds")
                .with_data_collection_enabled(false),
        );
        tracker.launch();
        tracker.flush();
        assert!(!tracker.data_collection_enabled());
        assert!(sink.is_empty());
    }

    #[test]
    fn device_id_is_answered_on_the_worker() {
        let sink = Arc::new(MemoryEventSink::new());
        let tracker = Tracker::new(
            test_application().with_device_id("device-7"),
            CdpTrackConfiguration::new("project", "growing.abc", "ds").with_event_sink(sink),
        )
        .unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        tracker.device_id(Box::new(move |id| tx.send(id).unwrap()));
        assert_eq!(rx.recv().unwrap().as_deref(), Some("device-7"));
    }

    #[test]
    fn collection_toggles_apply_in_call_order() {
        let (tracker, sink) = tracker();
        let session = tracker.session_id();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        tracker.track_main().post_action(move |_| {
            let _ = release_rx.recv();
            None
        });

        tracker.set_data_collection_enabled(false);
        assert!(tracker.data_collection_enabled());
        tracker.track_custom_event("hidden", None);
        tracker.set_data_collection_enabled(true);
        tracker.track_custom_event("shown", None);
        release_tx.send(()).unwrap();
        tracker.flush();

        let events = sink.events();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::Visit, EventType::Custom]);
        assert_eq!(events[1].event_name.as_deref(), Some("shown"));
        assert_eq!(events[0].session_id, events[1].session_id);
        assert_ne!(events[0].session_id, session);
    }

    #[test]
    fn debug_mode_raises_log_level_and_logs_events() {
        let _guard = global_test_guard();
        let records = Arc::new(Mutex::new(Vec::new()));
        let captured = records.clone();
        set_user_log_handler_fn(
            Some(move |params: LogCallbackParams| {
                if params.tag == "EventSink" && params.level == LogLevel::Debug {
                    captured.lock().unwrap().push(params.message);
                }
            }),
            None,
        );

        let (tracker, sink) = tracker_with(
            CdpTrackConfiguration::new("project", "growing.abc", "ds").with_debug_enabled(true),
        );
        let level = log_level();
        tracker.track_custom_event("debugged", None);
        tracker.flush();

        set_user_log_handler(None, None);
        set_log_level(LogLevel::Info).unwrap();

        assert_eq!(level, LogLevel::Debug);
        assert_eq!(sink.len(), 1);
        let records = records.lock().unwrap();
        assert!(records
            .iter()
            .any(|message| message.contains("CUSTOM event built") && message.contains("debugged")));
    }

    #[test]
    fn release_mode_leaves_log_level_alone() {
        let _guard = global_test_guard();
        let _tracker = tracker();
        assert_eq!(log_level(), LogLevel::Info);
    }
}
