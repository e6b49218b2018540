//! Shows how login changes and location updates are reflected on events.

use std::sync::Arc;

use growingio_tracker_cdp::logger::{set_log_level, LogLevel};
use growingio_tracker_cdp::platform::Application;
use growingio_tracker_cdp::track_main::MemoryEventSink;
use growingio_tracker_cdp::tracker::{
    get_tracker, start_with_configuration, started_instance, CdpTrackConfiguration,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    set_log_level(LogLevel::Debug)?;
    let sink = Arc::new(MemoryEventSink::new());
    let configuration =
        CdpTrackConfiguration::new("your-project-id", "growing.your-scheme", "your-data-source")
            .with_event_sink(sink.clone());
    start_with_configuration(
        Application::new("com.example.shop").with_device_id("demo-device"),
        configuration,
    )?;

    let tracker = get_tracker();
    tracker.set_login_user_id("alice");
    tracker.set_location(31.2304, 121.4737);
    tracker.track_custom_event("browse");

    // Switching users opens a new session.
    tracker.set_login_user_id("bob");
    tracker.clean_location();
    tracker.track_custom_event("browse");

    if let Some(started) = started_instance() {
        started.flush();
    }
    for event in sink.events() {
        println!(
            "{:<22} session={} user={:?} gioId={:?} location={:?}",
            event.event_type.as_str(),
            event.session_id,
            event.user_id,
            event.extra_params.get("gioId"),
            event.latitude.zip(event.longitude),
        );
    }
    Ok(())
}
