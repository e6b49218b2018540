//! Events tracked while data collection is disabled are dropped. Re-enabling opens a new
//! session.

use std::sync::Arc;

use growingio_tracker_cdp::platform::Application;
use growingio_tracker_cdp::track_main::MemoryEventSink;
use growingio_tracker_cdp::tracker::{
    get_tracker, start_with_configuration, started_instance, CdpTrackConfiguration,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sink = Arc::new(MemoryEventSink::new());
    let configuration =
        CdpTrackConfiguration::new("your-project-id", "growing.your-scheme", "your-data-source")
            .with_event_sink(sink.clone());
    start_with_configuration(Application::new("com.example.shop"), configuration)?;

    let tracker = get_tracker();
    tracker.set_data_collection_enabled(false);
    tracker.track_custom_event("not_recorded");
    tracker.device_id(Box::new(|id| println!("device id: {id:?}")));
    tracker.set_data_collection_enabled(true);
    tracker.track_custom_event("recorded");

    if let Some(started) = started_instance() {
        started.flush();
    }
    for event in sink.events() {
        println!("{} {:?} {}", event.event_type, event.event_name, event.session_id);
    }
    Ok(())
}
