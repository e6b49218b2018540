//! Starts the tracker and records a few custom events, printing every built event as JSON.

use std::collections::BTreeMap;
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
    tracker.track_custom_event("app_opened");

    let attributes = BTreeMap::from([
        ("price".to_string(), "19.90".to_string()),
        ("currency".to_string(), "CNY".to_string()),
    ]);
    tracker.track_custom_event_with_attributes_and_item("purchase", Some(&attributes), "sku", "A-1024");

    if let Some(started) = started_instance() {
        started.flush();
    }
    for event in sink.events() {
        println!("{}", event.to_json()?);
    }
    Ok(())
}
