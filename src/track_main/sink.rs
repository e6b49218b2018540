use std::collections::VecDeque;
use std::sync::{LazyLock, Mutex};

use crate::event::TrackEvent;
use crate::logger::Logger;

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("EventSink"));

/// Receiver of built events. Called on the track-main worker thread.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &TrackEvent);
}

pub const DEFAULT_MEMORY_SINK_CAPACITY: usize = 1000;

/// Keeps the most recent events in memory.
#[derive(Debug)]
pub struct MemoryEventSink {
    capacity: usize,
    events: Mutex<VecDeque<TrackEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_SINK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::new()),
        }
    }

    pub fn events(&self) -> Vec<TrackEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Returns and clears the retained events.
    pub fn take(&self) -> Vec<TrackEvent> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<TrackEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Default for MemoryEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemoryEventSink {
    fn on_event(&self, event: &TrackEvent) {
        let mut events = self.lock();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Logs each event as JSON at debug level. Installed automatically in debug mode.
#[derive(Debug, Default)]
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn on_event(&self, event: &TrackEvent) {
        match event.to_json() {
            Ok(json) => LOGGER.debug(format!("{} event built: {json}", event.event_type)),
            Err(err) => LOGGER.warn(format!(
                "unable to serialize {} event: {err}",
                event.event_type
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_event;

    #[test]
    fn memory_sink_drops_oldest_beyond_capacity() {
        let sink = MemoryEventSink::with_capacity(2);
        for name in ["a", "b", "c"] {
            sink.on_event(&sample_event(name));
        }

        let names: Vec<_> = sink
            .events()
            .into_iter()
            .map(|event| event.event_name.unwrap())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn take_clears_the_sink() {
        let sink = MemoryEventSink::new();
        sink.on_event(&sample_event("a"));
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }
}
