//! Background event pipeline.
//!
//! A single worker thread consumes an unbounded FIFO channel. Event builders posted to it are
//! completed there: interceptors run, the tracking context stamps the common properties, and
//! the built event is handed to every registered [`EventSink`]. The worker stops when its
//! [`TrackMain`] handle is dropped.
//!
//! Events are checked against the data-collection flag when the worker reaches them, so a toggle
//! posted as an action affects exactly the events posted after it.

mod interceptor;
mod sink;

use std::sync::{Arc, LazyLock, RwLock};
use std::thread::{self, ThreadId};
use std::time::Instant;

use async_channel::{Receiver, Sender};

use crate::event::{EventBuilder, EventType};
use crate::logger::Logger;
use crate::tracker::context::TrackContext;
use crate::tracker::error::{TrackerError, TrackerResult};

pub use interceptor::EventBuildInterceptor;
pub use sink::{EventSink, LoggingEventSink, MemoryEventSink, DEFAULT_MEMORY_SINK_CAPACITY};

const WORKER_THREAD_NAME: &str = "growingio-track-main";

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("TrackMain"));

/// Work run on the worker. A returned builder is processed right away, ahead of anything
/// posted after the action.
pub(crate) type TrackAction = Box<dyn FnOnce(&TrackContext) -> Option<EventBuilder> + Send + 'static>;

enum TrackCommand {
    Event(EventBuilder),
    Action(TrackAction),
    Flush(Sender<()>),
}

struct TrackMainShared {
    context: Arc<TrackContext>,
    interceptors: RwLock<Vec<Arc<dyn EventBuildInterceptor>>>,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

pub struct TrackMain {
    shared: Arc<TrackMainShared>,
    sender: Sender<TrackCommand>,
    worker: ThreadId,
}

impl TrackMain {
    pub(crate) fn start(context: Arc<TrackContext>) -> TrackerResult<Self> {
        let shared = Arc::new(TrackMainShared {
            context,
            interceptors: RwLock::new(Vec::new()),
            sinks: RwLock::new(Vec::new()),
        });
        let (sender, receiver) = async_channel::unbounded();

        let worker_shared = shared.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(worker_shared, receiver))
            .map_err(|err| TrackerError::WorkerUnavailable {
                message: err.to_string(),
            })?;

        Ok(Self {
            shared,
            sender,
            worker: handle.thread().id(),
        })
    }

    /// Queues an event for building. The event is dropped if data collection is disabled by the
    /// time the worker reaches it.
    pub fn post_event(&self, builder: EventBuilder) {
        self.send(TrackCommand::Event(builder));
    }

    /// Runs `action` on the worker, after everything posted before it.
    pub(crate) fn post_action<F>(&self, action: F)
    where
        F: FnOnce(&TrackContext) -> Option<EventBuilder> + Send + 'static,
    {
        self.send(TrackCommand::Action(Box::new(action)));
    }

    pub fn add_event_build_interceptor(&self, interceptor: Arc<dyn EventBuildInterceptor>) {
        self.shared
            .interceptors
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(interceptor);
    }

    pub fn remove_event_build_interceptor(&self, interceptor: &Arc<dyn EventBuildInterceptor>) {
        let target = Arc::as_ptr(interceptor) as *const ();
        self.shared
            .interceptors
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
            .retain(|existing| Arc::as_ptr(existing) as *const () != target);
    }

    pub fn add_event_sink(&self, sink: Arc<dyn EventSink>) {
        self.shared
            .sinks
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(sink);
    }

    /// Blocks until every command posted before this call has been processed.
    ///
    /// Returns immediately when called from the worker thread.
    pub fn flush(&self) {
        if thread::current().id() == self.worker {
            return;
        }
        let (done_tx, done_rx) = async_channel::bounded(1);
        if self.sender.try_send(TrackCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.recv_blocking();
    }

    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker
    }

    fn send(&self, command: TrackCommand) {
        if self.sender.try_send(command).is_err() {
            LOGGER.error("track-main worker is no longer running");
        }
    }
}

fn run_worker(shared: Arc<TrackMainShared>, receiver: Receiver<TrackCommand>) {
    LOGGER.debug("track-main worker started");
    while let Ok(command) = receiver.recv_blocking() {
        match command {
            TrackCommand::Event(builder) => process_event(&shared, builder),
            TrackCommand::Action(action) => {
                if let Some(builder) = action(&shared.context) {
                    process_event(&shared, builder);
                }
            }
            TrackCommand::Flush(done) => {
                let _ = done.try_send(());
            }
        }
    }
    LOGGER.debug("track-main worker stopped");
}

fn process_event(shared: &TrackMainShared, builder: EventBuilder) {
    if !shared.context.data_collection_enabled() {
        LOGGER.debug(format!(
            "data collection disabled, dropping {} event",
            builder.event_type()
        ));
        return;
    }
    if shared.context.refresh_session(Instant::now()) && builder.event_type() != EventType::Visit
    {
        LOGGER.debug("session expired, opening a new session");
        deliver(shared, EventBuilder::visit());
    }
    deliver(shared, builder);
}

fn deliver(shared: &TrackMainShared, mut builder: EventBuilder) {
    let interceptors = shared
        .interceptors
        .read()
        .unwrap_or_else(|poison| poison.into_inner())
        .clone();
    for interceptor in &interceptors {
        interceptor.event_will_build(&mut builder);
    }

    let common = shared.context.common_properties(builder.event_type());
    let event = builder.build(common);

    for interceptor in &interceptors {
        interceptor.event_did_build(&event);
    }

    let sinks = shared
        .sinks
        .read()
        .unwrap_or_else(|poison| poison.into_inner())
        .clone();
    for sink in &sinks {
        sink.on_event(&event);
    }
}
