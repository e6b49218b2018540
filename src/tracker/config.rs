use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::platform::environment::{default_tracker_config_json, CONFIG_ENV_VAR};
use crate::track_main::EventSink;
use crate::tracker::constants::{DEFAULT_DATA_COLLECTION_SERVER_HOST, DEFAULT_SESSION_INTERVAL};
use crate::tracker::error::{TrackerError, TrackerResult};

/// Start-up configuration for the CDP tracker.
///
/// `project_id`, `url_scheme` and `data_source_id` are required. The remaining fields have
/// defaults and can be adjusted with the `with_*` builders or loaded from JSON.
#[derive(Clone)]
pub struct CdpTrackConfiguration {
    project_id: String,
    url_scheme: String,
    data_source_id: String,
    /// Collector base URL. Validated at start-up and otherwise only read by hosts that upload
    /// events from their own sink.
    data_collection_server_host: String,
    channel: Option<String>,
    debug_enabled: bool,
    data_collection_enabled: bool,
    session_interval: Duration,
    event_sinks: Vec<Arc<dyn EventSink>>,
}

impl CdpTrackConfiguration {
    pub fn new(
        project_id: impl Into<String>,
        url_scheme: impl Into<String>,
        data_source_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            url_scheme: url_scheme.into(),
            data_source_id: data_source_id.into(),
            data_collection_server_host: DEFAULT_DATA_COLLECTION_SERVER_HOST.to_string(),
            channel: None,
            debug_enabled: false,
            data_collection_enabled: true,
            session_interval: DEFAULT_SESSION_INTERVAL,
            event_sinks: Vec::new(),
        }
    }

    /// Parses a configuration from a camelCase JSON object such as
    /// `{"projectId": "...", "urlScheme": "...", "dataSourceId": "..."}`.
    pub fn from_json(raw: &str) -> TrackerResult<Self> {
        let document: ConfigurationDocument = serde_json::from_str(raw)?;
        Ok(document.into())
    }

    /// Loads the configuration from the `GROWINGIO_TRACKER_CONFIG` environment variable.
    pub fn from_env() -> TrackerResult<Self> {
        let map = default_tracker_config_json().ok_or_else(|| {
            TrackerError::InvalidConfiguration {
                message: format!("{CONFIG_ENV_VAR} is not set or not readable"),
            }
        })?;
        Self::from_json_map(map)
    }

    pub(crate) fn from_json_map(map: Map<String, Value>) -> TrackerResult<Self> {
        let document: ConfigurationDocument = serde_json::from_value(Value::Object(map))?;
        Ok(document.into())
    }

    pub fn with_data_collection_server_host(mut self, host: impl Into<String>) -> Self {
        self.data_collection_server_host = host.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_debug_enabled(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    pub fn with_data_collection_enabled(mut self, enabled: bool) -> Self {
        self.data_collection_enabled = enabled;
        self
    }

    pub fn with_session_interval(mut self, interval: Duration) -> Self {
        self.session_interval = interval;
        self
    }

    /// Adds a receiver for every event the tracker builds.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sinks.push(sink);
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn url_scheme(&self) -> &str {
        &self.url_scheme
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    /// The tracker itself never uploads. Hosts that ship events from an [`EventSink`] read the
    /// collector URL from here.
    pub fn data_collection_server_host(&self) -> &str {
        &self.data_collection_server_host
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    pub fn data_collection_enabled(&self) -> bool {
        self.data_collection_enabled
    }

    pub fn session_interval(&self) -> Duration {
        self.session_interval
    }

    pub fn event_sinks(&self) -> &[Arc<dyn EventSink>] {
        &self.event_sinks
    }

    /// Checks the required fields in a fixed order and reports the first failure.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.project_id.is_empty() {
            return Err(TrackerError::EmptyProjectId);
        }
        if self.url_scheme.is_empty() {
            return Err(TrackerError::EmptyUrlScheme);
        }
        if self.data_source_id.is_empty() {
            return Err(TrackerError::EmptyDataSourceId);
        }
        validate_server_host(&self.data_collection_server_host)
    }
}

fn validate_server_host(host: &str) -> TrackerResult<()> {
    let invalid = |reason: String| TrackerError::InvalidServerHost {
        host: host.to_string(),
        reason,
    };
    let url = Url::parse(host).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

impl fmt::Debug for CdpTrackConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpTrackConfiguration")
            .field("project_id", &self.project_id)
            .field("url_scheme", &self.url_scheme)
            .field("data_source_id", &self.data_source_id)
            .field(
                "data_collection_server_host",
                &self.data_collection_server_host,
            )
            .field("channel", &self.channel)
            .field("debug_enabled", &self.debug_enabled)
            .field("data_collection_enabled", &self.data_collection_enabled)
            .field("session_interval", &self.session_interval)
            .field("event_sinks", &self.event_sinks.len())
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationDocument {
    #[serde(default)]
    project_id: String,
    #[serde(default)]
    url_scheme: String,
    #[serde(default)]
    data_source_id: String,
    data_collection_server_host: Option<String>,
    channel: Option<String>,
    #[serde(default)]
    debug_enabled: bool,
    data_collection_enabled: Option<bool>,
    /// Seconds.
    session_interval: Option<u64>,
}

impl From<ConfigurationDocument> for CdpTrackConfiguration {
    fn from(document: ConfigurationDocument) -> Self {
        let mut config = CdpTrackConfiguration::new(
            document.project_id,
            document.url_scheme,
            document.data_source_id,
        )
        .with_debug_enabled(document.debug_enabled);
        if let Some(host) = document.data_collection_server_host {
            config = config.with_data_collection_server_host(host);
        }
        if let Some(channel) = document.channel {
            config = config.with_channel(channel);
        }
        if let Some(enabled) = document.data_collection_enabled {
            config = config.with_data_collection_enabled(enabled);
        }
        if let Some(seconds) = document.session_interval {
            config = config.with_session_interval(Duration::from_secs(seconds));
        }
        config
    }
}
