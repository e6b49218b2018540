use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Visit,
    Custom,
    LoginUserAttributes,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Visit => "VISIT",
            EventType::Custom => "CUSTOM",
            EventType::LoginUserAttributes => "LOGIN_USER_ATTRIBUTES",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business entity a custom event refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceItem {
    key: String,
    id: String,
}

impl ResourceItem {
    pub fn new(key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            id: id.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// JSON keys written by [`TrackEvent`] itself. Extra parameters may not reuse them.
pub const RESERVED_EVENT_KEYS: &[&str] = &[
    "eventType",
    "deviceId",
    "userId",
    "sessionId",
    "projectKey",
    "domain",
    "urlScheme",
    "platform",
    "platformVersion",
    "sdkVersion",
    "appVersion",
    "appChannel",
    "timestamp",
    "globalSequenceId",
    "eventSequenceId",
    "latitude",
    "longitude",
    "eventName",
    "attributes",
    "resourceItem",
];

/// A fully built event as delivered to event sinks.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub event_type: EventType,
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub session_id: String,
    #[serde(rename = "projectKey")]
    pub project_id: String,
    pub domain: String,
    pub url_scheme: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    pub sdk_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_channel: Option<String>,
    /// Milliseconds since the Unix epoch, taken when the event was posted.
    pub timestamp: i64,
    pub global_sequence_id: u64,
    pub event_sequence_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_item: Option<ResourceItem>,
    /// Interceptor-provided keys, flattened into the event object. Never one of
    /// [`RESERVED_EVENT_KEYS`].
    #[serde(flatten)]
    pub extra_params: BTreeMap<String, String>,
}

impl TrackEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
