use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::Utc;

use crate::event::types::{EventType, ResourceItem, TrackEvent, RESERVED_EVENT_KEYS};
use crate::logger::Logger;

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("EventBuilder"));

/// Context-derived fields stamped on an event by the track-main worker.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CommonProperties {
    pub device_id: String,
    pub user_id: Option<String>,
    pub session_id: String,
    pub project_id: String,
    pub domain: String,
    pub url_scheme: String,
    pub platform: String,
    pub platform_version: Option<String>,
    pub sdk_version: String,
    pub app_version: Option<String>,
    pub app_channel: Option<String>,
    pub global_sequence_id: u64,
    pub event_sequence_id: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// An event that has been requested but not yet built.
///
/// Builders are created on the caller's thread and completed on the track-main worker, where
/// interceptors may add extra parameters before the common properties are stamped.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBuilder {
    event_type: EventType,
    event_name: Option<String>,
    attributes: Option<BTreeMap<String, String>>,
    resource_item: Option<ResourceItem>,
    timestamp: i64,
    extra_params: BTreeMap<String, String>,
}

impl EventBuilder {
    fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            event_name: None,
            attributes: None,
            resource_item: None,
            timestamp: Utc::now().timestamp_millis(),
            extra_params: BTreeMap::new(),
        }
    }

    pub fn visit() -> Self {
        Self::new(EventType::Visit)
    }

    pub fn custom(event_name: impl Into<String>) -> Self {
        let mut builder = Self::new(EventType::Custom);
        builder.event_name = Some(event_name.into());
        builder
    }

    pub fn login_user_attributes(attributes: &BTreeMap<String, String>) -> Self {
        let mut builder = Self::new(EventType::LoginUserAttributes);
        builder.attributes = Some(attributes.clone());
        builder
    }

    /// Copies the given attributes into the builder.
    pub fn with_attributes(mut self, attributes: Option<&BTreeMap<String, String>>) -> Self {
        self.attributes = attributes.cloned();
        self
    }

    pub fn with_resource_item(mut self, item: ResourceItem) -> Self {
        self.resource_item = Some(item);
        self
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }

    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        self.attributes.as_ref()
    }

    pub fn resource_item(&self) -> Option<&ResourceItem> {
        self.resource_item.as_ref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Adds a parameter serialized next to the built-in fields. Keys listed in
    /// [`RESERVED_EVENT_KEYS`] are rejected with a warning and `false` is returned.
    pub fn add_extra_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if RESERVED_EVENT_KEYS.contains(&key.as_str()) {
            LOGGER.warn(format!(
                "extra parameter `{key}` collides with a built-in event field and was ignored"
            ));
            return false;
        }
        self.extra_params.insert(key, value.into());
        true
    }

    pub fn extra_params(&self) -> &BTreeMap<String, String> {
        &self.extra_params
    }

    pub(crate) fn build(self, common: CommonProperties) -> TrackEvent {
        TrackEvent {
            event_type: self.event_type,
            device_id: common.device_id,
            user_id: common.user_id,
            session_id: common.session_id,
            project_id: common.project_id,
            domain: common.domain,
            url_scheme: common.url_scheme,
            platform: common.platform,
            platform_version: common.platform_version,
            sdk_version: common.sdk_version,
            app_version: common.app_version,
            app_channel: common.app_channel,
            timestamp: self.timestamp,
            global_sequence_id: common.global_sequence_id,
            event_sequence_id: common.event_sequence_id,
            latitude: common.latitude,
            longitude: common.longitude,
            event_name: self.event_name,
            attributes: self.attributes,
            resource_item: self.resource_item,
            extra_params: self.extra_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> CommonProperties {
        CommonProperties {
            device_id: "device".into(),
            user_id: Some("user-1".into()),
            session_id: "session".into(),
            project_id: "project".into(),
            domain: "com.example.shop".into(),
            url_scheme: "growing.abc".into(),
            platform: "linux".into(),
            platform_version: None,
            sdk_version: "1.0.0".into(),
            app_version: Some("2.1".into()),
            app_channel: None,
            global_sequence_id: 7,
            event_sequence_id: 3,
            latitude: Some(31.2),
            longitude: Some(121.5),
        }
    }

    #[test]
    fn builder_copies_attributes() {
        let mut attributes = BTreeMap::from([("color".to_string(), "red".to_string())]);
        let builder = EventBuilder::custom("buy").with_attributes(Some(&attributes));
        attributes.insert("color".into(), "blue".into());

        assert_eq!(
            builder.attributes().unwrap().get("color"),
            Some(&"red".to_string())
        );
    }

    #[test]
    fn build_merges_common_properties() {
        let mut builder = EventBuilder::custom("buy")
            .with_resource_item(ResourceItem::new("sku", "42"));
        builder.add_extra_param("dataSourceId", "ds");
        let timestamp = builder.timestamp();

        let event = builder.build(common());

        assert_eq!(event.event_type, EventType::Custom);
        assert_eq!(event.event_name.as_deref(), Some("buy"));
        assert_eq!(event.resource_item, Some(ResourceItem::new("sku", "42")));
        assert_eq!(event.timestamp, timestamp);
        assert_eq!(event.global_sequence_id, 7);
        assert_eq!(event.event_sequence_id, 3);
        assert_eq!(event.extra_params.get("dataSourceId"), Some(&"ds".to_string()));
    }

    #[test]
    fn serializes_with_cdp_field_names() {
        let mut builder = EventBuilder::custom("buy")
            .with_resource_item(ResourceItem::new("sku", "42"));
        builder.add_extra_param("dataSourceId", "ds");
        let json: serde_json::Value =
            serde_json::from_str(&builder.build(common()).to_json().unwrap()).unwrap();

        assert_eq!(json["eventType"], "CUSTOM");
        assert_eq!(json["projectKey"], "project");
        assert_eq!(json["eventName"], "buy");
        assert_eq!(json["resourceItem"]["key"], "sku");
        assert_eq!(json["dataSourceId"], "ds");
        assert_eq!(json["globalSequenceId"], 7);
        assert!(json.get("attributes").is_none());
        assert!(json.get("appChannel").is_none());
    }

    #[test]
    fn reserved_keys_cannot_shadow_built_in_fields() {
        let mut builder = EventBuilder::custom("buy");
        assert!(!builder.add_extra_param("sessionId", "forged"));
        assert!(!builder.add_extra_param("eventType", "VISIT"));
        assert!(builder.add_extra_param("campaign", "spring"));

        let json = builder.build(common()).to_json().unwrap();
        assert_eq!(json.matches("\"sessionId\"").count(), 1);
        assert_eq!(json.matches("\"eventType\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sessionId"], "session");
        assert_eq!(value["eventType"], "CUSTOM");
        assert_eq!(value["campaign"], "spring");
    }
}
