use std::collections::BTreeMap;

/// Completion handler for asynchronous lookups. Receives `None` when the value is unavailable.
pub type ResultCallback<T> = Box<dyn FnOnce(Option<T>) + Send + 'static>;

/// Public tracking surface shared by the live tracker and the pre-start no-op tracker.
pub trait GrowingTrackerApi: Send + Sync {
    fn track_custom_event(&self, event_name: &str);

    fn track_custom_event_with_attributes(
        &self,
        event_name: &str,
        attributes: &BTreeMap<String, String>,
    );

    fn track_custom_event_with_item(&self, event_name: &str, item_key: &str, item_id: &str);

    /// Tracks a custom event tied to the resource item `(item_key, item_id)`. Both parts must
    /// be non-empty, otherwise the call is logged and ignored.
    fn track_custom_event_with_attributes_and_item(
        &self,
        event_name: &str,
        attributes: Option<&BTreeMap<String, String>>,
        item_key: &str,
        item_id: &str,
    );

    fn set_login_user_attributes(&self, attributes: &BTreeMap<String, String>);

    /// Resolves the device id. The callback may run on another thread.
    fn device_id(&self, callback: ResultCallback<String>);

    fn set_data_collection_enabled(&self, enabled: bool);

    fn set_login_user_id(&self, user_id: &str);

    fn clean_login_user_id(&self);

    fn set_location(&self, latitude: f64, longitude: f64);

    fn clean_location(&self);
}
