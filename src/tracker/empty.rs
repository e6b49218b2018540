use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::tracker::types::{GrowingTrackerApi, ResultCallback};

static EMPTY: LazyLock<Arc<EmptyGrowingTracker>> =
    LazyLock::new(|| Arc::new(EmptyGrowingTracker));

/// Stand-in returned by [`get_tracker`](crate::tracker::get_tracker) before the tracker has
/// been started. Every call is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyGrowingTracker;

impl EmptyGrowingTracker {
    pub fn shared() -> Arc<EmptyGrowingTracker> {
        EMPTY.clone()
    }
}

impl GrowingTrackerApi for EmptyGrowingTracker {
    fn track_custom_event(&self, _event_name: &str) {}

    fn track_custom_event_with_attributes(
        &self,
        _event_name: &str,
        _attributes: &BTreeMap<String, String>,
    ) {
    }

    fn track_custom_event_with_item(&self, _event_name: &str, _item_key: &str, _item_id: &str) {}

    fn track_custom_event_with_attributes_and_item(
        &self,
        _event_name: &str,
        _attributes: Option<&BTreeMap<String, String>>,
        _item_key: &str,
        _item_id: &str,
    ) {
    }

    fn set_login_user_attributes(&self, _attributes: &BTreeMap<String, String>) {}

    fn device_id(&self, callback: ResultCallback<String>) {
        callback(None);
    }

    fn set_data_collection_enabled(&self, _enabled: bool) {}

    fn set_login_user_id(&self, _user_id: &str) {}

    fn clean_login_user_id(&self) {}

    fn set_location(&self, _latitude: f64, _longitude: f64) {}

    fn clean_location(&self) {}
}
