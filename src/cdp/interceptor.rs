use std::sync::Mutex;

use crate::event::{EventBuilder, TrackEvent};
use crate::track_main::EventBuildInterceptor;

pub const DATA_SOURCE_ID_PARAM: &str = "dataSourceId";
pub const GIO_ID_PARAM: &str = "gioId";

/// Stamps the CDP data source on every event and carries the last known login user id
/// forward as `gioId`.
#[derive(Debug)]
pub struct CdpEventBuildInterceptor {
    data_source_id: String,
    gio_id: Mutex<Option<String>>,
}

impl CdpEventBuildInterceptor {
    pub fn new(data_source_id: impl Into<String>) -> Self {
        Self {
            data_source_id: data_source_id.into(),
            gio_id: Mutex::new(None),
        }
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    pub fn gio_id(&self) -> Option<String> {
        self.gio_id
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl EventBuildInterceptor for CdpEventBuildInterceptor {
    fn event_will_build(&self, builder: &mut EventBuilder) {
        builder.add_extra_param(DATA_SOURCE_ID_PARAM, self.data_source_id.as_str());
        if let Some(gio_id) = self.gio_id() {
            builder.add_extra_param(GIO_ID_PARAM, gio_id);
        }
    }

    fn event_did_build(&self, event: &TrackEvent) {
        let Some(user_id) = event.user_id.as_deref().filter(|id| !id.is_empty()) else {
            return;
        };
        let mut gio_id = self
            .gio_id
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        if gio_id.as_deref() != Some(user_id) {
            *gio_id = Some(user_id.to_string());
        }
    }
}
