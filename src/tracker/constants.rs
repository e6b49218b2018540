use std::time::Duration;

pub const TAG: &str = "GrowingTracker";

pub static SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lowest host API level the tracker starts on.
pub const MIN_SUPPORTED_API_LEVEL: u32 = 17;

pub const MAX_LOGIN_USER_ID_LENGTH: usize = 1000;

pub const DEFAULT_DATA_COLLECTION_SERVER_HOST: &str = "https://napi.growingio.com";

pub const DEFAULT_SESSION_INTERVAL: Duration = Duration::from_secs(30);
