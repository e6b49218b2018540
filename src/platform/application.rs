use std::thread::{self, ThreadId};

/// Host application context handed to the tracker at start-up.
///
/// The thread that creates an `Application` is treated as the host's UI thread unless another
/// thread is supplied with [`Application::with_main_thread`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
    package_name: String,
    app_version: Option<String>,
    api_level: Option<u32>,
    platform: String,
    device_id: Option<String>,
    main_thread: ThreadId,
}

impl Application {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            app_version: None,
            api_level: None,
            platform: std::env::consts::OS.to_string(),
            device_id: None,
            main_thread: thread::current().id(),
        }
    }

    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    /// Records the host OS API level. Unknown levels are never rejected.
    pub fn with_api_level(mut self, level: u32) -> Self {
        self.api_level = Some(level);
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Supplies a device identifier instead of letting the tracker generate one.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_main_thread(mut self, thread: ThreadId) -> Self {
        self.main_thread = thread;
        self
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }

    pub fn api_level(&self) -> Option<u32> {
        self.api_level
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn main_thread(&self) -> ThreadId {
        self.main_thread
    }

    pub fn running_on_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }
}
