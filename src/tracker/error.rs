use std::fmt;

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    InvalidApplication,
    EmptyProjectId,
    EmptyUrlScheme,
    EmptyDataSourceId,
    InvalidServerHost { host: String, reason: String },
    InvalidConfiguration { message: String },
    NotOnMainThread,
    WorkerUnavailable { message: String },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::InvalidApplication => {
                write!(f, "application is NULL: a package name is required")
            }
            TrackerError::EmptyProjectId => write!(f, "ProjectId is NULL"),
            TrackerError::EmptyUrlScheme => write!(f, "UrlScheme is NULL"),
            TrackerError::EmptyDataSourceId => write!(f, "DataSourceId is NULL"),
            TrackerError::InvalidServerHost { host, reason } => {
                write!(f, "Invalid data collection server host '{host}': {reason}")
            }
            TrackerError::InvalidConfiguration { message } => {
                write!(f, "Invalid tracker configuration: {message}")
            }
            TrackerError::NotOnMainThread => write!(
                f,
                "start_with_configuration must be called on the application's main thread"
            ),
            TrackerError::WorkerUnavailable { message } => {
                write!(f, "Unable to start the track-main worker: {message}")
            }
        }
    }
}

impl std::error::Error for TrackerError {}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::InvalidConfiguration {
            message: err.to_string(),
        }
    }
}
