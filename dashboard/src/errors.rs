use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Invalid UI action: {0}")]
    InvalidAction(String),

    #[error("Refresh rate must be between 1 and 3600 seconds, got {0}")]
    InvalidRefreshRate(u64),

    #[error("Invalid zoom window {start}..{end} for series of {len} points")]
    InvalidZoom { start: usize, end: usize, len: usize },

    #[error("Alert message cannot be empty")]
    EmptyAlertMessage,

    #[error("Dashboard controller is not running")]
    ControllerClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
