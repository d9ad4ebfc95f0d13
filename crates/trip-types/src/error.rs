use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TripError {
    /// 401/403 from the backend — callers route back to the login view.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TripError {
    fn from(e: serde_json::Error) -> Self {
        TripError::Serialization(e.to_string())
    }
}

impl TripError {
    /// True when the error should bounce the user back to the login view.
    pub fn is_auth(&self) -> bool {
        matches!(self, TripError::Unauthorized)
    }
}
