use thiserror::Error;

/// Startup configuration problems. These block the whole window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Supabase URL is not configured (set SKILLBRIDGE_SUPABASE_URL or SUPABASE_URL)")]
    MissingUrl,

    #[error("Supabase anon key is not configured (set SKILLBRIDGE_SUPABASE_ANON_KEY or SUPABASE_ANON_KEY)")]
    MissingAnonKey,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Could not set up the HTTP client: {0}")]
    HttpClient(String),
}

impl From<BackendError> for ConfigError {
    fn from(err: BackendError) -> Self {
        Self::HttpClient(err.to_string())
    }
}

/// Errors surfaced by the hosted backend or the transport in front of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Rejected credentials or other GoTrue failures; the message is shown verbatim.
    #[error("{0}")]
    Auth(String),

    /// No signed-in session for an operation that needs one
    #[error("You need to sign in first")]
    NoSession,

    /// A PostgREST column referenced by the request does not exist
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// PostgREST or GoTrue error body we do not special-case
    #[error("Backend error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Network error: {0}")]
    Http(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl BackendError {
    pub fn is_missing_column(&self) -> bool {
        matches!(self, Self::MissingColumn(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
