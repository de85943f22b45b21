use serde_json::Value;
use thiserror::Error;

/// Classified kind of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// HTTP 401.
    Unauthenticated,
    /// HTTP 403.
    Forbidden,
    /// HTTP 5xx, or a success response the backend could not deliver in the
    /// agreed shape.
    ServerError,
    /// The request exceeded the configured time budget.
    Timeout,
    /// No response arrived at all.
    NetworkUnreachable,
    /// Any other HTTP error status (validation failures, 404, ...).
    ClientError,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::ServerError => write!(f, "server error"),
            Self::Timeout => write!(f, "timeout"),
            Self::NetworkUnreachable => write!(f, "network unreachable"),
            Self::ClientError => write!(f, "client error"),
        }
    }
}

/// The failure half of every gateway outcome.
///
/// By the time a caller sees this value the gateway has already shown the
/// user-facing notification (if any) and handled session expiry, so callers
/// only add call-site handling such as inline form errors.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// HTTP status, when a response arrived.
    pub status: Option<u16>,
    /// Decoded JSON error body, when the response carried one.
    pub body: Option<Value>,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Per-field validation messages from a 4xx body, e.g.
    /// `{"username": ["A user with that username already exists."]}`.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Some(Value::Object(map)) = &self.body else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(field, v)| first_message(v).map(|m| (field.clone(), m.to_string())))
            .collect()
    }
}

pub(crate) fn first_message(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

/// Result of every gateway call.
pub type Outcome<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Cannot determine state directory")]
    NoStateDir,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Token must not be empty")]
    EmptyToken,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config build error: {0}")]
    Build(String),

    #[error("config deserialize error: {0}")]
    Deserialize(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
