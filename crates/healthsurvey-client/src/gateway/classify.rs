//! Pure classification of gateway failures.
//!
//! [`classify`] maps what came back from the transport to a
//! [`Disposition`]: the outcome kind, the message handed to the caller, and
//! the side effect the dispatcher should carry out. It performs no I/O and
//! touches no shared state.

use serde_json::Value;

use crate::error::{ApiError, FailureKind, first_message};

pub const NETWORK_MESSAGE: &str = "Network error. Please check if the backend is running.";
pub const TIMEOUT_MESSAGE: &str = "Request timeout. Please check your connection.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";
pub const UNAUTHENTICATED_MESSAGE: &str = "Authentication required.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const GENERIC_MESSAGE: &str = "An error occurred";

/// What the transport produced for a failed call.
#[derive(Debug, Clone, Copy)]
pub enum ResponseShape<'a> {
    /// No response arrived (connection refused, DNS failure, reset, ...).
    NoResponse,
    /// The time budget ran out.
    TimedOut,
    /// An HTTP error status, with its JSON body when it had one.
    Status { status: u16, body: Option<&'a Value> },
    /// A success status whose body did not match the expected shape.
    Undecodable { status: u16 },
}

/// Facts about the request and the UI at the moment the response arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    /// The request carried a bearer token.
    pub had_token: bool,
    /// The login view is currently showing.
    pub on_login_view: bool,
}

/// Side effect requested from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Nothing to show; the caller handles it.
    Silent,
    /// Show the disposition's message as an error notice.
    Notify,
    /// Clear the session the request was made with. When `announce` is set,
    /// also show the message and navigate to the login view.
    ExpireSession { announce: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disposition {
    pub kind: FailureKind,
    pub message: String,
    pub directive: Directive,
}

impl Disposition {
    fn new(kind: FailureKind, message: impl Into<String>, directive: Directive) -> Self {
        Self {
            kind,
            message: message.into(),
            directive,
        }
    }

    /// The error returned to the caller.
    pub fn into_error(self, shape: ResponseShape<'_>) -> ApiError {
        let err = ApiError::new(self.kind, self.message);
        match shape {
            ResponseShape::Status { status, body } => {
                err.with_status(status).with_body(body.cloned())
            }
            ResponseShape::Undecodable { status } => err.with_status(status),
            ResponseShape::NoResponse | ResponseShape::TimedOut => err,
        }
    }
}

/// Classifies a failed call. Precedence: no response, timeout, 401, 403,
/// 5xx, then any other status.
pub fn classify(ctx: ClassifyContext, shape: ResponseShape<'_>) -> Disposition {
    match shape {
        ResponseShape::NoResponse => Disposition::new(
            FailureKind::NetworkUnreachable,
            NETWORK_MESSAGE,
            Directive::Notify,
        ),
        ResponseShape::TimedOut => {
            Disposition::new(FailureKind::Timeout, TIMEOUT_MESSAGE, Directive::Notify)
        }
        ResponseShape::Status { status: 401, body } => {
            if ctx.had_token {
                Disposition::new(
                    FailureKind::Unauthenticated,
                    SESSION_EXPIRED_MESSAGE,
                    Directive::ExpireSession {
                        announce: !ctx.on_login_view,
                    },
                )
            } else {
                // A 401 without credentials is the expected answer for a
                // protected endpoint; availability probes rely on it.
                let message = body
                    .and_then(body_message)
                    .unwrap_or(UNAUTHENTICATED_MESSAGE);
                Disposition::new(FailureKind::Unauthenticated, message, Directive::Silent)
            }
        }
        ResponseShape::Status { status: 403, .. } => {
            Disposition::new(FailureKind::Forbidden, FORBIDDEN_MESSAGE, Directive::Notify)
        }
        ResponseShape::Status { status, .. } if status >= 500 => server_error(),
        ResponseShape::Undecodable { .. } => server_error(),
        ResponseShape::Status { body, .. } => {
            let message = body
                .and_then(|b| body_message(b).or_else(|| validation_message(b)))
                .unwrap_or(GENERIC_MESSAGE);
            let directive = if ctx.on_login_view {
                Directive::Silent
            } else {
                Directive::Notify
            };
            Disposition::new(FailureKind::ClientError, message, directive)
        }
    }
}

fn server_error() -> Disposition {
    Disposition::new(
        FailureKind::ServerError,
        SERVER_ERROR_MESSAGE,
        Directive::Notify,
    )
}

/// `detail`, then `message`, then `error`.
fn body_message(body: &Value) -> Option<&str> {
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(first_message))
}

/// First field-level validation message, preferring `non_field_errors`.
fn validation_message(body: &Value) -> Option<&str> {
    let map = body.as_object()?;
    map.get("non_field_errors")
        .and_then(first_message)
        .or_else(|| map.values().find_map(first_message))
}
