//! Error types for the `telegram-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for telegram-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in telegram-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    InitData(InitDataErrorKind),
    Http(HttpErrorKind),
}

/// Reasons a Mini App `initData` payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitDataErrorKind {
    /// No `hash` field in the payload.
    NoHash,
    /// The signature does not match the payload.
    BadHash,
    /// Signature is valid but there is no `user` field.
    NoUser,
    /// The `user` field is not a JSON object of the expected shape.
    BadUserJson,
    /// The `user` record has no positive numeric `id`.
    NoUserId,
}

impl InitDataErrorKind {
    /// The token reported to clients for this rejection.
    pub fn as_str(&self) -> &'static str {
        match self {
            InitDataErrorKind::NoHash => "no_hash",
            InitDataErrorKind::BadHash => "bad_hash",
            InitDataErrorKind::NoUser => "no_user",
            InitDataErrorKind::BadUserJson => "bad_user_json",
            InitDataErrorKind::NoUserId => "no_user_id",
        }
    }
}

impl fmt::Display for InitDataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Timeout,
    Network,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::InitData(kind) => write!(f, "Init data error: {}", kind),
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_timeout() {
            ErrorKind::Http(HttpErrorKind::Timeout)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        // Bot API URLs carry the bot token in their path.
        Error {
            source: Some(Box::new(err.without_url())),
            error_kind,
        }
    }
}

/// Helper function to create init data errors.
pub fn init_data_error(kind: InitDataErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::InitData(kind),
    }
}
