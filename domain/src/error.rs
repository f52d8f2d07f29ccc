//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;
use telegram_auth::error::{
    Error as TelegramAuthError, ErrorKind as TelegramAuthErrorKind, HttpErrorKind,
    InitDataErrorKind,
};

/// Reason reported for an upstream failure that carries no description of its own.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Reason reported when a configured value, such as an upstream URL, is unusable.
pub const INVALID_CONFIG: &str = "invalid_config";

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. Errors from `telegram-auth` are translated here so that `web`
/// only ever sees domain error kinds.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    InitData(InitDataErrorKind),
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The upstream could not be reached.
    Network,
    /// The upstream did not answer within the configured timeout.
    Timeout,
    /// The upstream answered with a body we could not decode.
    Decode,
    /// The upstream answered and reported a failure, with its description.
    Upstream(String),
}

impl Error {
    pub(crate) fn upstream(description: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(description.into())),
        }
    }

    pub(crate) fn config(message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }

    /// Short, client-facing reason for this error.
    ///
    /// Never includes secrets or URLs: transport failures collapse to a fixed phrase.
    pub fn reason(&self) -> String {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Config) => INVALID_CONFIG.to_string(),
            DomainErrorKind::Internal(InternalErrorKind::InitData(kind)) => {
                kind.as_str().to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Other(message)) => message.clone(),
            DomainErrorKind::External(ExternalErrorKind::Network) => "network error".to_string(),
            DomainErrorKind::External(ExternalErrorKind::Timeout) => "timeout".to_string(),
            DomainErrorKind::External(ExternalErrorKind::Decode) => UNKNOWN_ERROR.to_string(),
            DomainErrorKind::External(ExternalErrorKind::Upstream(description)) => {
                description.clone()
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<TelegramAuthError> for Error {
    fn from(err: TelegramAuthError) -> Self {
        let error_kind = match &err.error_kind {
            TelegramAuthErrorKind::InitData(kind) => {
                DomainErrorKind::Internal(InternalErrorKind::InitData(*kind))
            }
            TelegramAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build HTTP client".to_string()),
            ),
            TelegramAuthErrorKind::Http(HttpErrorKind::Timeout) => {
                DomainErrorKind::External(ExternalErrorKind::Timeout)
            }
            TelegramAuthErrorKind::Http(HttpErrorKind::RequestFailed)
            | TelegramAuthErrorKind::Http(HttpErrorKind::Network) => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Decoding failures are an upstream contract problem, not a transport one.
        if err.is_decode() {
            Error {
                source: Some(Box::new(err.without_url())),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Decode),
            }
        } else {
            TelegramAuthError::from(err).into()
        }
    }
}
