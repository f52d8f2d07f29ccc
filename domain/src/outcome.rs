//! Stage-tagged failures shared by the gate and the click tracker.

use serde::Serialize;

use crate::error::{DomainErrorKind, Error, InternalErrorKind};

/// The stage a request was in when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    #[serde(rename = "env")]
    Env,
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "verify_initdata")]
    VerifyInitData,
    #[serde(rename = "getChatMember")]
    GetChatMember,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "catch")]
    Catch,
}

/// Why a request did not complete: the stage plus a short reason for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub step: Step,
    pub reason: String,
}

impl Failure {
    pub fn new(step: Step, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }

    pub fn from_error(step: Step, err: &Error) -> Self {
        Self::new(step, err.reason())
    }

    /// An upstream client could not be built. A bad setting is an `env`
    /// failure, anything else is `catch`.
    pub fn from_setup_error(err: &Error) -> Self {
        let step = match err.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Config) => Step::Env,
            _ => Step::Catch,
        };
        Self::from_error(step, err)
    }
}
