use domain::gate::GateResult;
use domain::outcome::{Failure, Step};
use serde::Serialize;
use utoipa::ToSchema;

/// Result of a gate check or a click-tracking call.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GateResponse {
    pub ok: bool,
    /// `env`, `input`, `verify_initdata`, `getChatMember`, `done` or `catch`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "done")]
    pub step: Option<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<bool>,
}

impl GateResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            step: None,
            error: None,
            user_id: None,
            status: None,
            subscribed: None,
        }
    }

    pub fn failed(failure: Failure) -> Self {
        Self {
            ok: false,
            step: Some(failure.step),
            error: Some(failure.reason),
            ..Self::success()
        }
    }
}

impl From<GateResult> for GateResponse {
    fn from(result: GateResult) -> Self {
        match result {
            GateResult::Checked {
                user_id,
                membership,
            } => Self {
                ok: true,
                step: Some(Step::Done),
                user_id: Some(user_id),
                status: Some(membership.status),
                subscribed: Some(membership.subscribed),
                ..Self::success()
            },
            GateResult::Failed(failure) => Self::failed(failure),
        }
    }
}

impl From<Result<(), Failure>> for GateResponse {
    fn from(result: Result<(), Failure>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(failure) => Self::failed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::membership::MembershipDecision;
    use serde_json::json;

    #[test]
    fn test_checked_result_serialization() {
        let response = GateResponse::from(GateResult::Checked {
            user_id: 123,
            membership: MembershipDecision::from_status("member"),
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"ok": true, "step": "done", "user_id": 123, "status": "member", "subscribed": true})
        );
    }

    #[test]
    fn test_failure_serialization_omits_identity_fields() {
        let response = GateResponse::failed(Failure::new(Step::VerifyInitData, "no_hash"));

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"ok": false, "step": "verify_initdata", "error": "no_hash"})
        );
    }

    #[test]
    fn test_track_success_is_bare_ok() {
        let response = GateResponse::from(Ok(()));
        assert_eq!(serde_json::to_value(response).unwrap(), json!({"ok": true}));
    }
}
