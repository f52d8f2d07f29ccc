use domain::diagnostics::BotIdentity;
use domain::outcome::Failure;
use domain::InitDataSummary;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /api/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BotIdentityResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub bot_username: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub bot_id: Option<Option<i64>>,
    /// The untouched `getMe` body, `null` when Telegram could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub raw: Option<serde_json::Value>,
}

impl From<Result<BotIdentity, Failure>> for BotIdentityResponse {
    fn from(result: Result<BotIdentity, Failure>) -> Self {
        match result {
            Ok(identity) => Self {
                ok: true,
                error: None,
                bot_username: Some(identity.bot_username),
                bot_id: Some(identity.bot_id),
                raw: Some(identity.raw),
            },
            Err(failure) => Self {
                ok: false,
                error: Some(failure.reason),
                bot_username: None,
                bot_id: None,
                raw: None,
            },
        }
    }
}

/// Body of `POST /api/ping`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "initData_len", skip_serializing_if = "Option::is_none")]
    pub init_data_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_hash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_user: Option<bool>,
}

impl From<Result<InitDataSummary, Failure>> for PingResponse {
    fn from(result: Result<InitDataSummary, Failure>) -> Self {
        match result {
            Ok(summary) => Self {
                ok: true,
                error: None,
                init_data_len: Some(summary.len),
                keys: Some(summary.keys),
                has_hash: Some(summary.has_hash),
                has_user: Some(summary.has_user),
            },
            Err(failure) => Self {
                ok: false,
                error: Some(failure.reason),
                init_data_len: None,
                keys: None,
                has_hash: None,
                has_user: None,
            },
        }
    }
}
