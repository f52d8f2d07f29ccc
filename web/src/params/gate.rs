use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /api/check`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckParams {
    /// Raw `Telegram.WebApp.initData` string.
    #[serde(rename = "initData")]
    pub init_data: Option<String>,
    /// The Mini App start parameter the user arrived with, if any.
    pub source: Option<String>,
}

/// Body of `POST /api/track`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TrackParams {
    #[serde(rename = "initData")]
    pub init_data: Option<String>,
    /// `open` or `subscribe_click`.
    pub action: Option<String>,
}

/// Body of `POST /api/ping`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PingParams {
    #[serde(rename = "initData")]
    pub init_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_params_use_client_field_names() {
        let params: CheckParams =
            serde_json::from_str(r#"{"initData":"a=1&hash=x","source":"ads"}"#).unwrap();
        assert_eq!(params.init_data.as_deref(), Some("a=1&hash=x"));
        assert_eq!(params.source.as_deref(), Some("ads"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let params: TrackParams = serde_json::from_str("{}").unwrap();
        assert!(params.init_data.is_none());
        assert!(params.action.is_none());
    }
}
