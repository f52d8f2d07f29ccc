//! Supabase REST client for the `users` click table.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use chrono::{DateTime, Utc};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;
use telegram_auth::http::HttpClientBuilder;
use url::Url;

/// One row of the `users` table, keyed by the Telegram user id.
///
/// Only the timestamp for the action being recorded is sent, so a merge leaves
/// the other action's timestamp untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserClickRow {
    pub user_id: i64,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_clicked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe_clicked_at: Option<DateTime<Utc>>,
}

pub struct SupabaseClient {
    client: reqwest::Client,
    users_url: Url,
}

impl SupabaseClient {
    pub fn new(
        base_url: &str,
        service_role_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let mut users_url = Url::parse(base_url).map_err(|err| {
            warn!("Invalid Supabase URL: {err:?}");
            Error::config("Invalid Supabase URL")
        })?;
        users_url
            .path_segments_mut()
            .map_err(|_| Error::config("Supabase URL cannot hold a path"))?
            .pop_if_empty()
            .extend(["rest", "v1", "users"]);
        users_url
            .query_pairs_mut()
            .append_pair("on_conflict", "user_id");

        let client = HttpClientBuilder::new()
            .with_timeout(timeout)
            .with_default_headers(build_auth_headers(service_role_key)?)
            .build()?;

        Ok(Self { client, users_url })
    }

    /// Insert the row, or merge it into the existing row with the same `user_id`.
    pub async fn upsert_user(&self, row: &UserClickRow) -> Result<(), Error> {
        debug!("Upserting click row for user {}", row.user_id);

        let response = self
            .client
            .post(self.users_url.clone())
            .json(row)
            .send()
            .await
            .map_err(|err| {
                let err = Error::from(err);
                warn!("Supabase upsert request failed: {:?}", err.error_kind);
                err
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("Supabase upsert failed: {status} - {body}");
            Err(Error::upstream(format!(
                "supabase_error {}: {}",
                status.as_u16(),
                body
            )))
        }
    }
}

/// Build authentication headers for the Supabase REST API
fn build_auth_headers(
    service_role_key: &SecretString,
) -> Result<reqwest::header::HeaderMap, Error> {
    let key = service_role_key.expose_secret();
    let sensitive = |value: String| {
        let mut header = reqwest::header::HeaderValue::from_str(&value).map_err(|err| {
            warn!("Failed to create Supabase header value: {err:?}");
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to create authorization header value".to_string(),
                )),
            }
        })?;
        header.set_sensitive(true);
        Ok::<_, Error>(header)
    };

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("apikey", sensitive(key.clone())?);
    headers.insert(
        reqwest::header::AUTHORIZATION,
        sensitive(format!("Bearer {key}"))?,
    );
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        "prefer",
        reqwest::header::HeaderValue::from_static("resolution=merge-duplicates,return=minimal"),
    );

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};

    fn key() -> SecretString {
        SecretString::new("service_key".to_string())
    }

    fn row() -> UserClickRow {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        UserClickRow {
            user_id: 123,
            username: Some("alice".to_string()),
            created_at: now,
            open_clicked_at: Some(now),
            subscribe_clicked_at: None,
        }
    }

    #[test]
    fn test_row_serialization_skips_unset_action() {
        let value = serde_json::to_value(row()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "user_id": 123,
                "username": "alice",
                "created_at": "2025-01-02T03:04:05Z",
                "open_clicked_at": "2025-01-02T03:04:05Z"
            })
        );
    }

    #[tokio::test]
    async fn test_upsert_sends_merge_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/users")
            .match_query(Matcher::UrlEncoded("on_conflict".into(), "user_id".into()))
            .match_header("apikey", "service_key")
            .match_header("authorization", "Bearer service_key")
            .match_header("prefer", "resolution=merge-duplicates,return=minimal")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "user_id": 123,
                "username": "alice"
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = SupabaseClient::new(&server.url(), &key(), Duration::from_secs(2)).unwrap();
        client.upsert_user(&row()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_failure_carries_status_and_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/users")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body("conflict")
            .create_async()
            .await;

        let client = SupabaseClient::new(&server.url(), &key(), Duration::from_secs(2)).unwrap();
        let err = client.upsert_user(&row()).await.unwrap_err();
        assert_eq!(err.reason(), "supabase_error 409: conflict");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = SupabaseClient::new("not a url", &key(), Duration::from_secs(2));
        assert_eq!(
            result.err().map(|err| err.error_kind),
            Some(DomainErrorKind::Internal(InternalErrorKind::Config))
        );
    }
}
