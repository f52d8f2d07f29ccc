//! Telegram Bot API client.
//!
//! Only the two methods the gate needs are wrapped: `getChatMember` for the
//! membership decision and `getMe` for operational sanity checks.

use crate::error::{Error, UNKNOWN_ERROR};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use telegram_auth::http::HttpClientBuilder;
use url::Url;

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl<T> TelegramResponse<T> {
    /// Turn a non-ok envelope into an upstream error carrying Telegram's description.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(Error::upstream(
                self.description.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ))
        }
    }
}

/// The part of a `ChatMember` object the gate looks at.
#[derive(Debug, Default, Deserialize)]
pub struct ChatMember {
    #[serde(default)]
    status: serde_json::Value,
}

impl ChatMember {
    /// The membership status as a string; empty when Telegram sent none.
    pub fn status(&self) -> String {
        match &self.status {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(status) => status.clone(),
            other => other.to_string(),
        }
    }
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: Url,
    bot_token: SecretString,
}

impl TelegramClient {
    pub fn new(base_url: &str, bot_token: SecretString, timeout: Duration) -> Result<Self, Error> {
        let base_url = Url::parse(base_url).map_err(|err| {
            warn!("Invalid Telegram API base URL: {err:?}");
            Error::config("Invalid Telegram API base URL")
        })?;
        let client = HttpClientBuilder::new()
            .with_timeout(timeout)
            .with_user_agent(format!("channel-gate/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            bot_token,
        })
    }

    /// `{base}/bot<token>/<method>?<query>`, every component percent-encoded.
    fn method_url(&self, method: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("Telegram API base URL cannot hold a path"))?
            .pop_if_empty()
            .push(&format!("bot{}", self.bot_token.expose_secret()))
            .push(method);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Single GET against a Bot API method. No retries.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.method_url(method, query)?;

        debug!("Calling Telegram method {method}");

        let response = self.client.get(url).send().await.map_err(|err| {
            let err = Error::from(err);
            warn!("Telegram {method} request failed: {:?}", err.error_kind);
            err
        })?;

        let status = response.status();
        response.json::<T>().await.map_err(|err| {
            let err = Error::from(err);
            warn!(
                "Telegram {method} answered {status} with an unreadable body: {:?}",
                err.error_kind
            );
            err
        })
    }

    /// Look up `user_id`'s membership in `chat_id`.
    pub async fn get_chat_member(&self, chat_id: &str, user_id: i64) -> Result<ChatMember, Error> {
        let user_id = user_id.to_string();
        let response: TelegramResponse<ChatMember> = self
            .call(
                "getChatMember",
                &[("chat_id", chat_id), ("user_id", user_id.as_str())],
            )
            .await?;

        let member = response.into_result().inspect_err(|err| {
            warn!("getChatMember rejected: {}", err.reason());
        })?;

        Ok(member.unwrap_or_default())
    }

    /// The raw `getMe` response body.
    pub async fn get_me(&self) -> Result<serde_json::Value, Error> {
        self.call("getMe", &[]).await
    }
}
