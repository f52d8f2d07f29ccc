//! Operational sanity checks. Nothing here takes part in the gating decision.

use crate::gateway::telegram::TelegramClient;
use crate::outcome::{Failure, Step};
use log::*;
use serde::Serialize;
use service::config::Config;
use telegram_auth::init_data::{self, InitDataSummary};

pub const BOT_TOKEN_MISSING: &str = "BOT_TOKEN missing";
pub const NO_INIT_DATA: &str = "no_initData";

/// Who the configured bot token belongs to, as reported by `getMe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotIdentity {
    pub bot_username: Option<String>,
    pub bot_id: Option<i64>,
    pub raw: serde_json::Value,
}

impl BotIdentity {
    fn from_raw(raw: serde_json::Value) -> Self {
        Self {
            bot_username: raw["result"]["username"].as_str().map(str::to_string),
            bot_id: raw["result"]["id"].as_i64(),
            raw,
        }
    }
}

/// Ask Telegram who the configured bot is.
///
/// Only a missing token is an error. An upstream failure is logged and yields
/// an identity with every field empty.
pub async fn bot_identity(config: &Config) -> Result<BotIdentity, Failure> {
    let bot_token = config
        .bot_token()
        .ok_or_else(|| Failure::new(Step::Env, BOT_TOKEN_MISSING))?;

    let raw = match TelegramClient::new(
        config.telegram_api_base_url(),
        bot_token,
        config.upstream_timeout(),
    ) {
        Ok(client) => client.get_me().await.unwrap_or_else(|err| {
            warn!("getMe failed: {}", err.reason());
            serde_json::Value::Null
        }),
        Err(err) => {
            warn!("Failed to set up Telegram client for getMe: {}", err.reason());
            serde_json::Value::Null
        }
    };

    Ok(BotIdentity::from_raw(raw))
}

/// Describe the shape of an init data payload without verifying it.
pub fn init_data_shape(init_data: Option<&str>) -> Result<InitDataSummary, Failure> {
    init_data
        .filter(|raw| !raw.is_empty())
        .map(init_data::summarize)
        .ok_or_else(|| Failure::new(Step::Input, NO_INIT_DATA))
}
