//! The subscription gate: verify who is asking, then ask Telegram whether they
//! are in the channel.
//!
//! A request moves through `env → input → verify_initdata → getChatMember → done`
//! and stops at the first stage that fails. Every outcome, including failures,
//! comes back as a [`GateResult`] so callers can always render a response.

use crate::error::Error;
use crate::gateway::telegram::TelegramClient;
use crate::membership::{self, MembershipDecision};
use crate::outcome::{Failure, Step};
use log::*;
use service::config::Config;
use telegram_auth::init_data;

pub const ENV_MISSING: &str = "env_missing";
pub const NO_INIT_DATA: &str = "no_initdata";

/// Terminal outcome of one gate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// The caller is who they claim to be; `membership` says whether they may pass.
    Checked {
        user_id: i64,
        membership: MembershipDecision,
    },
    Failed(Failure),
}

/// Names of the settings the gate needs but does not have.
pub fn missing_settings(config: &Config) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.bot_token().is_none() {
        missing.push("BOT_TOKEN");
    }
    if config.channel_id().is_none() {
        missing.push("CHANNEL_ID");
    }
    missing
}

pub async fn check(config: &Config, init_data: Option<&str>) -> GateResult {
    match run(config, init_data).await {
        Ok((user_id, membership)) => GateResult::Checked {
            user_id,
            membership,
        },
        Err(failure) => GateResult::Failed(failure),
    }
}

async fn run(
    config: &Config,
    init_data: Option<&str>,
) -> Result<(i64, MembershipDecision), Failure> {
    let (bot_token, channel_id) = match (config.bot_token(), config.channel_id()) {
        (Some(bot_token), Some(channel_id)) => (bot_token, channel_id),
        _ => {
            warn!("Gate is not configured, missing: {:?}", missing_settings(config));
            return Err(Failure::new(Step::Env, ENV_MISSING));
        }
    };

    let init_data = init_data
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| Failure::new(Step::Input, NO_INIT_DATA))?;

    let user = init_data::verify(init_data, &bot_token).map_err(|err| {
        let err = Error::from(err);
        warn!("Rejected init data: {}", err.reason());
        Failure::from_error(Step::VerifyInitData, &err)
    })?;

    let client = TelegramClient::new(
        config.telegram_api_base_url(),
        bot_token,
        config.upstream_timeout(),
    )
    .map_err(|err| {
        error!("Failed to set up Telegram client: {err:?}");
        Failure::from_setup_error(&err)
    })?;

    let membership = membership::check(&client, channel_id, user.id)
        .await
        .map_err(|err| Failure::from_error(Step::GetChatMember, &err))?;

    Ok((user.id, membership))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_CONFIG;
    use clap::Parser;
    use mockito::{Matcher, Server};
    use secrecy::SecretString;

    const BOT_TOKEN: &str = "123456:TEST-TOKEN";
    const CHANNEL_ID: &str = "@gated_channel";

    fn config_for(server_url: &str) -> Config {
        Config::parse_from(["channel_gate_rs"])
            .set_bot_token(Some(BOT_TOKEN.to_string()))
            .set_channel_id(Some(CHANNEL_ID.to_string()))
            .set_telegram_api_base_url(server_url.to_string())
    }

    fn signed_init_data(user: &str) -> String {
        init_data::encode_signed(
            &[("auth_date", "1700000000"), ("user", user)],
            &SecretString::new(BOT_TOKEN.to_string()),
        )
        .unwrap()
    }

    async fn mock_status(server: &mut Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/bot123456:TEST-TOKEN/getChatMember")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("chat_id".into(), CHANNEL_ID.into()),
                Matcher::UrlEncoded("user_id".into(), "123".into()),
            ]))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_missing_bot_token_fails_at_env_regardless_of_payload() {
        let config = config_for("http://127.0.0.1:9").set_bot_token(None);
        let signed = signed_init_data(r#"{"id":123}"#);

        for payload in [None, Some(""), Some("garbage"), Some(signed.as_str())] {
            assert_eq!(
                check(&config, payload).await,
                GateResult::Failed(Failure::new(Step::Env, ENV_MISSING))
            );
        }
    }

    #[test]
    fn test_missing_settings_names_both() {
        let config = config_for("http://127.0.0.1:9")
            .set_bot_token(None)
            .set_channel_id(None);
        assert_eq!(missing_settings(&config), vec!["BOT_TOKEN", "CHANNEL_ID"]);
    }

    #[tokio::test]
    async fn test_missing_channel_fails_at_env() {
        let config = config_for("http://127.0.0.1:9").set_channel_id(None);
        assert_eq!(
            check(&config, Some("hash=abc")).await,
            GateResult::Failed(Failure::new(Step::Env, ENV_MISSING))
        );
    }

    #[tokio::test]
    async fn test_empty_init_data_fails_at_input() {
        let config = config_for("http://127.0.0.1:9");
        for payload in [None, Some("")] {
            assert_eq!(
                check(&config, payload).await,
                GateResult::Failed(Failure::new(Step::Input, NO_INIT_DATA))
            );
        }
    }

    #[tokio::test]
    async fn test_payload_without_hash_fails_verification() {
        let config = config_for("http://127.0.0.1:9");
        assert_eq!(
            check(&config, Some("auth_date=1&user=%7B%22id%22%3A123%7D")).await,
            GateResult::Failed(Failure::new(Step::VerifyInitData, "no_hash"))
        );
    }

    #[tokio::test]
    async fn test_payload_signed_for_other_bot_fails_verification() {
        let config = config_for("http://127.0.0.1:9").set_bot_token(Some("999:OTHER".to_string()));
        assert_eq!(
            check(&config, Some(&signed_init_data(r#"{"id":123}"#))).await,
            GateResult::Failed(Failure::new(Step::VerifyInitData, "bad_hash"))
        );
    }

    #[tokio::test]
    async fn test_member_is_subscribed() {
        let mut server = Server::new_async().await;
        let mock = mock_status(&mut server, r#"{"ok":true,"result":{"status":"member"}}"#).await;

        let result = check(
            &config_for(&server.url()),
            Some(&signed_init_data(r#"{"id":123,"username":"alice"}"#)),
        )
        .await;

        assert_eq!(
            result,
            GateResult::Checked {
                user_id: 123,
                membership: MembershipDecision {
                    status: "member".to_string(),
                    subscribed: true,
                },
            }
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_left_user_is_checked_but_not_subscribed() {
        let mut server = Server::new_async().await;
        let _mock = mock_status(&mut server, r#"{"ok":true,"result":{"status":"left"}}"#).await;

        let result = check(
            &config_for(&server.url()),
            Some(&signed_init_data(r#"{"id":123}"#)),
        )
        .await;

        assert_eq!(
            result,
            GateResult::Checked {
                user_id: 123,
                membership: MembershipDecision {
                    status: "left".to_string(),
                    subscribed: false,
                },
            }
        );
    }

    #[tokio::test]
    async fn test_upstream_timeout_fails_at_get_chat_member() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut config = config_for(&format!("http://{addr}"));
        config.upstream_timeout_secs = 1;

        assert_eq!(
            check(&config, Some(&signed_init_data(r#"{"id":123}"#))).await,
            GateResult::Failed(Failure::new(Step::GetChatMember, "timeout"))
        );
    }

    #[tokio::test]
    async fn test_invalid_telegram_url_fails_at_env() {
        let config = config_for("not a url");
        assert_eq!(
            check(&config, Some(&signed_init_data(r#"{"id":123}"#))).await,
            GateResult::Failed(Failure::new(Step::Env, INVALID_CONFIG))
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_fails_at_get_chat_member() {
        let mut server = Server::new_async().await;
        let _mock = mock_status(
            &mut server,
            r#"{"ok":false,"error_code":400,"description":"chat not found"}"#,
        )
        .await;

        let result = check(
            &config_for(&server.url()),
            Some(&signed_init_data(r#"{"id":123}"#)),
        )
        .await;

        assert_eq!(
            result,
            GateResult::Failed(Failure::new(Step::GetChatMember, "chat not found"))
        );
    }
}
