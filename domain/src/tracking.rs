//! Records Mini App "open" and "subscribe" clicks per verified Telegram user.

use crate::error::Error;
use crate::gateway::supabase::{SupabaseClient, UserClickRow};
use crate::outcome::{Failure, Step};
use chrono::{DateTime, Utc};
use log::*;
use service::config::Config;
use std::str::FromStr;
use telegram_auth::init_data::{self, WebAppUser};

pub const BOT_TOKEN_MISSING: &str = "BOT_TOKEN missing";
pub const STORE_MISSING: &str = "SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY missing";
pub const NO_INIT_DATA: &str = "no_initdata";
pub const NO_ACTION: &str = "no_action";
pub const BAD_ACTION: &str = "bad_action";

/// What the user clicked in the Mini App.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAction {
    Open,
    SubscribeClick,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TrackActionParseError;

impl FromStr for TrackAction {
    type Err = TrackActionParseError;
    fn from_str(action: &str) -> Result<TrackAction, Self::Err> {
        match action {
            "open" => Ok(TrackAction::Open),
            "subscribe_click" => Ok(TrackAction::SubscribeClick),
            _ => Err(TrackActionParseError),
        }
    }
}

impl UserClickRow {
    pub fn for_action(user: &WebAppUser, action: TrackAction, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            created_at: now,
            open_clicked_at: (action == TrackAction::Open).then_some(now),
            subscribe_clicked_at: (action == TrackAction::SubscribeClick).then_some(now),
        }
    }
}

/// Verify `init_data` and record `action` for the user it names.
///
/// The identity is only trusted after the full signature check; nothing is
/// written for a payload that fails it.
pub async fn track(
    config: &Config,
    init_data: Option<&str>,
    action: Option<&str>,
) -> Result<(), Failure> {
    let bot_token = config
        .bot_token()
        .ok_or_else(|| Failure::new(Step::Env, BOT_TOKEN_MISSING))?;
    let (store_url, store_key) = match (config.supabase_url(), config.supabase_service_role_key()) {
        (Some(url), Some(key)) => (url, key),
        _ => return Err(Failure::new(Step::Env, STORE_MISSING)),
    };

    let init_data = init_data
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| Failure::new(Step::Input, NO_INIT_DATA))?;
    let action = action
        .filter(|action| !action.is_empty())
        .ok_or_else(|| Failure::new(Step::Input, NO_ACTION))?
        .parse::<TrackAction>()
        .map_err(|_| Failure::new(Step::Input, BAD_ACTION))?;

    let user = init_data::verify(init_data, &bot_token).map_err(|err| {
        let err = Error::from(err);
        warn!("Rejected init data for {action:?} click: {}", err.reason());
        Failure::from_error(Step::VerifyInitData, &err)
    })?;

    let row = UserClickRow::for_action(&user, action, Utc::now());
    SupabaseClient::new(store_url, &store_key, config.upstream_timeout())
        .map_err(|err| {
            error!("Failed to set up Supabase client: {err:?}");
            Failure::from_setup_error(&err)
        })?
        .upsert_user(&row)
        .await
        .map_err(|err| Failure::from_error(Step::Catch, &err))?;

    info!("Recorded {action:?} click for user {}", user.id);

    Ok(())
}
