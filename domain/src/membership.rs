//! Channel membership decision.

use crate::error::Error;
use crate::gateway::telegram::TelegramClient;
use log::*;
use serde::Serialize;

/// Telegram chat member statuses that grant access to gated content.
pub const SUBSCRIBED_STATUSES: [&str; 3] = ["member", "administrator", "creator"];

/// What Telegram reported for a user in the gated channel, and what that means for access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipDecision {
    pub status: String,
    pub subscribed: bool,
}

impl MembershipDecision {
    pub fn from_status(status: impl Into<String>) -> Self {
        let status = status.into();
        let subscribed = is_subscribed(&status);
        Self { status, subscribed }
    }
}

/// `true` only for statuses that mean the user is currently in the channel.
pub fn is_subscribed(status: &str) -> bool {
    SUBSCRIBED_STATUSES.contains(&status)
}

/// Ask Telegram whether `user_id` belongs to `channel_id`.
pub async fn check(
    client: &TelegramClient,
    channel_id: &str,
    user_id: i64,
) -> Result<MembershipDecision, Error> {
    let member = client.get_chat_member(channel_id, user_id).await?;
    let decision = MembershipDecision::from_status(member.status());

    info!(
        "User {} has status {:?} in {} (subscribed: {})",
        user_id, decision.status, channel_id, decision.subscribed
    );

    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let cases = [
            ("member", true),
            ("administrator", true),
            ("creator", true),
            ("left", false),
            ("kicked", false),
            ("restricted", false),
            ("", false),
            ("Member", false),
            ("banana", false),
        ];

        for (status, expected) in cases {
            let decision = MembershipDecision::from_status(status);
            assert_eq!(decision.status, status);
            assert_eq!(
                decision.subscribed, expected,
                "status {status:?} should map to {expected}"
            );
        }
    }
}
