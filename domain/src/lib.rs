//! Business logic for the channel gate: who is asking (verified Telegram init
//! data), whether they are in the gated channel, and click tracking.
//!
//! `web` depends on this crate only; the types it needs from `telegram-auth`
//! are re-exported here so that `web` does not depend on it directly.
pub use telegram_auth::init_data::{InitDataSummary, WebAppUser};

pub mod diagnostics;
pub mod error;
pub mod gate;
pub mod membership;
pub mod outcome;
pub mod tracking;

pub mod gateway;
