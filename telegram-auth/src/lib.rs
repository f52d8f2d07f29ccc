//! # telegram-auth
//!
//! Authentication primitives for a Telegram Mini App backend:
//! - Canonicalization of the `initData` query string the Mini App runtime hands us
//! - HMAC-SHA256 verification of that payload against the bot token
//! - Decoding of the signed `user` record into a [`init_data::WebAppUser`]
//! - HTTP client building for calls to the Bot API and other upstreams
//!
//! ## Usage
//!
//! ```rust,ignore
//! use telegram_auth::init_data;
//!
//! let user = init_data::verify(raw_init_data, &bot_token)?;
//! println!("verified user {}", user.id);
//! ```

pub mod error;
pub mod http;
pub mod init_data;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
