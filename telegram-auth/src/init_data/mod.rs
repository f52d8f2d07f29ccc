//! Telegram Mini App init data: canonical form, signature verification and
//! the identity it carries.

mod canonical;
mod verify;

pub use canonical::{
    canonicalize, summarize, CanonicalPayload, InitDataSummary, HASH_FIELD, USER_FIELD,
};
pub use verify::{derive_secret_key, encode_signed, sign, verify, WebAppUser, WEB_APP_DATA_KEY};
