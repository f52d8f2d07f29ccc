//! HMAC-SHA256 verification of Telegram Mini App init data.
//!
//! The signing scheme is fixed by Telegram:
//!
//! ```text
//! secret_key = HMAC_SHA256(key = "WebAppData", message = bot_token)
//! hash       = hex(HMAC_SHA256(key = secret_key, message = data_check_string))
//! ```

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString, SecretVec};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;
use url::form_urlencoded;

use super::canonical::{canonicalize, unsigned_data_check_string, HASH_FIELD, USER_FIELD};
use crate::error::{init_data_error, Error, ErrorKind, InitDataErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// Fixed HMAC key used to derive the verification secret from the bot token.
pub const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";

/// The Telegram user a verified payload was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebAppUser {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Wire shape of the `user` field. Telegram sends more fields than these; they are ignored.
#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Option<serde_json::Value>,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

fn new_mac(key: &[u8]) -> Result<HmacSha256, Error> {
    <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| init_data_error(InitDataErrorKind::BadHash, "Invalid HMAC key"))
}

/// Derive the raw secret key that init data for this bot is signed with.
pub fn derive_secret_key(bot_token: &SecretString) -> Result<SecretVec<u8>, Error> {
    let mut mac = new_mac(WEB_APP_DATA_KEY)?;
    mac.update(bot_token.expose_secret().as_bytes());
    Ok(SecretVec::new(mac.finalize().into_bytes().to_vec()))
}

/// Compute the lower-case hex signature of a data-check string.
pub fn sign(data_check_string: &str, bot_token: &SecretString) -> Result<String, Error> {
    let secret_key = derive_secret_key(bot_token)?;
    let mut mac = new_mac(secret_key.expose_secret())?;
    mac.update(data_check_string.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Encode `fields` as an init data query string and append a valid `hash`.
///
/// This is what the Mini App runtime produces; it is handy for fixtures and
/// local tooling that needs to talk to a gate without a real Telegram client.
pub fn encode_signed(fields: &[(&str, &str)], bot_token: &SecretString) -> Result<String, Error> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, value);
    }
    let unsigned = serializer.finish();

    let hash = sign(&unsigned_data_check_string(&unsigned), bot_token)?;

    Ok(format!("{unsigned}&{HASH_FIELD}={hash}"))
}

/// Verify a raw init data string and return the user it was issued for.
///
/// The signature is checked before the `user` field is looked at, so a
/// [`WebAppUser`] only ever comes out of a payload signed with `bot_token`.
pub fn verify(raw: &str, bot_token: &SecretString) -> Result<WebAppUser, Error> {
    let payload = canonicalize(raw)?;

    let candidate = sign(payload.data_check_string(), bot_token)?;
    let matches: bool = candidate
        .as_bytes()
        .ct_eq(payload.hash().as_bytes())
        .into();
    if !matches {
        debug!("Init data signature mismatch");
        return Err(init_data_error(
            InitDataErrorKind::BadHash,
            "init data signature mismatch",
        ));
    }

    let user = payload
        .field(USER_FIELD)
        .ok_or_else(|| init_data_error(InitDataErrorKind::NoUser, "init data has no user field"))?;

    decode_user(user)
}

fn decode_user(user: &str) -> Result<WebAppUser, Error> {
    let bad_json = |err: serde_json::Error| Error {
        source: Some(Box::new(err)),
        error_kind: ErrorKind::InitData(InitDataErrorKind::BadUserJson),
    };

    // Only a JSON object is a user record; serde would also accept a sequence.
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(user).map_err(bad_json)?;
    let record: UserRecord =
        serde_json::from_value(serde_json::Value::Object(object)).map_err(bad_json)?;

    let id = record
        .id
        .as_ref()
        .and_then(serde_json::Value::as_i64)
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            init_data_error(
                InitDataErrorKind::NoUserId,
                "user record has no positive numeric id",
            )
        })?;

    Ok(WebAppUser {
        id,
        username: record.username,
        first_name: record.first_name,
        last_name: record.last_name,
    })
}
