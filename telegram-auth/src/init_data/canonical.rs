//! Parsing of the raw `initData` query string into the data-check string.

use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::error::{init_data_error, Error, InitDataErrorKind};

/// Name of the field that carries the signature. It is never part of the signed data.
pub const HASH_FIELD: &str = "hash";

/// Name of the field that carries the JSON encoded user record.
pub const USER_FIELD: &str = "user";

/// An `initData` payload split into its signature and the string that was signed.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPayload {
    hash: String,
    data_check_string: String,
    fields: BTreeMap<String, String>,
}

impl CanonicalPayload {
    /// The hex signature supplied with the payload.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Sorted `key=value` lines joined with `\n`, `hash` excluded.
    pub fn data_check_string(&self) -> &str {
        &self.data_check_string
    }

    /// Look up a decoded field value. Returns `None` for `hash`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Split a raw `initData` string into decoded key/value pairs.
///
/// Values are percent-decoded (`+` decodes to a space) exactly like a browser's
/// `URLSearchParams`. A leading `?` is ignored.
fn decode_pairs(raw: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    form_urlencoded::parse(raw.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned()))
}

/// Decode `raw` into fields, split off `hash`. Duplicate keys collapse to
/// their last occurrence.
fn split_hash(raw: &str) -> (Option<String>, BTreeMap<String, String>) {
    let mut fields: BTreeMap<String, String> = decode_pairs(raw).collect();
    let hash = fields.remove(HASH_FIELD);
    (hash, fields)
}

/// `key=value` lines sorted as whole strings, not by key alone.
fn join_sorted(fields: &BTreeMap<String, String>) -> String {
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort();
    lines.join("\n")
}

/// Build the data-check string for a raw `initData` payload.
///
/// An absent or empty `hash` is rejected as [`InitDataErrorKind::NoHash`].
pub fn canonicalize(raw: &str) -> Result<CanonicalPayload, Error> {
    let (hash, fields) = split_hash(raw);
    let hash = hash
        .filter(|hash| !hash.is_empty())
        .ok_or_else(|| init_data_error(InitDataErrorKind::NoHash, "init data has no hash field"))?;

    Ok(CanonicalPayload {
        hash,
        data_check_string: join_sorted(&fields),
        fields,
    })
}

/// The data-check string of a payload that has not been signed yet.
pub(crate) fn unsigned_data_check_string(raw: &str) -> String {
    join_sorted(&split_hash(raw).1)
}

/// Shape of an `initData` payload, for diagnostics. Nothing here is verified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitDataSummary {
    pub len: usize,
    pub keys: Vec<String>,
    pub has_hash: bool,
    pub has_user: bool,
}

pub fn summarize(raw: &str) -> InitDataSummary {
    let mut keys: Vec<String> = decode_pairs(raw).map(|(key, _)| key).collect();
    keys.sort();

    InitDataSummary {
        len: raw.len(),
        has_hash: keys.iter().any(|k| k == HASH_FIELD),
        has_user: keys.iter().any(|k| k == USER_FIELD),
        keys,
    }
}
