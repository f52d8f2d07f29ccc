//! Wire shapes of the JSON bodies this service answers with.
//!
//! Every gate, track and diagnostic response is sent with HTTP 200; `ok`
//! says whether the operation succeeded.

pub(crate) mod diagnostics;
pub(crate) mod gate;
