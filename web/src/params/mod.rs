//! This module holds typed parameters for various endpoint inputs.
//!
//! The purpose of this module is to define and manage the parameters that are used as inputs
//! for different endpoints in the web application. Every field is optional: a missing or
//! mistyped field is reported by the domain layer as a structured `input` failure instead
//! of being rejected by the extractor.

pub(crate) mod gate;
