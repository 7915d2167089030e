//! Transport adapter between the `sse` broadcaster and HTTP.
//!
//! The broadcaster (registry, connection sets, envelopes) lives in the `sse`
//! crate; this module only turns one request into one subscription.

pub(crate) mod handler;
