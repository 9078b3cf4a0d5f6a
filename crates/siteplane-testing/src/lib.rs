//! Test support for siteplane services.
//!
//! Builders for identity-provider webhook payloads, so tests exercise the
//! same wire format the provider delivers.

pub mod events;
