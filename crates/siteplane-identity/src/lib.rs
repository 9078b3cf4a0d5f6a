//! Identity types shared across siteplane services.
//!
//! Provides the gateway-injected [`identity::Identity`] extractor.

pub mod identity;
