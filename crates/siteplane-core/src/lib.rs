//! Cross-cutting service plumbing: request-id middleware, tracing init,
//! and serde helpers.

pub mod middleware;
pub mod serde;
pub mod tracing;
