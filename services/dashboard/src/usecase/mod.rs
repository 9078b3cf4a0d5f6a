pub mod access;
pub mod outbox;
pub mod sites;
pub mod sync;
pub mod user;
