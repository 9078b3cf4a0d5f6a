//! Sea-ORM entities for the dashboard service tables.

pub mod organization_memberships;
pub mod organizations;
pub mod outbox_events;
pub mod sites;
pub mod users;
