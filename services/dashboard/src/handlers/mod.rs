pub mod health;
pub mod organizations;
pub mod sites;
pub mod user;
pub mod webhooks;
