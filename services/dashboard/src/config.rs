/// Dashboard service configuration loaded from environment variables.
#[derive(Debug)]
pub struct DashboardConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3111). Env var: `DASHBOARD_PORT`.
    pub dashboard_port: u16,
    /// Provider id of the default "personal workspace" organization.
    pub default_org_id: String,
    /// Shared secret expected in `x-webhook-secret` on webhook deliveries.
    pub webhook_secret: String,
    /// Base URL of the identity provider's management API.
    pub identity_api_url: String,
    /// API key for the identity provider's management API.
    pub identity_api_key: String,
    /// Outbox dispatcher poll interval in seconds (default 10).
    /// Env var: `OUTBOX_POLL_SECS`.
    pub outbox_poll_secs: u64,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            dashboard_port: std::env::var("DASHBOARD_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3111),
            default_org_id: std::env::var("DEFAULT_ORG_ID").expect("DEFAULT_ORG_ID"),
            webhook_secret: std::env::var("WEBHOOK_SECRET").expect("WEBHOOK_SECRET"),
            identity_api_url: std::env::var("IDENTITY_API_URL").expect("IDENTITY_API_URL"),
            identity_api_key: std::env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY"),
            outbox_poll_secs: std::env::var("OUTBOX_POLL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
