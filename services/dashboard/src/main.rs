use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::{error, info};

use siteplane_core::tracing::init_tracing;
use siteplane_dashboard::config::DashboardConfig;
use siteplane_dashboard::domain::types::DefaultOrg;
use siteplane_dashboard::infra::enrollment::HttpEnrollmentClient;
use siteplane_dashboard::router::build_router;
use siteplane_dashboard::state::AppState;
use siteplane_dashboard::usecase::outbox::{DEFAULT_BATCH_SIZE, DispatchOutboxUseCase};

#[tokio::main]
async fn main() {
    init_tracing("dashboard");

    let config = DashboardConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        default_org: DefaultOrg::new(config.default_org_id),
        webhook_secret: Arc::from(config.webhook_secret.as_str()),
        enrollment: HttpEnrollmentClient::new(config.identity_api_url, config.identity_api_key),
    };

    // Outbox dispatcher loop
    let worker_state = state.clone();
    let poll_interval = Duration::from_secs(config.outbox_poll_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;
            let uc = DispatchOutboxUseCase {
                outbox: worker_state.outbox_repo(),
                enrollment: worker_state.enrollment_client(),
                default_org: worker_state.default_org.clone(),
            };
            if let Err(e) = uc.execute(DEFAULT_BATCH_SIZE).await {
                error!(error = %e, "outbox dispatch cycle failed");
            }
        }
    });

    // HTTP server
    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.dashboard_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("dashboard service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
