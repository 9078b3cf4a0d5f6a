use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use siteplane_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::{healthz, readyz},
    organizations::get_organization,
    sites::{create_site, delete_site, get_site_by_slug, list_sites, update_site},
    user::{get_me, get_my_organizations},
    webhooks::receive_identity_event,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Identity webhooks
        .route("/webhooks/identity", post(receive_identity_event))
        // Current user
        .route("/users/@me", get(get_me))
        .route("/users/@me/organizations", get(get_my_organizations))
        // Organizations
        .route("/organizations/{external_id}", get(get_organization))
        // Sites
        .route("/organizations/{external_id}/sites", get(list_sites))
        .route("/organizations/{external_id}/sites", post(create_site))
        .route(
            "/organizations/{external_id}/sites/{slug}",
            get(get_site_by_slug),
        )
        .route("/sites/{site_id}", patch(update_site))
        .route("/sites/{site_id}", delete(delete_site))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
