//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::auth_guard,
    campaign::{
        UPLOAD_BODY_LIMIT, create_campaign_endpoint, get_campaign, get_campaigns,
        update_campaign_endpoint, upload_campaign_image,
    },
    endpoints,
    not_found::get_404_not_found,
    transaction::{get_campaign_transactions, get_user_transactions},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::CAMPAIGNS, get(get_campaigns))
        .route(endpoints::CAMPAIGN, get(get_campaign));

    let protected_routes = Router::new()
        .route(endpoints::CAMPAIGNS, post(create_campaign_endpoint))
        .route(endpoints::CAMPAIGN, put(update_campaign_endpoint))
        .route(
            endpoints::CAMPAIGN_IMAGES,
            post(upload_campaign_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            endpoints::CAMPAIGN_TRANSACTIONS,
            get(get_campaign_transactions),
        )
        .route(endpoints::USER_TRANSACTIONS, get(get_user_transactions))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
