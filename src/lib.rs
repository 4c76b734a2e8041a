//! Backer is the backend of a crowdfunding platform.
//!
//! Users create campaigns, upload images for them, and back them with pledges. This library
//! provides a JSON REST API for managing campaigns and their images and for reading pledges.
//! Only the owner of a campaign may change it, upload images for it, or see who backed it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod campaign;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod not_found;
mod response;
mod routing;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use campaign::{
    Campaign, CampaignFields, CampaignImage, CampaignName, CampaignService, CampaignStore,
    SQLiteCampaignStore, campaign_slug, slugify,
};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{SQLiteTransactionStore, Transaction, TransactionReader, TransactionStore};
pub use user::UserID;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
