//! Implements a struct that holds the state of the REST server.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    campaign::{CampaignService, SQLiteCampaignStore},
    db::initialize,
    transaction::{SQLiteTransactionStore, TransactionReader},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The directory that uploaded campaign images are written to.
    pub image_dir: PathBuf,

    /// Reads and writes campaigns and campaign images.
    pub campaign_service: CampaignService<SQLiteCampaignStore>,

    /// Reads pledges, checking campaign ownership.
    pub transaction_reader: TransactionReader<SQLiteCampaignStore, SQLiteTransactionStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// Uploaded images will be written to `image_dir`, which is created by the upload endpoint
    /// when needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        image_dir: &Path,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let campaign_store = SQLiteCampaignStore::new(connection.clone());

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            image_dir: image_dir.to_owned(),
            campaign_service: CampaignService::new(campaign_store.clone()),
            transaction_reader: TransactionReader::new(
                campaign_store,
                SQLiteTransactionStore::new(connection),
            ),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod app_state_tests {
    use std::path::Path;

    use rusqlite::Connection;

    use crate::{UserID, campaign::test_utils::test_fields};

    use super::{AppState, create_cookie_key};

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "secret", Path::new("images")).unwrap();

        assert_eq!(
            state.campaign_service.list_campaigns(None).map(|c| c.len()),
            Ok(0)
        );
        assert_eq!(
            state
                .transaction_reader
                .list_by_user(UserID::new(1))
                .map(|t| t.len()),
            Ok(0)
        );
    }

    #[test]
    fn services_share_one_database() {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "secret", Path::new("images")).unwrap();

        let campaign = state
            .campaign_service
            .create_campaign(test_fields("Build a Well"), UserID::new(7))
            .unwrap();

        assert_eq!(
            state
                .transaction_reader
                .list_by_campaign(campaign.id, UserID::new(7)),
            Ok(vec![])
        );
    }

    #[test]
    fn cookie_key_is_derived_from_secret() {
        assert_eq!(
            create_cookie_key("secret").master(),
            create_cookie_key("secret").master()
        );
        assert_ne!(
            create_cookie_key("secret").master(),
            create_cookie_key("other").master()
        );
    }
}
