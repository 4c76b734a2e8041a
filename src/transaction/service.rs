//! Scoped reads of pledge transactions.

use crate::{
    Error, UserID,
    campaign::CampaignStore,
    database_id::CampaignId,
    transaction::{Transaction, TransactionStore},
};

/// Reads pledge transactions on behalf of a user.
///
/// A campaign's pledges are only visible to the campaign's owner, while every user can see the
/// pledges they made themselves.
#[derive(Debug, Clone)]
pub struct TransactionReader<C, T> {
    campaigns: C,
    transactions: T,
}

impl<C: CampaignStore, T: TransactionStore> TransactionReader<C, T> {
    /// Create a reader that checks ownership against `campaigns` and reads from `transactions`.
    pub fn new(campaigns: C, transactions: T) -> Self {
        Self {
            campaigns,
            transactions,
        }
    }

    /// List the pledges made to a campaign, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no campaign with `campaign_id`, an
    /// [Error::Unauthorized] if `requester` does not own the campaign, or an error if a store
    /// could not be read. The transactions are not read unless both checks pass.
    pub fn list_by_campaign(
        &self,
        campaign_id: CampaignId,
        requester: UserID,
    ) -> Result<Vec<Transaction>, Error> {
        let campaign = self.campaigns.get(campaign_id)?.ok_or(Error::NotFound)?;

        if campaign.user_id != requester {
            tracing::debug!(
                "user {requester} tried to read the pledges of campaign {campaign_id} owned by user {}",
                campaign.user_id
            );
            return Err(Error::Unauthorized);
        }

        self.transactions.get_by_campaign(campaign_id)
    }

    /// List the pledges made by `user_id`, newest first.
    pub fn list_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.transactions.get_by_user(user_id)
    }
}

#[cfg(test)]
mod transaction_reader_tests {
    use std::{
        cell::Cell,
        sync::{Arc, Mutex},
    };

    use rusqlite::Connection;

    use crate::{
        Error, UserID,
        campaign::{SQLiteCampaignStore, test_utils::insert_test_campaign},
        database_id::CampaignId,
        db::initialize,
        transaction::{
            SQLiteTransactionStore, Transaction, TransactionStore,
            test_utils::insert_test_transaction,
        },
    };

    use super::TransactionReader;

    /// Counts the reads so tests can check that a rejected request never touches the store.
    struct CountingTransactionStore {
        inner: SQLiteTransactionStore,
        reads: Cell<usize>,
    }

    impl TransactionStore for CountingTransactionStore {
        fn get_by_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Transaction>, Error> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_by_campaign(campaign_id)
        }

        fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_by_user(user_id)
        }
    }

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        Arc::new(Mutex::new(connection))
    }

    fn get_reader(
        connection: &Arc<Mutex<Connection>>,
    ) -> TransactionReader<SQLiteCampaignStore, CountingTransactionStore> {
        TransactionReader::new(
            SQLiteCampaignStore::new(connection.clone()),
            CountingTransactionStore {
                inner: SQLiteTransactionStore::new(connection.clone()),
                reads: Cell::new(0),
            },
        )
    }

    #[test]
    fn owner_can_list_campaign_pledges() {
        let connection = get_test_connection();
        let (campaign, first, second) = {
            let connection = connection.lock().unwrap();
            let campaign = insert_test_campaign("Build a Well", 1, &connection);
            let first = insert_test_transaction(campaign.id, 2, 100, &connection);
            let second = insert_test_transaction(campaign.id, 3, 200, &connection);
            (campaign, first, second)
        };
        let reader = get_reader(&connection);

        let got = reader.list_by_campaign(campaign.id, UserID::new(1));

        assert_eq!(got, Ok(vec![second, first]));
    }

    #[test]
    fn non_owner_is_unauthorized_and_store_is_not_read() {
        let connection = get_test_connection();
        let campaign = {
            let connection = connection.lock().unwrap();
            let campaign = insert_test_campaign("Build a Well", 1, &connection);
            insert_test_transaction(campaign.id, 2, 100, &connection);
            campaign
        };
        let reader = get_reader(&connection);

        let got = reader.list_by_campaign(campaign.id, UserID::new(2));

        assert_eq!(got, Err(Error::Unauthorized));
        assert_eq!(reader.transactions.reads.get(), 0);
    }

    #[test]
    fn missing_campaign_is_not_found_and_store_is_not_read() {
        let connection = get_test_connection();
        let reader = get_reader(&connection);

        let got = reader.list_by_campaign(42, UserID::new(1));

        assert_eq!(got, Err(Error::NotFound));
        assert_eq!(reader.transactions.reads.get(), 0);
    }

    #[test]
    fn owner_of_campaign_without_pledges_gets_empty_list() {
        let connection = get_test_connection();
        let campaign = insert_test_campaign("Build a Well", 1, &connection.lock().unwrap());
        let reader = get_reader(&connection);

        let got = reader.list_by_campaign(campaign.id, UserID::new(1));

        assert_eq!(got, Ok(vec![]));
    }

    #[test]
    fn list_by_user_returns_own_pledges_without_ownership_check() {
        let connection = get_test_connection();
        let (first, second) = {
            let connection = connection.lock().unwrap();
            let well = insert_test_campaign("Build a Well", 1, &connection);
            let school = insert_test_campaign("Fix the School", 3, &connection);
            let first = insert_test_transaction(well.id, 2, 100, &connection);
            insert_test_transaction(well.id, 3, 150, &connection);
            let second = insert_test_transaction(school.id, 2, 200, &connection);
            (first, second)
        };
        let reader = get_reader(&connection);

        let got = reader.list_by_user(UserID::new(2));

        assert_eq!(got, Ok(vec![second, first]));
    }

    #[test]
    fn list_by_user_without_pledges_is_empty() {
        let connection = get_test_connection();
        let reader = get_reader(&connection);

        assert_eq!(reader.list_by_user(UserID::new(2)), Ok(vec![]));
    }
}
