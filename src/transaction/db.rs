//! Database operations for reading pledge transactions.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error, UserID,
    database_id::CampaignId,
    db::lock_connection,
    transaction::{Transaction, TransactionStore},
};

/// Reads pledge transactions from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The table must already exist, see [create_transaction_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn get_by_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;
        get_transactions_by_campaign(campaign_id, &connection)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = lock_connection(&self.connection)?;
        get_transactions_by_user(user_id, &connection)
    }
}

/// Create the transaction table.
///
/// The table is written by the payment workflow, it is created here so that the reads have
/// something to query.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            campaign_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            amount INTEGER NOT NULL,
            status TEXT NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            FOREIGN KEY(campaign_id) REFERENCES campaign(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_campaign_id ON \"transaction\"(campaign_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);",
    )?;

    Ok(())
}

/// Retrieve the transactions made to `campaign_id`, newest first.
pub fn get_transactions_by_campaign(
    campaign_id: CampaignId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, campaign_id, user_id, amount, status, code, created_at
            FROM \"transaction\" WHERE campaign_id = :campaign_id ORDER BY id DESC",
        )?
        .query_map(&[(":campaign_id", &campaign_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions made by `user_id`, newest first.
pub fn get_transactions_by_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, campaign_id, user_id, amount, status, code, created_at
            FROM \"transaction\" WHERE user_id = :user_id ORDER BY id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        user_id: UserID::new(row.get(2)?),
        amount: row.get(3)?,
        status: row.get(4)?,
        code: row.get(5)?,
        created_at: row.get(6)?,
    })
}


#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_transaction_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not open database in memory.");

        let result = create_transaction_table(&connection);

        assert!(result.is_ok(), "got error {result:?}");
    }
}

#[cfg(test)]
mod transaction_query_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        UserID,
        campaign::test_utils::insert_test_campaign,
        db::initialize,
        transaction::{SQLiteTransactionStore, TransactionStore},
    };

    use super::{
        get_transactions_by_campaign, get_transactions_by_user,
        test_utils::insert_test_transaction,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn get_by_campaign_returns_newest_first() {
        let connection = get_test_connection();
        let well = insert_test_campaign("Build a Well", 1, &connection);
        let school = insert_test_campaign("Fix the School", 1, &connection);
        let first = insert_test_transaction(well.id, 2, 100, &connection);
        let second = insert_test_transaction(well.id, 3, 200, &connection);
        insert_test_transaction(school.id, 2, 300, &connection);

        let got = get_transactions_by_campaign(well.id, &connection).unwrap();

        assert_eq!(got, vec![second, first]);
    }

    #[test]
    fn get_by_campaign_without_pledges_is_empty() {
        let connection = get_test_connection();
        let well = insert_test_campaign("Build a Well", 1, &connection);

        let got = get_transactions_by_campaign(well.id, &connection).unwrap();

        assert_eq!(got, vec![]);
    }

    #[test]
    fn get_by_user_returns_only_their_pledges() {
        let connection = get_test_connection();
        let well = insert_test_campaign("Build a Well", 1, &connection);
        let school = insert_test_campaign("Fix the School", 1, &connection);
        let first = insert_test_transaction(well.id, 2, 100, &connection);
        insert_test_transaction(well.id, 3, 200, &connection);
        let third = insert_test_transaction(school.id, 2, 300, &connection);

        let got = get_transactions_by_user(UserID::new(2), &connection).unwrap();

        assert_eq!(got, vec![third, first]);
    }

    #[test]
    fn store_reads_through_shared_connection() {
        let connection = get_test_connection();
        let well = insert_test_campaign("Build a Well", 1, &connection);
        let want = insert_test_transaction(well.id, 8, 100, &connection);
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)));

        assert_eq!(store.get_by_campaign(well.id), Ok(vec![want.clone()]));
        assert_eq!(store.get_by_user(UserID::new(8)), Ok(vec![want]));
    }
}
