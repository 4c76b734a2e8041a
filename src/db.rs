//! Sets up the application database and guards access to the shared connection.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, campaign::create_campaign_tables, transaction::create_transaction_table};

/// Create all of the application's tables.
///
/// The tables are created inside a single exclusive transaction, so either every table is
/// created or none are. Existing tables are left as is.
///
/// # Errors
///
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_campaign_tables(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the lock for the shared database connection.
///
/// # Errors
///
/// Returns an [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}


#[cfg(test)]
mod lock_connection_tests {
    use std::{
        sync::{Arc, Mutex},
        thread,
    };

    use rusqlite::Connection;

    use crate::Error;

    use super::lock_connection;

    #[test]
    fn poisoned_lock_is_a_lock_error() {
        let connection = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let poisoner = connection.clone();

        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(
            lock_connection(&connection).err(),
            Some(Error::DatabaseLockError)
        );
    }
}
