//! Read access to the pledges made to campaigns.

mod db;
mod domain;
mod endpoints;
mod service;
mod store;

pub use db::{SQLiteTransactionStore, create_transaction_table};
pub use domain::Transaction;
pub use endpoints::{get_campaign_transactions, get_user_transactions};
pub use service::TransactionReader;
pub use store::TransactionStore;

#[cfg(test)]
pub(crate) use db::test_utils;
