//! Defines the transaction store trait.

use crate::{Error, UserID, database_id::CampaignId, transaction::Transaction};

/// Read access to pledge transactions.
pub trait TransactionStore {
    /// Retrieve the transactions made to `campaign_id`, newest first.
    fn get_by_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions made by `user_id`, newest first.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;
}
