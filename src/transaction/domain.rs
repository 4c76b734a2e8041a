//! The pledge transaction domain type.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    UserID,
    database_id::{CampaignId, TransactionId},
};

/// A pledge made by a user to a campaign.
///
/// Transactions are created and settled by the payment workflow, this crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The campaign that was backed.
    pub campaign_id: CampaignId,
    /// The backer who made the pledge.
    pub user_id: UserID,
    /// The amount pledged.
    pub amount: i64,
    /// The payment status reported by the payment workflow, e.g. "pending" or "paid".
    pub status: String,
    /// The external payment reference. May be empty.
    pub code: String,
    /// When the pledge was made.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
