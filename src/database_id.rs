//! Database ID type definitions.

/// Database identifier for a campaign.
pub type CampaignId = i64;
/// Database identifier for a campaign image.
pub type CampaignImageId = i64;
/// Database identifier for a pledge transaction.
pub type TransactionId = i64;
