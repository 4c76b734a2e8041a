//! Core campaign domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    database_id::{CampaignId, CampaignImageId},
};

/// A validated, non-empty campaign name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CampaignName(String);

impl CampaignName {
    /// Create a campaign name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCampaignName] if `name` is empty or only
    /// whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCampaignName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a campaign name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CampaignName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CampaignName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A crowdfunding campaign.
///
/// The owner, `user_id`, is set when the campaign is created and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// The ID of the campaign.
    pub id: CampaignId,
    /// The user that created, and therefore owns, the campaign.
    pub user_id: UserID,
    /// The name of the campaign.
    pub name: CampaignName,
    /// A one line summary shown in campaign listings.
    pub short_description: String,
    /// The full story of the campaign.
    pub description: String,
    /// The amount of money the campaign is trying to raise.
    pub goal_amount: i64,
    /// The amount pledged so far. Maintained by the transaction workflow.
    pub current_amount: i64,
    /// The number of pledges so far. Maintained by the transaction workflow.
    pub backer_count: i64,
    /// Comma separated text describing the rewards for backers.
    pub perks: String,
    /// URL-safe identifier derived from the name and owner, see [crate::campaign::campaign_slug].
    pub slug: String,
    /// When the campaign was created.
    pub created_at: OffsetDateTime,
    /// When the campaign was last changed.
    pub updated_at: OffsetDateTime,
    /// The campaign's images ordered by ID.
    pub images: Vec<CampaignImage>,
}

impl Campaign {
    /// The image marked as primary, if any.
    pub fn primary_image(&self) -> Option<&CampaignImage> {
        self.images.iter().find(|image| image.is_primary)
    }

    /// The perks as a list, split on commas.
    ///
    /// Surrounding whitespace is trimmed and empty entries are skipped.
    pub fn perks_list(&self) -> Vec<&str> {
        self.perks
            .split(',')
            .map(str::trim)
            .filter(|perk| !perk.is_empty())
            .collect()
    }
}

/// An image uploaded for a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CampaignImage {
    /// The ID of the image.
    pub id: CampaignImageId,
    /// The campaign the image belongs to.
    pub campaign_id: CampaignId,
    /// Where the uploaded file was stored.
    pub file_name: String,
    /// Whether this is the image that represents the campaign.
    ///
    /// At most one image per campaign is primary.
    pub is_primary: bool,
    /// When the image was uploaded.
    pub created_at: OffsetDateTime,
}

/// The fields of a campaign that its owner may change.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignFields {
    /// The name of the campaign.
    pub name: CampaignName,
    /// A one line summary shown in campaign listings.
    pub short_description: String,
    /// The full story of the campaign.
    pub description: String,
    /// The amount of money the campaign is trying to raise, always positive.
    pub goal_amount: i64,
    /// Comma separated text describing the rewards for backers.
    pub perks: String,
}

/// A campaign that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    /// The owner of the new campaign.
    pub user_id: UserID,
    /// The validated fields of the new campaign.
    pub fields: CampaignFields,
    /// The slug derived from the name and owner.
    pub slug: String,
}

/// A campaign image that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCampaignImage {
    /// The campaign the image belongs to.
    pub campaign_id: CampaignId,
    /// Where the uploaded file was stored.
    pub file_name: String,
    /// Whether the image should become the campaign's primary image.
    pub is_primary: bool,
}

/// JSON data for campaign creation and editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignFormData {
    /// The campaign name, must not be blank.
    pub name: String,
    /// A one line summary of the campaign.
    pub short_description: String,
    /// The full story of the campaign.
    pub description: String,
    /// The funding goal, must be positive.
    pub goal_amount: i64,
    /// Comma separated perks.
    pub perks: String,
}

impl CampaignFormData {
    /// Check the form data and convert it into [CampaignFields].
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyCampaignName] if the name is blank, or an
    /// [Error::InvalidGoalAmount] if the goal amount is not positive.
    pub fn validate(self) -> Result<CampaignFields, Error> {
        let name = CampaignName::new(&self.name)?;

        if self.goal_amount <= 0 {
            return Err(Error::InvalidGoalAmount(self.goal_amount));
        }

        Ok(CampaignFields {
            name,
            short_description: self.short_description,
            description: self.description,
            goal_amount: self.goal_amount,
            perks: self.perks,
        })
    }
}

#[cfg(test)]
mod campaign_name_tests {
    use crate::{Error, campaign::CampaignName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CampaignName::new(""), Err(Error::EmptyCampaignName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CampaignName::new("\n\t \r"), Err(Error::EmptyCampaignName));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CampaignName::new("  Build a Well ").unwrap();

        assert_eq!(name.as_ref(), "Build a Well");
    }
}

#[cfg(test)]
mod campaign_form_data_tests {
    use crate::{
        Error,
        campaign::{CampaignFormData, CampaignName},
    };

    fn form(name: &str, goal_amount: i64) -> CampaignFormData {
        CampaignFormData {
            name: name.to_owned(),
            short_description: "Short".to_owned(),
            description: "Long".to_owned(),
            goal_amount,
            perks: "Sticker, T-shirt".to_owned(),
        }
    }

    #[test]
    fn validate_succeeds() {
        let fields = form("Build a Well", 1_000_000).validate().unwrap();

        assert_eq!(fields.name, CampaignName::new_unchecked("Build a Well"));
        assert_eq!(fields.goal_amount, 1_000_000);
        assert_eq!(fields.perks, "Sticker, T-shirt");
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert_eq!(form(" ", 100).validate(), Err(Error::EmptyCampaignName));
    }

    #[test]
    fn validate_rejects_non_positive_goal() {
        assert_eq!(form("Well", 0).validate(), Err(Error::InvalidGoalAmount(0)));
        assert_eq!(
            form("Well", -5).validate(),
            Err(Error::InvalidGoalAmount(-5))
        );
    }
}
