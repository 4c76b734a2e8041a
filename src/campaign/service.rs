//! The rules for reading, creating and changing campaigns.

use crate::{
    Error, UserID,
    campaign::{
        Campaign, CampaignFields, CampaignImage, CampaignStore, NewCampaign, NewCampaignImage,
        campaign_slug,
    },
    database_id::CampaignId,
};

/// Owns the lifecycle of campaigns and their images.
///
/// This is the only code that writes campaigns and campaign images. Every change to an
/// existing campaign is checked against the campaign's owner first.
#[derive(Debug, Clone)]
pub struct CampaignService<S> {
    store: S,
}

impl<S: CampaignStore> CampaignService<S> {
    /// Create a service that reads and writes campaigns through `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List the campaigns of `owner`, or every campaign if `owner` is `None` or zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be read.
    pub fn list_campaigns(&self, owner: Option<UserID>) -> Result<Vec<Campaign>, Error> {
        match owner {
            Some(user_id) if user_id.as_i64() != 0 => self.store.get_by_owner(user_id),
            _ => self.store.get_all(),
        }
    }

    /// Get a campaign and its images.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no campaign with `campaign_id`, or an error if
    /// the store could not be read.
    pub fn get_campaign_detail(&self, campaign_id: CampaignId) -> Result<Campaign, Error> {
        self.store.get(campaign_id)?.ok_or(Error::NotFound)
    }

    /// Create a campaign owned by `owner`.
    ///
    /// The slug is derived from the campaign name and `owner`.
    pub fn create_campaign(&self, fields: CampaignFields, owner: UserID) -> Result<Campaign, Error> {
        let slug = campaign_slug(fields.name.as_ref(), owner);

        let campaign = self.store.create(NewCampaign {
            user_id: owner,
            fields,
            slug,
        })?;

        tracing::info!(
            "user {owner} created campaign {} \"{}\"",
            campaign.id,
            campaign.slug
        );

        Ok(campaign)
    }

    /// Replace the name, descriptions, goal and perks of a campaign and recompute its slug.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no campaign with `campaign_id`, an
    /// [Error::Unauthorized] if `requester` does not own the campaign, or an error if the store
    /// could not be read or written. Nothing is written unless every check passes.
    pub fn update_campaign(
        &self,
        campaign_id: CampaignId,
        requester: UserID,
        fields: CampaignFields,
    ) -> Result<Campaign, Error> {
        let mut campaign = self.get_owned_campaign(campaign_id, requester)?;

        campaign.slug = campaign_slug(fields.name.as_ref(), campaign.user_id);
        campaign.name = fields.name;
        campaign.short_description = fields.short_description;
        campaign.description = fields.description;
        campaign.goal_amount = fields.goal_amount;
        campaign.perks = fields.perks;

        self.store.update(&campaign)
    }

    /// Check that `user_id` owns the campaign `campaign_id`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no campaign with `campaign_id`, an
    /// [Error::Unauthorized] if `user_id` is not the owner, or an error if the store could not
    /// be read.
    pub fn validate_ownership(&self, campaign_id: CampaignId, user_id: UserID) -> Result<(), Error> {
        self.get_owned_campaign(campaign_id, user_id).map(|_| ())
    }

    /// Save an uploaded image for a campaign.
    ///
    /// If `is_primary` is set, every other image of the campaign stops being primary. Callers
    /// should check ownership with [CampaignService::validate_ownership] first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be written. If clearing the other images' primary
    /// flag fails, the new image is not saved.
    pub fn save_campaign_image(
        &self,
        campaign_id: CampaignId,
        is_primary: bool,
        file_name: &str,
    ) -> Result<CampaignImage, Error> {
        self.store.save_image(NewCampaignImage {
            campaign_id,
            file_name: file_name.to_owned(),
            is_primary,
        })
    }

    fn get_owned_campaign(
        &self,
        campaign_id: CampaignId,
        user_id: UserID,
    ) -> Result<Campaign, Error> {
        let campaign = self.get_campaign_detail(campaign_id)?;

        if campaign.user_id != user_id {
            tracing::debug!(
                "user {user_id} tried to modify campaign {campaign_id} owned by user {}",
                campaign.user_id
            );
            return Err(Error::Unauthorized);
        }

        Ok(campaign)
    }
}
