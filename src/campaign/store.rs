//! Defines the campaign store trait.

use crate::{
    Error, UserID,
    campaign::{Campaign, CampaignImage, NewCampaign, NewCampaignImage},
    database_id::CampaignId,
};

/// Handles the persistence of campaigns and their images.
///
/// Lookups by ID return `Ok(None)` when there is no such campaign, errors are reserved for
/// storage failures.
pub trait CampaignStore {
    /// Retrieve a campaign, including its images.
    fn get(&self, id: CampaignId) -> Result<Option<Campaign>, Error>;

    /// Retrieve every campaign, including their images.
    fn get_all(&self) -> Result<Vec<Campaign>, Error>;

    /// Retrieve the campaigns owned by `user_id`, including their images.
    fn get_by_owner(&self, user_id: UserID) -> Result<Vec<Campaign>, Error>;

    /// Save a new campaign and return it with its generated ID.
    fn create(&self, campaign: NewCampaign) -> Result<Campaign, Error>;

    /// Overwrite the stored campaign with the mutable fields and slug of `campaign`.
    ///
    /// The owner of a campaign is never changed by an update.
    fn update(&self, campaign: &Campaign) -> Result<Campaign, Error>;

    /// Clear the primary flag of every image belonging to `campaign_id`.
    ///
    /// Returns the number of images that were changed.
    fn mark_all_images_non_primary(&self, campaign_id: CampaignId) -> Result<usize, Error>;

    /// Save a new image row as is.
    fn create_image(&self, image: NewCampaignImage) -> Result<CampaignImage, Error>;

    /// Save a new image, demoting the campaign's other images first if `image` is primary.
    ///
    /// If demoting fails the image is not saved. The default implementation runs the two steps
    /// as separate calls, stores that can should run them in a single transaction.
    fn save_image(&self, image: NewCampaignImage) -> Result<CampaignImage, Error> {
        if image.is_primary {
            self.mark_all_images_non_primary(image.campaign_id)?;
        }

        self.create_image(image)
    }
}
