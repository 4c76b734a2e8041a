//! The JSON representations of campaigns.

use serde::{Deserialize, Serialize};

use crate::{
    UserID,
    campaign::{Campaign, CampaignImage},
    database_id::CampaignId,
};

/// A campaign as shown in campaign listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: CampaignId,
    pub user_id: UserID,
    pub name: String,
    pub short_description: String,
    /// The file name of the primary image, or an empty string if there is none.
    pub image_url: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub slug: String,
}

impl From<&Campaign> for CampaignSummary {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            user_id: campaign.user_id,
            name: campaign.name.to_string(),
            short_description: campaign.short_description.clone(),
            image_url: primary_image_url(campaign),
            goal_amount: campaign.goal_amount,
            current_amount: campaign.current_amount,
            slug: campaign.slug.clone(),
        }
    }
}

/// An image as shown on a campaign's detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignImageView {
    pub image_url: String,
    pub is_primary: bool,
}

impl From<&CampaignImage> for CampaignImageView {
    fn from(image: &CampaignImage) -> Self {
        Self {
            image_url: image.file_name.clone(),
            is_primary: image.is_primary,
        }
    }
}

/// A campaign with everything needed for its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetail {
    pub id: CampaignId,
    pub user_id: UserID,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub image_url: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub backer_count: i64,
    pub slug: String,
    pub perks: Vec<String>,
    pub images: Vec<CampaignImageView>,
}

impl From<&Campaign> for CampaignDetail {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            user_id: campaign.user_id,
            name: campaign.name.to_string(),
            short_description: campaign.short_description.clone(),
            description: campaign.description.clone(),
            image_url: primary_image_url(campaign),
            goal_amount: campaign.goal_amount,
            current_amount: campaign.current_amount,
            backer_count: campaign.backer_count,
            slug: campaign.slug.clone(),
            perks: campaign.perks_list().into_iter().map(str::to_owned).collect(),
            images: campaign.images.iter().map(CampaignImageView::from).collect(),
        }
    }
}

fn primary_image_url(campaign: &Campaign) -> String {
    campaign
        .primary_image()
        .map(|image| image.file_name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod campaign_view_tests {
    use time::macros::datetime;

    use crate::{
        UserID,
        campaign::{Campaign, CampaignImage, CampaignName},
    };

    use super::{CampaignDetail, CampaignImageView, CampaignSummary};

    fn campaign_with_images(images: Vec<CampaignImage>) -> Campaign {
        Campaign {
            id: 3,
            user_id: UserID::new(7),
            name: CampaignName::new_unchecked("Build a Well"),
            short_description: "Water for all".to_owned(),
            description: "A long story".to_owned(),
            goal_amount: 1_000,
            current_amount: 250,
            backer_count: 2,
            perks: " Sticker, ,T-shirt ".to_owned(),
            slug: "build-a-well-7".to_owned(),
            created_at: datetime!(2025-10-05 12:00:00 UTC),
            updated_at: datetime!(2025-10-05 12:00:00 UTC),
            images,
        }
    }

    fn image(id: i64, file_name: &str, is_primary: bool) -> CampaignImage {
        CampaignImage {
            id,
            campaign_id: 3,
            file_name: file_name.to_owned(),
            is_primary,
            created_at: datetime!(2025-10-05 12:00:00 UTC),
        }
    }

    #[test]
    fn summary_uses_primary_image() {
        let campaign = campaign_with_images(vec![
            image(1, "images/a.png", false),
            image(2, "images/b.png", true),
        ]);

        let summary = CampaignSummary::from(&campaign);

        assert_eq!(summary.image_url, "images/b.png");
        assert_eq!(summary.slug, "build-a-well-7");
    }

    #[test]
    fn summary_without_primary_image_has_empty_url() {
        let campaign = campaign_with_images(vec![image(1, "images/a.png", false)]);

        assert_eq!(CampaignSummary::from(&campaign).image_url, "");
    }

    #[test]
    fn detail_lists_perks_and_images() {
        let campaign = campaign_with_images(vec![
            image(1, "images/a.png", true),
            image(2, "images/b.png", false),
        ]);

        let detail = CampaignDetail::from(&campaign);

        assert_eq!(detail.perks, vec!["Sticker", "T-shirt"]);
        assert_eq!(detail.backer_count, 2);
        assert_eq!(
            detail.images,
            vec![
                CampaignImageView {
                    image_url: "images/a.png".to_owned(),
                    is_primary: true
                },
                CampaignImageView {
                    image_url: "images/b.png".to_owned(),
                    is_primary: false
                },
            ]
        );
    }
}
