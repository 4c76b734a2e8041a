//! Crowdfunding campaigns and their images.

mod create;
mod db;
mod domain;
mod edit;
mod image_upload;
mod list;
mod service;
mod slug;
mod store;
mod view;

pub use create::create_campaign_endpoint;
pub use db::{SQLiteCampaignStore, create_campaign_tables};
pub use domain::{
    Campaign, CampaignFields, CampaignFormData, CampaignImage, CampaignName, NewCampaign,
    NewCampaignImage,
};
pub use edit::update_campaign_endpoint;
pub use image_upload::{UPLOAD_BODY_LIMIT, upload_campaign_image};
pub use list::{CampaignState, get_campaign, get_campaigns};
pub use service::CampaignService;
pub use slug::{campaign_slug, slugify};
pub use store::CampaignStore;
pub use view::{CampaignDetail, CampaignSummary};

#[cfg(test)]
pub(crate) use db::test_utils;
#[cfg(test)]
use list::test_state;
