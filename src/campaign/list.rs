//! The public campaign listing and detail endpoints.

use axum::{
    extract::{FromRef, Path, Query, State, rejection::PathRejection},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    campaign::{CampaignDetail, CampaignService, CampaignSummary, SQLiteCampaignStore},
    database_id::CampaignId,
    response::{ErrorDetails, endpoint_error_response, error_response, success_response},
};

/// The state needed by the campaign endpoints.
#[derive(Debug, Clone)]
pub struct CampaignState {
    /// Reads and writes campaigns.
    pub campaign_service: CampaignService<SQLiteCampaignStore>,
}

impl FromRef<AppState> for CampaignState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            campaign_service: state.campaign_service.clone(),
        }
    }
}

/// The query string for listing campaigns.
#[derive(Debug, Default, Deserialize)]
pub struct ListCampaignsQuery {
    /// Only list the campaigns of this user. Values that are not an integer are ignored.
    pub user_id: Option<String>,
}

impl ListCampaignsQuery {
    fn owner(&self) -> Option<UserID> {
        self.user_id
            .as_deref()
            .and_then(|user_id| user_id.trim().parse().ok())
            .map(UserID::new)
    }
}

/// A route handler that lists every campaign, or the campaigns of one user.
pub async fn get_campaigns(
    State(state): State<CampaignState>,
    Query(query): Query<ListCampaignsQuery>,
) -> Response {
    match state.campaign_service.list_campaigns(query.owner()) {
        Ok(campaigns) => success_response(
            StatusCode::OK,
            "List of campaigns retrieved successfully",
            campaigns
                .iter()
                .map(CampaignSummary::from)
                .collect::<Vec<_>>(),
        ),
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get campaigns",
        ),
    }
}

/// A route handler that gets a campaign with its images and perks.
pub async fn get_campaign(
    State(state): State<CampaignState>,
    campaign_id: Result<Path<CampaignId>, PathRejection>,
) -> Response {
    let Path(campaign_id) = match campaign_id {
        Ok(path) => path,
        Err(rejection) => return invalid_campaign_id(rejection),
    };

    match state.campaign_service.get_campaign_detail(campaign_id) {
        Ok(campaign) => success_response(
            StatusCode::OK,
            "Campaign detail retrieved successfully",
            CampaignDetail::from(&campaign),
        ),
        Err(error @ Error::NotFound) => {
            endpoint_error_response(&error, StatusCode::NOT_FOUND, "Campaign not found")
        }
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get campaign",
        ),
    }
}

pub(super) fn invalid_campaign_id(rejection: PathRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid campaign ID",
        Some(ErrorDetails {
            errors: rejection.body_text(),
        }),
    )
}


#[cfg(test)]
mod campaign_detail_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        UserID,
        campaign::{CampaignDetail, test_utils::test_fields},
        response::{ApiResponse, ErrorDetails},
        test_utils::{assert_status, parse_json_body},
    };

    use super::{get_campaign, test_state::get_state};

    #[tokio::test]
    async fn gets_campaign_detail() {
        let state = get_state();
        let campaign = state
            .campaign_service
            .create_campaign(test_fields("Build a Well"), UserID::new(7))
            .unwrap();
        state
            .campaign_service
            .save_campaign_image(campaign.id, true, "images/well.png")
            .unwrap();
        let want = CampaignDetail::from(
            &state
                .campaign_service
                .get_campaign_detail(campaign.id)
                .unwrap(),
        );

        let response = get_campaign(State(state), Ok(Path(campaign.id))).await;

        assert_status(&response, StatusCode::OK);
        let body: ApiResponse<CampaignDetail> = parse_json_body(response).await;
        let got = body.data.unwrap();
        assert_eq!(got, want);
        assert_eq!(got.image_url, "images/well.png");
        assert_eq!(got.perks, vec!["Sticker", "T-shirt"]);
    }

    #[tokio::test]
    async fn missing_campaign_is_not_found() {
        let response = get_campaign(State(get_state()), Ok(Path(42))).await;

        assert_status(&response, StatusCode::NOT_FOUND);
        let body: ApiResponse<ErrorDetails> = parse_json_body(response).await;
        assert_eq!(body.meta.message, "Campaign not found");
        assert_eq!(body.meta.code, 404);
    }
}
