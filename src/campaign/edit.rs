//! Campaign editing endpoint.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
};

use crate::{
    Error, UserID,
    campaign::{
        CampaignFormData, CampaignState, CampaignSummary, create::invalid_input,
        list::invalid_campaign_id,
    },
    database_id::CampaignId,
    response::{endpoint_error_response, success_response},
};

/// A route handler for replacing the details of a campaign.
///
/// Only the owner of the campaign may change it.
pub async fn update_campaign_endpoint(
    State(state): State<CampaignState>,
    Extension(user_id): Extension<UserID>,
    campaign_id: Result<Path<CampaignId>, PathRejection>,
    form: Result<Json<CampaignFormData>, JsonRejection>,
) -> Response {
    let Path(campaign_id) = match campaign_id {
        Ok(path) => path,
        Err(rejection) => return invalid_campaign_id(rejection),
    };

    let Json(form) = match form {
        Ok(json) => json,
        Err(rejection) => return invalid_input(rejection),
    };

    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            return endpoint_error_response(
                &error,
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid input",
            );
        }
    };

    match state
        .campaign_service
        .update_campaign(campaign_id, user_id, fields)
    {
        Ok(campaign) => success_response(
            StatusCode::OK,
            "Campaign updated successfully",
            CampaignSummary::from(&campaign),
        ),
        Err(error @ Error::NotFound) => {
            endpoint_error_response(&error, StatusCode::NOT_FOUND, "Campaign not found")
        }
        Err(error @ Error::Unauthorized) => endpoint_error_response(
            &error,
            StatusCode::FORBIDDEN,
            "You are not authorized to update this campaign",
        ),
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update campaign",
        ),
    }
}

#[cfg(test)]
mod update_campaign_tests {
    use axum::{
        Extension, Json,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        UserID,
        campaign::{
            CampaignFormData, CampaignSummary, test_state::get_state, test_utils::test_fields,
        },
        response::{ApiResponse, ErrorDetails},
        test_utils::{assert_status, parse_json_body},
    };

    use super::update_campaign_endpoint;

    fn form(name: &str) -> CampaignFormData {
        CampaignFormData {
            name: name.to_owned(),
            short_description: "Now with a pump".to_owned(),
            description: "An even longer story".to_owned(),
            goal_amount: 2_000,
            perks: "Mug".to_owned(),
        }
    }

    #[tokio::test]
    async fn owner_can_update_campaign() {
        let state = get_state();
        let campaign = state
            .campaign_service
            .create_campaign(test_fields("Build a Well"), UserID::new(7))
            .unwrap();

        let response = update_campaign_endpoint(
            State(state.clone()),
            Extension(UserID::new(7)),
            Ok(Path(campaign.id)),
            Ok(Json(form("Dig a Well"))),
        )
        .await;

        assert_status(&response, StatusCode::OK);
        let body: ApiResponse<CampaignSummary> = parse_json_body(response).await;
        let got = body.data.unwrap();
        assert_eq!(got.name, "Dig a Well");
        assert_eq!(got.slug, "dig-a-well-7");
        assert_eq!(got.goal_amount, 2_000);
        assert_eq!(got.user_id, UserID::new(7));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_nothing_changes() {
        let state = get_state();
        let campaign = state
            .campaign_service
            .create_campaign(test_fields("Build a Well"), UserID::new(7))
            .unwrap();

        let response = update_campaign_endpoint(
            State(state.clone()),
            Extension(UserID::new(8)),
            Ok(Path(campaign.id)),
            Ok(Json(form("Hijacked"))),
        )
        .await;

        assert_status(&response, StatusCode::FORBIDDEN);
        let body: ApiResponse<ErrorDetails> = parse_json_body(response).await;
        assert_eq!(
            body.meta.message,
            "You are not authorized to update this campaign"
        );
        assert_eq!(
            state.campaign_service.get_campaign_detail(campaign.id),
            Ok(campaign)
        );
    }

    #[tokio::test]
    async fn missing_campaign_is_not_found() {
        let response = update_campaign_endpoint(
            State(get_state()),
            Extension(UserID::new(7)),
            Ok(Path(99)),
            Ok(Json(form("Dig a Well"))),
        )
        .await;

        assert_status(&response, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_name_is_rejected_and_nothing_changes() {
        let state = get_state();
        let campaign = state
            .campaign_service
            .create_campaign(test_fields("Build a Well"), UserID::new(7))
            .unwrap();

        let response = update_campaign_endpoint(
            State(state.clone()),
            Extension(UserID::new(7)),
            Ok(Path(campaign.id)),
            Ok(Json(form(""))),
        )
        .await;

        assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            state.campaign_service.get_campaign_detail(campaign.id),
            Ok(campaign)
        );
    }
}
