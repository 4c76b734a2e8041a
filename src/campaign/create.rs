//! Campaign creation endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};

use crate::{
    UserID,
    campaign::{CampaignFormData, CampaignState, CampaignSummary},
    response::{ErrorDetails, endpoint_error_response, error_response, success_response},
};

/// A route handler for creating a new campaign owned by the current user.
pub async fn create_campaign_endpoint(
    State(state): State<CampaignState>,
    Extension(user_id): Extension<UserID>,
    form: Result<Json<CampaignFormData>, JsonRejection>,
) -> Response {
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

    match state.campaign_service.create_campaign(fields, user_id) {
        Ok(campaign) => success_response(
            StatusCode::CREATED,
            "Campaign created successfully",
            CampaignSummary::from(&campaign),
        ),
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create campaign",
        ),
    }
}

pub(super) fn invalid_input(rejection: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input",
        Some(ErrorDetails {
            errors: rejection.body_text(),
        }),
    )
}
