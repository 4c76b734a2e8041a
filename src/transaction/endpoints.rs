//! The route handlers for reading pledges.

use axum::{
    Extension,
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
    response::Response,
};

use crate::{
    AppState, Error, UserID,
    campaign::SQLiteCampaignStore,
    database_id::CampaignId,
    response::{ErrorDetails, endpoint_error_response, error_response, success_response},
    transaction::{SQLiteTransactionStore, TransactionReader},
};

/// The state needed for reading pledges.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// Reads pledges, checking campaign ownership.
    pub transaction_reader: TransactionReader<SQLiteCampaignStore, SQLiteTransactionStore>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_reader: state.transaction_reader.clone(),
        }
    }
}

/// A route handler that lists the pledges made to a campaign.
///
/// Only the owner of the campaign may see its pledges.
pub async fn get_campaign_transactions(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    campaign_id: Result<Path<CampaignId>, PathRejection>,
) -> Response {
    let Path(campaign_id) = match campaign_id {
        Ok(path) => path,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid transaction input",
                Some(ErrorDetails {
                    errors: rejection.body_text(),
                }),
            );
        }
    };

    match state
        .transaction_reader
        .list_by_campaign(campaign_id, user_id)
    {
        Ok(transactions) => success_response(
            StatusCode::OK,
            "Campaign transactions retrieved successfully",
            transactions,
        ),
        Err(error @ Error::NotFound) => {
            endpoint_error_response(&error, StatusCode::NOT_FOUND, "Campaign not found")
        }
        Err(error @ Error::Unauthorized) => endpoint_error_response(
            &error,
            StatusCode::FORBIDDEN,
            "You are not authorized to view the transactions of this campaign",
        ),
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get campaign transactions",
        ),
    }
}

/// A route handler that lists the pledges made by the current user.
pub async fn get_user_transactions(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match state.transaction_reader.list_by_user(user_id) {
        Ok(transactions) => success_response(
            StatusCode::OK,
            "User transactions retrieved successfully",
            transactions,
        ),
        Err(error) => endpoint_error_response(
            &error,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to get user transactions",
        ),
    }
}
