//! The API endpoints URIs.
//!
//! Tests fill in the parameter of endpoints such as '/api/v1/campaigns/{campaign_id}' with
//! `format_endpoint`.

/// The route for listing campaigns (GET) and creating a campaign (POST).
pub const CAMPAIGNS: &str = "/api/v1/campaigns";
/// The route for getting (GET) and updating (PUT) a single campaign.
pub const CAMPAIGN: &str = "/api/v1/campaigns/{campaign_id}";
/// The route for uploading a campaign image.
pub const CAMPAIGN_IMAGES: &str = "/api/v1/campaign-images";
/// The route for listing the pledges made to a campaign.
pub const CAMPAIGN_TRANSACTIONS: &str = "/api/v1/campaigns/{campaign_id}/transactions";
/// The route for listing the pledges made by the current user.
pub const USER_TRANSACTIONS: &str = "/api/v1/transactions";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace, e.g. '{campaign_id}'
/// in '/api/v1/campaigns/{campaign_id}'. Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
