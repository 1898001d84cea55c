use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Profile;

/// Request to rank an inline candidate snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[validate(custom(function = "validate_profile"))]
    pub subject: Profile,
    #[serde(default)]
    #[validate(custom(function = "validate_profiles"))]
    pub candidates: Vec<Profile>,
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Query string of the dashboard endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

fn validate_profile(profile: &Profile) -> Result<(), validator::ValidationError> {
    if profile.user_id.trim().is_empty() {
        return Err(validator::ValidationError::new("empty_user_id"));
    }
    Ok(())
}

fn validate_profiles(profiles: &[Profile]) -> Result<(), validator::ValidationError> {
    profiles.iter().try_for_each(validate_profile)
}
