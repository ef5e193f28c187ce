use serde::{Deserialize, Serialize};

use crate::services::oidc::callback::{CallbackParams, VerifiedIdentity};

/// Query string the provider appends when redirecting back to `/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Sent by the provider on some flows; not consumed by the login core.
    #[allow(dead_code)]
    pub friendship_status_changed: Option<bool>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackQuery {
    pub fn into_params(self) -> CallbackParams {
        CallbackParams {
            code: self.code,
            state: self.state,
            error: self.error,
            error_description: self.error_description,
        }
    }
}

/// Success body: the verified identity. Absent claims serialize as null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResultResponse {
    pub user_id: String,
    pub user_name: Option<String>,
    pub picture: Option<String>,
}

impl From<VerifiedIdentity> for LoginResultResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            user_name: identity.user_name,
            picture: identity.picture,
        }
    }
}

/// Body returned when the provider itself reported an error at the callback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
