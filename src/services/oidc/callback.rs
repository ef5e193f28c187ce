use crate::services::oidc::LoginService;
use crate::services::oidc::authorize::STATE_KEY;
use crate::services::oidc::error::LoginError;
use crate::session::{SessionContext, SessionValue};

/// Query parameters the provider sends to the callback endpoint, already
/// stripped down to what the flow consumes.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Identity established by a completed login transaction.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub user_name: Option<String>,
    pub picture: Option<String>,
}

impl LoginService {
    /// Finishes a login transaction.
    ///
    /// Stages, in order: provider error passthrough, state validation, code
    /// exchange, identity token verification, claim extraction. State
    /// validation is a hard precondition; nothing goes over the network when
    /// it fails.
    pub async fn handle_callback(
        &self,
        session: &mut dyn SessionContext,
        params: &CallbackParams,
    ) -> Result<VerifiedIdentity, LoginError> {
        if let Some(error) = &params.error {
            return Err(LoginError::Provider {
                error: error.clone(),
                description: params.error_description.clone(),
            });
        }

        let stored = match session.get(STATE_KEY) {
            Some(SessionValue::Text(stored)) => stored,
            _ => return Err(LoginError::StateMismatch),
        };
        if params.state.as_deref() != Some(stored.as_str()) {
            return Err(LoginError::StateMismatch);
        }

        let code = params.code.as_deref().ok_or_else(|| {
            LoginError::TokenExchange("callback did not carry an authorization code".to_string())
        })?;

        let tokens = self.token_client.exchange(&self.provider, code).await?;
        let claims = self.verifier.verify(&tokens.id_token, session)?;

        tracing::info!(sub = %claims.sub, "login completed");

        Ok(VerifiedIdentity {
            user_id: claims.sub,
            user_name: claims.name,
            picture: claims.picture,
        })
    }
}
