use crate::{
    claims::{ApplicationManagementClaims, ClaimNaming, ClientClaims, ClientTokenData, ServerClaims},
    signer::{Hs512Signer, Signer, SigningError},
    time::{SystemClockTimeProvider, TimeProvider},
};
use chrono::{DateTime, TimeDelta, Utc};
use std::{fmt, time::Duration};

/// The default lifetime of an issued token.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60);

// Reject the request if a required field is empty.
macro_rules! require {
    ($value:expr, $field:literal) => {
        if $value.is_empty() {
            tracing::debug!(field = $field, "rejecting client token request");
            return Err(TokenIssueError::MissingField($field));
        }
    };
}

/// Issues signed tokens for authenticating to the platform.
///
/// An issuer holds no per-token state, so a single instance can be shared across threads and used for any number of
/// applications and secrets.
pub struct TokenIssuer {
    time_provider: Box<dyn TimeProvider>,
    lifetime: Duration,
    claim_naming: ClaimNaming,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self {
            time_provider: Box::new(SystemClockTimeProvider),
            lifetime: DEFAULT_TOKEN_LIFETIME,
            claim_naming: ClaimNaming::default(),
        }
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .field("claim_naming", &self.claim_naming)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Construct an issuer that uses the system clock and the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given time provider to timestamp tokens.
    pub fn with_time_provider<T: TimeProvider>(mut self, time_provider: T) -> Self {
        self.time_provider = Box::new(time_provider);
        self
    }

    /// Set how long issued tokens are valid for.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set the claim keys used for the organization in client tokens.
    pub fn with_claim_naming(mut self, claim_naming: ClaimNaming) -> Self {
        self.claim_naming = claim_naming;
        self
    }

    /// Issue a server token, used to authenticate backend requests to the REST API.
    pub fn server_token(&self, app_id: &str, secret: &[u8]) -> Result<String, TokenIssueError> {
        let (issued_at, expires_at) = self.timestamps()?;
        let claims = ServerClaims { app_id, expires_at, issued_at };
        tracing::debug!(app_id, "issuing server token");
        sign(secret, &claims)
    }

    /// Issue an application management token, used to authenticate requests to the applications API.
    pub fn application_management_token(&self, customer_id: &str, secret: &[u8]) -> Result<String, TokenIssueError> {
        let (issued_at, expires_at) = self.timestamps()?;
        let claims = ApplicationManagementClaims { customer_id, expires_at, issued_at };
        tracing::debug!(customer_id, "issuing application management token");
        sign(secret, &claims)
    }

    /// Issue a client token, used to authenticate a user from the frontend.
    ///
    /// The user and organization identifiers are required. When user details are present they must contain an email,
    /// and when organization details are present they must contain a name. Validation stops at the first missing field.
    pub fn client_token(&self, app_id: &str, secret: &[u8], data: &ClientTokenData) -> Result<String, TokenIssueError> {
        let ClientTokenData { user_id, organization_id, user_details, organization_details } = data;
        require!(user_id, "UserID");
        require!(organization_id, "OrganizationID");
        if let Some(details) = user_details {
            require!(details.email, "Email");
        }
        if let Some(details) = organization_details {
            require!(details.name, "Name");
        }

        let (issued_at, expires_at) = self.timestamps()?;
        let mut claims = ClientClaims {
            app_id,
            expires_at,
            group_details: None,
            group_id: None,
            issued_at,
            organization_details: None,
            organization_id: None,
            user_details: user_details.as_ref(),
            user_id,
        };
        match self.claim_naming {
            ClaimNaming::Organization => {
                claims.organization_id = Some(organization_id.as_str());
                claims.organization_details = organization_details.as_ref();
            }
            ClaimNaming::Group => {
                claims.group_id = Some(organization_id.as_str());
                claims.group_details = organization_details.as_ref();
            }
        }
        tracing::debug!(app_id, user_id, organization_id, "issuing client token");
        sign(secret, &claims)
    }

    fn timestamps(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), TokenIssueError> {
        let now = self.time_provider.current_time();
        let expires_at = TimeDelta::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| SigningError::Encoding("claims", "expiration time out of range".into()))?;
        Ok((now, expires_at))
    }
}

/// Issue a server token using the system clock.
///
/// See [`TokenIssuer::server_token`].
pub fn server_token(app_id: &str, secret: &[u8]) -> Result<String, TokenIssueError> {
    TokenIssuer::default().server_token(app_id, secret)
}

/// Issue an application management token using the system clock.
///
/// See [`TokenIssuer::application_management_token`].
pub fn application_management_token(customer_id: &str, secret: &[u8]) -> Result<String, TokenIssueError> {
    TokenIssuer::default().application_management_token(customer_id, secret)
}

/// Issue a client token using the system clock.
///
/// See [`TokenIssuer::client_token`].
pub fn client_token(app_id: &str, secret: &[u8], data: &ClientTokenData) -> Result<String, TokenIssueError> {
    TokenIssuer::default().client_token(app_id, secret, data)
}

fn sign<T: serde::Serialize>(secret: &[u8], claims: &T) -> Result<String, TokenIssueError> {
    let signer = Hs512Signer::new(secret)?;
    Ok(signer.sign_token(claims)?)
}

/// An error when issuing a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenIssueError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),
}
