//! Administrator sign-in and session bootstrap

use crate::client::{ApiClient, FALLBACK_ERROR_MESSAGE};
use crate::error::{ClientError, ClientResult};
use crate::retry::with_network_retry;
use crate::session::{IDENTITY_KEY, SessionStore, TOKEN_KEY};
use foodzippy_core::config::RetryConfig;
use foodzippy_core::types::{AdminIdentity, CountPayload};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LOGIN_PATH: &str = "/api/admin/login";
const VALIDATE_PATH: &str = "/api/admin/vendors/unread-count";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    admin: Option<AdminIdentity>,
}

/// Result of restoring a saved session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing saved
    SignedOut,
    /// Token accepted by the backend
    Verified(AdminIdentity),
    /// Backend unreachable; the cached identity is reused
    Unverified(AdminIdentity),
    /// Token rejected; the saved session was cleared
    Expired,
}

impl RestoreOutcome {
    /// Whether the caller is signed in afterwards
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Verified(_) | Self::Unverified(_))
    }
}

/// Signed-in state shared by every command of a run
pub struct AuthContext {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    retry: RetryConfig,
    identity: RwLock<Option<AdminIdentity>>,
}

impl AuthContext {
    /// Create a signed-out context
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>, retry: RetryConfig) -> Self {
        Self {
            client,
            store,
            retry,
            identity: RwLock::new(None),
        }
    }

    /// Client carrying the session token
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Retry policy for calls that may hit a sleeping backend
    #[must_use]
    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Signed-in administrator
    #[must_use]
    pub fn identity(&self) -> Option<AdminIdentity> {
        self.identity.read().clone()
    }

    /// Whether an administrator is signed in
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Signed-in administrator, or an error for commands that need one
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when nobody is signed in.
    pub fn require(&self) -> ClientResult<AdminIdentity> {
        self.identity().ok_or(ClientError::NotAuthenticated)
    }

    /// Sign in and persist the session
    ///
    /// # Errors
    ///
    /// Returns the server's reason when the credentials are refused. Nothing
    /// is stored on failure.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AdminIdentity> {
        let response: LoginResponse = self
            .client
            .post(LOGIN_PATH, &LoginRequest { email, password })
            .await
            .map_err(|err| match err {
                ClientError::Api { status, message } if message == FALLBACK_ERROR_MESSAGE => {
                    ClientError::api(status, "Invalid email or password")
                }
                ClientError::Unauthorized { message } if message == FALLBACK_ERROR_MESSAGE => {
                    ClientError::unauthorized("Invalid email or password")
                }
                other => other,
            })?;

        let token = match response.token {
            Some(token) if response.success && !token.is_empty() => token,
            _ => return Err(ClientError::unauthorized("Login failed")),
        };

        let identity = AdminIdentity {
            email: response.admin.map_or_else(|| email.to_string(), |admin| admin.email),
            role: None,
        };

        self.store.set(TOKEN_KEY, &token).await?;
        self.store
            .set(IDENTITY_KEY, &serde_json::to_string(&identity)?)
            .await?;
        self.client.set_token(Some(token));
        *self.identity.write() = Some(identity.clone());

        info!(email = %identity.email, "Signed in");
        Ok(identity)
    }

    /// Forget the session in memory and on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be updated.
    pub async fn logout(&self) -> ClientResult<()> {
        *self.identity.write() = None;
        self.client.set_token(None);
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(IDENTITY_KEY).await?;
        info!("Signed out");
        Ok(())
    }

    /// Bring back a saved session, checking the token when the backend answers
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store fails.
    pub async fn restore(&self) -> ClientResult<RestoreOutcome> {
        let token = self.store.get(TOKEN_KEY).await?;
        let stored = self.store.get(IDENTITY_KEY).await?;
        let (Some(token), Some(stored)) = (token, stored) else {
            debug!("No saved session");
            return Ok(RestoreOutcome::SignedOut);
        };

        let Ok(identity) = serde_json::from_str::<AdminIdentity>(&stored) else {
            warn!("Saved identity is unreadable, clearing session");
            self.logout().await?;
            return Ok(RestoreOutcome::SignedOut);
        };

        self.client.set_token(Some(token));
        if let Err(err) = self.client.ping().await {
            debug!(error = %err, "Warm-up ping failed");
        }

        let client = &self.client;
        let validation = with_network_retry(&self.retry, "validate session", move |_| {
            client.get::<CountPayload>(VALIDATE_PATH)
        })
        .await;

        match validation {
            Ok(_) => {
                *self.identity.write() = Some(identity.clone());
                debug!(email = %identity.email, "Session verified");
                Ok(RestoreOutcome::Verified(identity))
            }
            Err(err) if err.is_unauthorized() => {
                warn!("Saved token was rejected, clearing session");
                self.logout().await?;
                Ok(RestoreOutcome::Expired)
            }
            Err(err) => {
                warn!(error = %err, email = %identity.email, "Could not verify session, reusing cached identity");
                *self.identity.write() = Some(identity.clone());
                Ok(RestoreOutcome::Unverified(identity))
            }
        }
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("base_url", &self.client.base_url())
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}
