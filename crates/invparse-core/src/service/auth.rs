//! Authentication port and its in-process mock.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::error::{AuthError, Result};
use crate::models::config::IngestionConfig;
use crate::models::session::{Plan, User};

/// Id given to every mock user.
pub const DEMO_USER_ID: &str = "1";

/// Display name of users created by [`MockAuth::login`].
pub const DEMO_USER_NAME: &str = "Demo User";

/// Account backend.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Sign in with existing credentials.
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// Create an account and sign in.
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User>;
}

/// Accepts any well-formed credentials after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockAuth {
    delay: Duration,
}

impl MockAuth {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Mock using `auth_delay_ms` from the ingestion configuration.
    pub fn from_config(config: &IngestionConfig) -> Self {
        Self::new(config.auth_delay_ms)
    }

    /// Mock without latency.
    pub fn immediate() -> Self {
        Self::from_config(&IngestionConfig::immediate())
    }

    /// Simulated latency of every call.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default())
    }
}

fn check_credentials(email: &str, password: &str) -> std::result::Result<(), AuthError> {
    if !email.contains('@') || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(())
}

fn free_user(name: &str, email: &str) -> User {
    User {
        id: DEMO_USER_ID.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        plan: Plan::Free,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl AuthPort for MockAuth {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.wait().await;
        check_credentials(email, password)?;

        info!("Signed in {}", email);
        Ok(free_user(DEMO_USER_NAME, email))
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        self.wait().await;
        check_credentials(email, password)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName.into());
        }

        info!("Created account for {}", email);
        Ok(free_user(name, email))
    }
}
