//! Check Session Use Case
//!
//! Verifies a session cookie value and returns its claims.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::session_token::{self, SessionPayload};
use crate::error::AuthResult;

/// Check session use case
pub struct CheckSessionUseCase {
    config: Arc<AuthConfig>,
}

impl CheckSessionUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Check if session is valid and return its payload
    pub fn execute(&self, session_token: &str) -> AuthResult<SessionPayload> {
        session_token::decode(
            &self.config.session_secret,
            session_token,
            Utc::now().timestamp_millis(),
        )
    }
}
