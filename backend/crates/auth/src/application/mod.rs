//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod issue_challenge;
pub mod rate_limiter;
pub mod session_token;
pub mod sign_in;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use issue_challenge::IssueChallengeUseCase;
pub use rate_limiter::AuthRateLimiter;
pub use session_token::SessionPayload;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
