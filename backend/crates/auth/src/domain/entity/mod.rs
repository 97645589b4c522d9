//! Entity Module

pub mod challenge;
pub mod identity;
pub mod session_claims;
pub mod sign_in_message;

pub use challenge::Challenge;
pub use identity::{Identity, IdentityStats};
pub use session_claims::SessionClaims;
pub use sign_in_message::{SignInMessage, ValidationReport};
