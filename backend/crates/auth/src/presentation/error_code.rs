//! User-facing auth error categories
//!
//! The sign-in page redirects with an opaque `?error=` code. Only these four
//! categories are ever shown; unknown codes fall back to `Default`.

use crate::presentation::dto::AuthErrorResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    Configuration,
    AccessDenied,
    Verification,
    Default,
}

impl AuthErrorCode {
    pub fn parse(code: Option<&str>) -> Self {
        match code {
            Some("Configuration") => Self::Configuration,
            Some("AccessDenied") => Self::AccessDenied,
            Some("Verification") => Self::Verification,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration",
            Self::AccessDenied => "AccessDenied",
            Self::Verification => "Verification",
            Self::Default => "Default",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Configuration => "Server Configuration Error",
            Self::AccessDenied => "Access Denied",
            Self::Verification => "Verification Failed",
            Self::Default => "Authentication Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Configuration => {
                "There is a problem with the server configuration. Please try again later."
            }
            Self::AccessDenied => "You do not have permission to sign in.",
            Self::Verification => {
                "The signature verification failed. Please try signing the message again."
            }
            Self::Default => "An error occurred during authentication. Please try again.",
        }
    }

    pub fn can_retry(&self) -> bool {
        !matches!(self, Self::AccessDenied)
    }
}

impl From<AuthErrorCode> for AuthErrorResponse {
    fn from(code: AuthErrorCode) -> Self {
        Self {
            code: code.as_str(),
            title: code.title(),
            description: code.description(),
            can_retry: code.can_retry(),
        }
    }
}
