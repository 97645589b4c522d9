//! Cookie Management Infrastructure
//!
//! Set-Cookie rendering for the session and challenge cookies, and lookup
//! of request cookies across every `Cookie` header.

use axum::http::{HeaderMap, header};
use std::fmt::Write;

const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes shared by every Set-Cookie for one cookie name
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    /// `None` makes a browser-session cookie
    pub max_age_secs: Option<u64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// `name=value` followed by the configured attributes
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.write_attributes(&mut cookie, self.max_age_secs);
        cookie
    }

    /// Empty value, `Max-Age=0` and an epoch `Expires` so every browser drops it
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.write_attributes(&mut cookie, Some(0));
        let _ = write!(cookie, "; Expires={EPOCH_HTTP_DATE}");
        cookie
    }

    fn write_attributes(&self, cookie: &mut String, max_age_secs: Option<u64>) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        let _ = write!(cookie, "; SameSite={}; Path={}", self.same_site.as_str(), self.path);
        if let Some(max_age) = max_age_secs {
            let _ = write!(cookie, "; Max-Age={max_age}");
        }
    }
}

/// First non-empty value for `name` across all `Cookie` headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
