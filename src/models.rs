//! Data models and configuration
//!
//! Defines the request-scoped values that flow through the pipeline and the
//! process configuration loaded once at startup.

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Base64 text of a PNG-encoded image, ready for a form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn new(base64: String) -> Self {
        Self(base64)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Public URL returned by the image host. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImageUrl(String);

impl HostedImageUrl {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::Upload("Image host returned an empty URL".to_string()));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostedImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generated alt text. Holds at least one accumulated fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(text: String) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::Generation("No alt text generated".to_string()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_IMGBB_BASE_URL: &str = "https://api.imgbb.com";
pub const DEFAULT_WORDWARE_BASE_URL: &str = "https://app.wordware.ai";
pub const DEFAULT_WORDWARE_APP_ID: &str = "0081a6fd-4218-4233-a4b5-2d58674eaf6a";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub imgbb_api_key: String,
    pub imgbb_base_url: String,
    pub wordware_api_key: String,
    pub wordware_base_url: String,
    pub wordware_app_id: String,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imgbb_api_key: String::new(),
            imgbb_base_url: DEFAULT_IMGBB_BASE_URL.to_string(),
            wordware_api_key: String::new(),
            wordware_base_url: DEFAULT_WORDWARE_BASE_URL.to_string(),
            wordware_app_id: DEFAULT_WORDWARE_APP_ID.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// API keys are not validated here; a missing key only produces a warning
    /// and the remote service rejects the request later.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let imgbb_api_key = lookup("IMGBB_API_KEY").unwrap_or_default();
        if imgbb_api_key.is_empty() {
            tracing::warn!("IMGBB_API_KEY not set; image uploads will be rejected");
        }
        let wordware_api_key = lookup("WORDWARE_API_KEY").unwrap_or_default();
        if wordware_api_key.is_empty() {
            tracing::warn!("WORDWARE_API_KEY not set; description requests will be rejected");
        }

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_number("MAX_UPLOAD_BYTES", &raw)?,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            imgbb_api_key,
            imgbb_base_url: lookup("IMGBB_BASE_URL").unwrap_or(defaults.imgbb_base_url),
            wordware_api_key,
            wordware_base_url: lookup("WORDWARE_BASE_URL").unwrap_or(defaults.wordware_base_url),
            wordware_app_id: lookup("WORDWARE_APP_ID").unwrap_or(defaults.wordware_app_id),
            request_timeout,
            max_upload_bytes,
            dry_run: lookup("DRY_RUN")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a positive integer, got '{}'", name, raw)))
}
