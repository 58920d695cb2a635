//! Gmail access tokens for an already-authorized user
//!
//! The consent flow happens elsewhere; this module only turns a stored
//! refresh token into short-lived access tokens.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::AuthError;

/// Token filename in the config directory
const TOKEN_FILE: &str = "gmail-token.json";

/// Environment variable holding the authorized-user JSON
const TOKEN_ENV: &str = "GMAIL_TOKEN_JSON";

/// Seconds before expiry at which a cached token is considered stale
const EXPIRY_BUFFER_SECS: i64 = 300;

/// Source of bearer tokens for Gmail API requests
pub trait TokenProvider {
    fn access_token(&self) -> Result<String>;
}

/// A fixed bearer token; useful when the caller manages refresh itself
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Google "authorized user" credentials (the format written by Google's
/// client libraries after a consent flow)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Last access token, if one was exported
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl AuthorizedUser {
    /// Load credentials using the following priority:
    /// 1. JSON file (~/.config/pdfharvest/gmail-token.json)
    /// 2. GMAIL_TOKEN_JSON environment variable
    pub fn load() -> Result<Self> {
        if config::config_exists(TOKEN_FILE) {
            return config::load_json(TOKEN_FILE);
        }

        let json = std::env::var(TOKEN_ENV).with_context(|| {
            format!(
                "No {} in the config directory and {} is not set",
                TOKEN_FILE, TOKEN_ENV
            )
        })?;
        Self::from_json(&json)
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse authorized user JSON")
    }

    /// Default token file path (~/.config/pdfharvest/gmail-token.json)
    pub fn default_path() -> Option<PathBuf> {
        config::config_path(TOKEN_FILE)
    }
}

/// Token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<i64>,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at > now + EXPIRY_BUFFER_SECS)
    }
}

/// Refreshing token provider for Gmail
pub struct GmailAuth {
    user: AuthorizedUser,
    cached: Mutex<Option<CachedToken>>,
}

impl GmailAuth {
    const TOKEN_URL: &'static str = "https://oauth2.googleapis.com/token";

    pub fn new(user: AuthorizedUser) -> Self {
        let cached = user.token.clone().map(|access_token| CachedToken {
            access_token,
            expires_at: user.expiry.map(|e| e.timestamp()),
        });

        Self {
            user,
            cached: Mutex::new(cached),
        }
    }

    /// Refresh an access token using the stored refresh token
    fn refresh(&self) -> Result<CachedToken> {
        let token_uri = self.user.token_uri.as_deref().unwrap_or(Self::TOKEN_URL);

        let response = ureq::post(token_uri).send_form([
            ("client_id", self.user.client_id.as_str()),
            ("client_secret", self.user.client_secret.as_str()),
            ("refresh_token", self.user.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ]);

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code @ (400 | 401 | 403))) => {
                let reason = format!("token refresh rejected (HTTP {})", code);
                return Err(AuthError::new(reason).into());
            }
            Err(e) => return Err(anyhow::Error::new(e).context("Failed to refresh access token")),
        };

        let token: TokenResponse = response
            .into_body()
            .read_json()
            .context("Failed to parse refresh token response")?;

        log::debug!("Refreshed Gmail access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: token.expires_in.map(|d| Utc::now().timestamp() + d),
        })
    }
}

impl TokenProvider for GmailAuth {
    /// Get a valid access token, refreshing as needed
    fn access_token(&self) -> Result<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| anyhow::anyhow!("Token cache lock poisoned"))?;

        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.access_token.clone());
        }

        let token = self.refresh()?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}
