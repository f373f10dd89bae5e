//! Google OAuth credential handling for document export.
//!
//! Credentials are cached at `~/.contentforge/token.json` in the same shape
//! Google's installed-app flow writes. This module never runs an interactive
//! consent flow itself: a valid cached token is used as-is, an expired token
//! with a refresh token gets one refresh-grant attempt, and anything else is
//! an error telling the user to authenticate.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use contentforge_shared::{ContentForgeError, Result, config_dir};

/// Cached token file name under the config directory.
const TOKEN_FILE_NAME: &str = "token.json";

/// Google OAuth token endpoint.
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Cached OAuth credentials, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// Short-lived bearer token for API requests.
    pub access_token: String,
    /// Long-lived token used to mint new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// OAuth client identifier, needed for the refresh grant.
    #[serde(default)]
    pub client_id: Option<String>,
    /// OAuth client secret, needed for the refresh grant.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Access token expiry. Missing expiry is treated as expired.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Whether the access token is still usable, with a small safety margin.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry > now + Duration::seconds(30),
            None => false,
        }
    }

    fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Path to the cached token file (`~/.contentforge/token.json`).
pub fn token_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(TOKEN_FILE_NAME))
}

/// Whether a cached token file exists at the default location.
pub fn is_authenticated() -> bool {
    token_file_path().map(|p| p.exists()).unwrap_or(false)
}

/// Remove the cached token file. Succeeds if no file exists.
pub fn logout() -> Result<()> {
    let path = token_file_path()?;
    if path.exists() {
        std::fs::remove_file(&path).map_err(|e| ContentForgeError::io(&path, e))?;
        info!(?path, "removed cached credentials");
    }
    Ok(())
}

/// Read the cached token from `path`.
pub fn load_stored_token(path: &Path) -> Result<StoredToken> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentForgeError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        ContentForgeError::Export(format!("invalid token file {}: {e}", path.display()))
    })
}

/// Persist the token to `path`, creating parent directories as needed.
pub fn save_stored_token(path: &Path, token: &StoredToken) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ContentForgeError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(token)
        .map_err(|e| ContentForgeError::Export(format!("failed to encode token: {e}")))?;
    std::fs::write(path, content).map_err(|e| ContentForgeError::io(path, e))
}

/// Load usable credentials from the default token file, refreshing if needed.
pub async fn load_credentials(client: &Client) -> Result<StoredToken> {
    let path = token_file_path()?;
    load_credentials_from(client, &path, DEFAULT_TOKEN_URI).await
}

/// Load usable credentials from `path`, refreshing via `token_uri` if the
/// access token has expired.
pub async fn load_credentials_from(
    client: &Client,
    path: &Path,
    token_uri: &str,
) -> Result<StoredToken> {
    if !path.exists() {
        return Err(ContentForgeError::Export(format!(
            "not authenticated with Google. Place an OAuth token file at {}",
            path.display()
        )));
    }

    let token = load_stored_token(path)?;
    let now = Utc::now();

    if token.is_valid(now) {
        debug!("cached access token still valid");
        return Ok(token);
    }

    if !token.can_refresh() {
        return Err(ContentForgeError::Export(
            "cached Google credentials have expired and cannot be refreshed; re-authenticate"
                .into(),
        ));
    }

    let refreshed = refresh_token(client, &token, token_uri).await?;
    save_stored_token(path, &refreshed)?;
    info!("refreshed Google access token");
    Ok(refreshed)
}

/// Exchange the refresh token for a new access token. One attempt, no retry.
async fn refresh_token(client: &Client, token: &StoredToken, token_uri: &str) -> Result<StoredToken> {
    // can_refresh was checked by the caller; fall back to empty strings
    // rather than panicking if the invariant is ever violated.
    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", token.refresh_token.as_deref().unwrap_or("")),
        ("client_id", token.client_id.as_deref().unwrap_or("")),
        ("client_secret", token.client_secret.as_deref().unwrap_or("")),
    ];

    let response = client
        .post(token_uri)
        .form(&params)
        .send()
        .await
        .map_err(|e| ContentForgeError::Export(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ContentForgeError::Export(format!(
            "token refresh failed with HTTP {status}; re-authenticate"
        )));
    }

    let parsed: RefreshResponse = response
        .json()
        .await
        .map_err(|e| ContentForgeError::Export(format!("invalid token refresh response: {e}")))?;

    let expiry = parsed
        .expires_in
        .map(|secs| Utc::now() + Duration::seconds(secs));

    Ok(StoredToken {
        access_token: parsed.access_token,
        refresh_token: token.refresh_token.clone(),
        client_id: token.client_id.clone(),
        client_secret: token.client_secret.clone(),
        expiry,
    })
}
