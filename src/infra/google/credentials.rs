use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// OAuth credentials persisted on disk, e.g. `token.json`.
///
/// Both the legacy `oauth2client` layout (`access_token`) and the
/// `google-auth` layout (`token`) are accepted:
/// ```json
/// {
///   "access_token": "ya29...",
///   "refresh_token": "1//0g...",
///   "client_id": "123.apps.googleusercontent.com",
///   "client_secret": "...",
///   "token_uri": "https://oauth2.googleapis.com/token"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCredentials {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl StoredCredentials {
    /// Loads the credential file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read credential store '{path}'"))?;
        let credentials: Self = serde_json::from_str(&content)
            .with_context(|| format!("credential store '{path}' is not valid JSON"))?;
        debug!(path, refreshable = credentials.refresh_grant().is_some(), "Credentials loaded");
        Ok(credentials)
    }

    /// Returns an access token, exchanging the refresh token when one is stored
    /// and falling back to the stored access token otherwise.
    pub async fn access_token(&self) -> Result<String> {
        if let Some((refresh_token, client_id, client_secret)) = self.refresh_grant() {
            let token = Self::exchange_token(&self.token_uri, refresh_token, client_id, client_secret).await?;
            info!("Access token refreshed");
            return Ok(token);
        }

        match &self.access_token {
            Some(token) if !token.is_empty() => Ok(token.clone()),
            _ => bail!("credential store has neither a refresh token nor an access token"),
        }
    }

    fn refresh_grant(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.refresh_token.as_deref()?,
            self.client_id.as_deref()?,
            self.client_secret.as_deref()?,
        ))
    }

    async fn exchange_token(
        token_uri: &str,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = client
            .post(token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send token request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token exchange failed with status {}: {}", status, body));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse token response: {}", e))?;

        Ok(token_response.access_token)
    }
}
