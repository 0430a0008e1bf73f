use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use peer_grader::fetch::auth::Bearer;
use peer_grader::fetch::{BasicClient, send_json};
use peer_grader::services::forms_api::{BatchUpdateRequest, Form, FormsApi, NewForm};

use super::StoredCredentials;

pub const DEFAULT_BASE_URL: &str = "https://forms.googleapis.com";

/// Forms v1 client holding one access token for its whole lifetime.
pub struct GoogleFormsClient {
    base_url: String,
    http: Bearer<BasicClient>,
}

impl GoogleFormsClient {
    /// Acquires an access token from `credentials` and builds the client.
    pub async fn connect(credentials: &StoredCredentials, base_url: &str) -> Result<Self> {
        let access_token = credentials.access_token().await?;
        Self::with_token(&access_token, base_url)
    }

    pub fn with_token(access_token: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Bearer::new(BasicClient::new()?, access_token)?,
        })
    }

    fn forms_url(&self) -> String {
        format!("{}/v1/forms", self.base_url)
    }

    fn form_url(&self, form_id: &str) -> String {
        format!("{}/v1/forms/{}", self.base_url, form_id)
    }
}

#[async_trait]
impl FormsApi for GoogleFormsClient {
    async fn create_form(&self, form: &NewForm) -> Result<Form> {
        let created: Form = send_json(&self.http, Method::POST, &self.forms_url(), Some(form)).await?;
        debug!(form_id = %created.form_id, "Form created");
        Ok(created)
    }

    async fn batch_update(&self, form_id: &str, update: &BatchUpdateRequest) -> Result<()> {
        let url = format!("{}:batchUpdate", self.form_url(form_id));
        let _: serde_json::Value = send_json(&self.http, Method::POST, &url, Some(update)).await?;
        debug!(form_id, requests = update.requests.len(), "Form updated");
        Ok(())
    }

    async fn get_form(&self, form_id: &str) -> Result<Form> {
        send_json::<_, (), _>(&self.http, Method::GET, &self.form_url(form_id), None).await
    }
}
