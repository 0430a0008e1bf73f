use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// An [`HttpClient`] wrapper that sends an OAuth access token as
/// `Authorization: Bearer <token>` on every request.
///
/// The header is validated once at construction so requests cannot fail on it.
pub struct Bearer<C> {
    inner: C,
    header: HeaderValue,
}

impl<C> Bearer<C> {
    pub fn new(inner: C, access_token: &str) -> Result<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .context("access token is not a valid header value")?;
        header.set_sensitive(true);
        Ok(Self { inner, header })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Bearer<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(AUTHORIZATION, self.header.clone());
        self.inner.execute(req).await
    }
}
