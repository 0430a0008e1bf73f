//! Google Forms provider.
//!
//! [`StoredCredentials`] reads the OAuth token file left by a previous
//! authorization and turns it into an access token once per run.
//! [`GoogleFormsClient`] implements [`peer_grader::services::forms_api::FormsApi`]
//! over the Forms v1 REST API with that token.

mod client;
mod credentials;

pub use client::{DEFAULT_BASE_URL, GoogleFormsClient};
pub use credentials::StoredCredentials;
