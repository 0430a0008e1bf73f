//! Trait and payload types for talking to an online forms service.
//!
//! The payloads follow the Google Forms v1 REST resources (`forms.create`,
//! `forms.batchUpdate`, `forms.get`), trimmed to the fields this tool sets
//! or reads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Form metadata. Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of a `forms.create` call. Only the info block may be set at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewForm {
    pub info: FormInfo,
}

/// Body of a `forms.batchUpdate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub include_form_in_response: bool,
    pub requests: Vec<UpdateRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateRequest {
    UpdateFormInfo(UpdateFormInfo),
    CreateItem(CreateItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInfo {
    pub info: FormInfo,
    pub update_mask: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateItem {
    pub item: Item,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    pub description: String,
    pub question_item: QuestionItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionItem {
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub required: bool,
    pub choice_question: ChoiceQuestion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceQuestion {
    #[serde(rename = "type")]
    pub kind: ChoiceType,
    pub options: Vec<ChoiceOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChoiceType {
    Radio,
    Checkbox,
    DropDown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub index: u32,
}

/// The subset of a form resource returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_id: String,
    #[serde(default)]
    pub responder_uri: Option<String>,
}

/// Abstraction over a forms provider.
#[async_trait::async_trait]
pub trait FormsApi: Send + Sync {
    /// Creates an empty form with the given title information.
    async fn create_form(&self, form: &NewForm) -> Result<Form>;

    /// Applies a batch of edits to an existing form.
    async fn batch_update(&self, form_id: &str, update: &BatchUpdateRequest) -> Result<()>;

    /// Fetches the current state of a form.
    async fn get_form(&self, form_id: &str) -> Result<Form>;
}
