//! Messaging client contract and the Cloud API implementation.

use std::time::Duration;

use bytes::Bytes;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use courier_shared::PhoneNumber;
use courier_shared::config::MessagingConfig;

use super::error::MessagingError;
use super::types::{MediaRef, MessageHandle, ProviderMedia};
use crate::media::MediaKind;

/// Contract for the messaging provider's send and media endpoints.
///
/// Template parameter counts are not validated locally; a mismatch with the
/// template's declared placeholders surfaces as a provider API error.
pub trait MessagingClient: Send + Sync {
    /// Send a free-form text message.
    fn send_text(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> impl std::future::Future<Output = Result<MessageHandle, MessagingError>> + Send;

    /// Send an approved template message.
    fn send_template(
        &self,
        to: &PhoneNumber,
        template_name: &str,
        body_params: &[String],
        button_params: &[String],
        media: Option<&MediaRef>,
    ) -> impl std::future::Future<Output = Result<MessageHandle, MessagingError>> + Send;

    /// Upload media to the provider, returning its opaque id.
    fn upload_media(
        &self,
        kind: MediaKind,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> impl std::future::Future<Output = Result<String, MessagingError>> + Send;

    /// Fetch metadata for provider-hosted media.
    fn get_media(
        &self,
        media_id: &str,
    ) -> impl std::future::Future<Output = Result<ProviderMedia, MessagingError>> + Send;

    /// Delete provider-hosted media.
    fn delete_media(
        &self,
        media_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, MessagingError>> + Send;
}

const MESSAGING_PRODUCT: &str = "whatsapp";

/// Messaging client for the provider's Graph-style Cloud API.
pub struct CloudApiClient {
    http: reqwest::Client,
    api_base_url: String,
    access_token: String,
    phone_number_id: String,
    template_language: String,
}

impl CloudApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed;
    /// this fails at startup, never per-request.
    pub fn new(config: &MessagingConfig) -> Result<Self, MessagingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| MessagingError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            phone_number_id: config.phone_number_id.clone(),
            template_language: config.template_language.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base_url, self.phone_number_id)
    }

    fn media_upload_url(&self) -> String {
        format!("{}/{}/media", self.api_base_url, self.phone_number_id)
    }

    fn media_url(&self, media_id: &str) -> String {
        format!("{}/{media_id}", self.api_base_url)
    }

    async fn post_message(&self, body: &SendMessageBody) -> Result<MessageHandle, MessagingError> {
        let response = self
            .http
            .post(self.messages_url())
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))?;

        parsed
            .messages
            .into_iter()
            .next()
            .map(|m| MessageHandle(m.id))
            .ok_or_else(|| MessagingError::InvalidResponse("empty messages array".to_string()))
    }
}

impl MessagingClient for CloudApiClient {
    async fn send_text(
        &self,
        to: &PhoneNumber,
        body: &str,
    ) -> Result<MessageHandle, MessagingError> {
        debug!(to = %to, "sending text message");
        let payload = SendMessageBody {
            messaging_product: MESSAGING_PRODUCT,
            to: to.as_str().to_string(),
            kind: "text",
            text: Some(TextBody {
                body: body.to_string(),
            }),
            template: None,
        };
        self.post_message(&payload).await
    }

    async fn send_template(
        &self,
        to: &PhoneNumber,
        template_name: &str,
        body_params: &[String],
        button_params: &[String],
        media: Option<&MediaRef>,
    ) -> Result<MessageHandle, MessagingError> {
        debug!(to = %to, template = template_name, "sending template message");
        let payload = SendMessageBody {
            messaging_product: MESSAGING_PRODUCT,
            to: to.as_str().to_string(),
            kind: "template",
            text: None,
            template: Some(TemplateBody {
                name: template_name.to_string(),
                language: LanguageRef {
                    code: self.template_language.clone(),
                },
                components: template_components(body_params, button_params, media),
            }),
        };
        self.post_message(&payload).await
    }

    async fn upload_media(
        &self,
        kind: MediaKind,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> Result<String, MessagingError> {
        debug!(kind = kind.as_str(), file_name, "uploading media to provider");
        let file = multipart::Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| MessagingError::Configuration(format!("invalid MIME type: {e}")))?;
        let form = multipart::Form::new()
            .text("messaging_product", MESSAGING_PRODUCT)
            .text("type", mime_type.to_string())
            .part("file", file);

        let response = self
            .http
            .post(self.media_upload_url())
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: UploadMediaResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))?;
        Ok(parsed.id)
    }

    async fn get_media(&self, media_id: &str) -> Result<ProviderMedia, MessagingError> {
        let response = self
            .http
            .get(self.media_url(media_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))
    }

    async fn delete_media(&self, media_id: &str) -> Result<bool, MessagingError> {
        let response = self
            .http
            .delete(self.media_url(media_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: DeleteMediaResponse = response
            .json()
            .await
            .map_err(|e| MessagingError::InvalidResponse(e.to_string()))?;
        Ok(parsed.success)
    }
}

/// Map a non-success response to [`MessagingError::Api`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MessagingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(MessagingError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Build the components array for a template send.
///
/// Empty parameter lists produce no component; a media reference becomes a
/// document header carrying the link and filename.
fn template_components(
    body_params: &[String],
    button_params: &[String],
    media: Option<&MediaRef>,
) -> Vec<Component> {
    let mut components = Vec::new();

    if let Some(media) = media {
        let mut document = json!({ "link": media.url });
        if let Some(filename) = &media.filename {
            document["filename"] = json!(filename);
        }
        components.push(Component {
            kind: "header",
            sub_type: None,
            index: None,
            parameters: vec![json!({ "type": "document", "document": document })],
        });
    }

    if !body_params.is_empty() {
        components.push(Component {
            kind: "body",
            sub_type: None,
            index: None,
            parameters: body_params
                .iter()
                .map(|p| json!({ "type": "text", "text": p }))
                .collect(),
        });
    }

    for (index, payload) in button_params.iter().enumerate() {
        components.push(Component {
            kind: "button",
            sub_type: Some("quick_reply"),
            index: Some(index.to_string()),
            parameters: vec![json!({ "type": "payload", "payload": payload })],
        });
    }

    components
}

#[derive(Debug, Serialize)]
struct SendMessageBody {
    messaging_product: &'static str,
    to: String,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<TemplateBody>,
}

#[derive(Debug, Serialize)]
struct TextBody {
    body: String,
}

#[derive(Debug, Serialize)]
struct TemplateBody {
    name: String,
    language: LanguageRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<Component>,
}

#[derive(Debug, Serialize)]
struct LanguageRef {
    code: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<String>,
    parameters: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UploadMediaResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteMediaResponse {
    success: bool,
}
