//! HTTP client for the classification service.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{ClassificationRequest, Endpoint, FileUpload, RequestDraft, TextBody};
use crate::response::{ClassificationFields, ErrorBody, FileClassification, RawResponse};

/// Name of the multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Client for the classification service.
///
/// Sends exactly one request per call. There are no retries and no timeout
/// beyond the transport's own defaults.
#[derive(Debug, Clone)]
pub struct ClassificationClient {
    config: ClientConfig,
    http_client: Client,
}

impl ClassificationClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(&config.user_agent);
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder.build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Classifies a request, choosing the endpoint from the request kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Service`] for non-success statuses,
    /// [`Error::Body`] or [`Error::Decode`] for unreadable success bodies and
    /// [`Error::Transport`] when no status was received.
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<RawResponse> {
        match request {
            ClassificationRequest::Text { content, locale } => self
                .classify_text(content, locale.as_deref())
                .await
                .map(RawResponse::Text),
            ClassificationRequest::File { file, .. } => {
                self.classify_file(file).await.map(RawResponse::File)
            }
        }
    }

    /// Validates a draft and classifies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] without any network call when the draft
    /// has no input or both inputs; otherwise see
    /// [`ClassificationClient::classify`].
    pub async fn classify_draft(&self, draft: RequestDraft) -> Result<RawResponse> {
        let request = draft.into_request()?;
        self.classify(&request).await
    }

    /// Classifies pasted email text.
    ///
    /// # Errors
    ///
    /// See [`ClassificationClient::classify`].
    pub async fn classify_text(
        &self,
        content: &str,
        locale: Option<&str>,
    ) -> Result<ClassificationFields> {
        let url = self.config.endpoint_url(Endpoint::Text)?;
        debug!(%url, chars = content.chars().count(), ?locale, "classifying email text");

        let body = TextBody {
            content,
            language: locale,
        };
        let request = self.http_client.post(url).json(&body);

        let bytes = self.send(Endpoint::Text, request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Classifies an uploaded email file.
    ///
    /// The body is multipart with the single field `file`.
    ///
    /// # Errors
    ///
    /// See [`ClassificationClient::classify`].
    pub async fn classify_file(&self, file: &FileUpload) -> Result<FileClassification> {
        let url = self.config.endpoint_url(Endpoint::File)?;
        debug!(%url, filename = %file.name, size = file.size(), "classifying email file");

        let part = Part::stream_with_length(Body::from(file.bytes.clone()), file.size())
            .file_name(file.name.clone());
        let form = Form::new().part(FILE_FIELD, part);
        let request = self.http_client.post(url).multipart(form);

        let bytes = self.send(Endpoint::File, request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a request and returns the body of a success response.
    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> Result<Bytes> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // Error bodies are best effort; anything unreadable becomes the fallback.
            let body = response.bytes().await.unwrap_or_default();
            let message = ErrorBody::detail_from(&body)
                .unwrap_or_else(|| endpoint.fallback_message().to_string());
            warn!(status = status.as_u16(), %message, "classification service returned an error");
            return Err(Error::service(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(Error::Body)?;
        debug!(status = status.as_u16(), bytes = body.len(), "classification response received");
        Ok(body)
    }
}
