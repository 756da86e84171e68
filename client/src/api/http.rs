//! `reqwest` implementation of [`MailApi`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::types::{ApiResponse, FilePayload, HealthStatus, SendRequest};
use super::MailApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// HTTP client for the bulk mail backend.
#[derive(Debug, Clone)]
pub struct HttpMailApi {
    client: Client,
    config: ClientConfig,
}

impl HttpMailApi {
    pub fn new(config: ClientConfig) -> Self {
        Self { client: Client::new(), config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Multipart form with the file under the `file` field.
    fn file_form(file: &FilePayload) -> Form {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        Form::new().part("file", part)
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<T>> {
        let url = self.config.endpoint(path);
        log::debug!("POST {} ({}, {} bytes)", url, file.name, file.size());

        let response = self
            .client
            .post(&url)
            .multipart(Self::file_form(file))
            .timeout(timeout)
            .send()
            .await?;

        read_envelope(response).await
    }
}

/// Decode the JSON envelope.
///
/// A non-OK status whose body is still an envelope becomes a failed
/// envelope so the server's message reaches the operator; anything else
/// becomes [`ApiError::Status`].
async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<ApiResponse<T>> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
    }

    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(envelope) => Ok(envelope.into_failure()),
        Err(_) => Err(ApiError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }),
    }
}

fn status_error(response: &Response) -> ApiError {
    let status = response.status();
    ApiError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

#[async_trait]
impl MailApi for HttpMailApi {
    async fn add_emails(
        &self,
        emails: &[String],
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>> {
        let url = self.config.endpoint("/add-emails");
        log::debug!("POST {} ({} addresses)", url, emails.len());

        let response = self
            .client
            .post(&url)
            .json(emails)
            .timeout(timeout)
            .send()
            .await?;

        read_envelope(response).await
    }

    async fn upload_recipients(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>> {
        self.post_file("/upload", file, timeout).await
    }

    async fn upload_attachment(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<String>> {
        self.post_file("/upload-attachment", file, timeout).await
    }

    async fn attachment_info(&self) -> ApiResult<ApiResponse<String>> {
        let response = self
            .client
            .get(self.config.endpoint("/attachment-info"))
            .send()
            .await?;

        read_envelope(response).await
    }

    async fn delete_attachment(&self) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.config.endpoint("/attachment"))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(&response))
        }
    }

    async fn send(&self, request: &SendRequest) -> ApiResult<ApiResponse<Value>> {
        let url = self.config.endpoint("/send");
        log::debug!("POST {} (attachment: {})", url, request.has_attachment);

        // No client-side timeout: sending waits for the backend.
        let response = self.client.post(&url).json(request).send().await?;

        read_envelope(response).await
    }

    async fn recipient_count(&self) -> ApiResult<ApiResponse<usize>> {
        let response = self.client.get(self.config.endpoint("/count")).send().await?;
        read_envelope(response).await
    }

    async fn clear(&self) -> ApiResult<ApiResponse<Value>> {
        let response = self.client.delete(self.config.endpoint("/clear")).send().await?;
        read_envelope(response).await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        let response = self
            .client
            .get(self.config.root_endpoint("/health"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(&response));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
