//! Scripted in-memory backend for controller tests.
//!
//! Responses are queued per endpoint as JSON envelopes (or errors) and
//! decoded into the typed result the caller expects. Every call is
//! recorded, so tests can assert that nothing reached the network.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::types::{ApiResponse, FilePayload, HealthStatus, SendRequest};
use super::MailApi;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AddEmails,
    Upload,
    UploadAttachment,
    AttachmentInfo,
    DeleteAttachment,
    Send,
    Count,
    Clear,
    Health,
}

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub body: Value,
    pub timeout: Option<Duration>,
}

#[derive(Default)]
pub struct FakeApi {
    script: Mutex<HashMap<Endpoint, VecDeque<ApiResult<Value>>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next answer for `endpoint`.
    pub fn respond(&self, endpoint: Endpoint, response: ApiResult<Value>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a `{success: true}` envelope.
    pub fn ok(&self, endpoint: Endpoint, message: &str, data: Value) -> &Self {
        self.respond(endpoint, Ok(json!({ "success": true, "message": message, "data": data })))
    }

    /// Queue a `{success: false}` envelope.
    pub fn reject(&self, endpoint: Endpoint, message: &str) -> &Self {
        self.respond(endpoint, Ok(json!({ "success": false, "message": message })))
    }

    /// Queue a transport failure.
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) -> &Self {
        self.respond(endpoint, Err(error))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.endpoint == endpoint).collect()
    }

    fn answer<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Value,
        timeout: Option<Duration>,
    ) -> ApiResult<T> {
        self.calls.lock().unwrap().push(Call { endpoint, body, timeout });

        let next = self
            .script
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(ApiError::Unreachable(format!("{:?} not scripted", endpoint))));

        next.and_then(|value| {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}

fn file_body(file: &FilePayload) -> Value {
    json!({ "file": file.name, "size": file.size() })
}

#[async_trait]
impl MailApi for FakeApi {
    async fn add_emails(
        &self,
        emails: &[String],
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>> {
        self.answer(Endpoint::AddEmails, json!(emails), Some(timeout))
    }

    async fn upload_recipients(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<usize>> {
        self.answer(Endpoint::Upload, file_body(file), Some(timeout))
    }

    async fn upload_attachment(
        &self,
        file: &FilePayload,
        timeout: Duration,
    ) -> ApiResult<ApiResponse<String>> {
        self.answer(Endpoint::UploadAttachment, file_body(file), Some(timeout))
    }

    async fn attachment_info(&self) -> ApiResult<ApiResponse<String>> {
        self.answer(Endpoint::AttachmentInfo, Value::Null, None)
    }

    async fn delete_attachment(&self) -> ApiResult<()> {
        self.answer(Endpoint::DeleteAttachment, Value::Null, None)
    }

    async fn send(&self, request: &SendRequest) -> ApiResult<ApiResponse<Value>> {
        let body = serde_json::to_value(request).unwrap();
        self.answer(Endpoint::Send, body, None)
    }

    async fn recipient_count(&self) -> ApiResult<ApiResponse<usize>> {
        self.answer(Endpoint::Count, Value::Null, None)
    }

    async fn clear(&self) -> ApiResult<ApiResponse<Value>> {
        self.answer(Endpoint::Clear, Value::Null, None)
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.answer(Endpoint::Health, Value::Null, None)
    }
}
