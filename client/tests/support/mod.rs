//! In-process stand-in for the bulk mail backend, built on axum.
//!
//! It follows the REST contract closely enough to exercise the real HTTP
//! client: JSON envelopes, multipart `file` fields, 400 envelopes for bad
//! input, and plain status codes for broken servers.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the stub backend currently holds.
#[derive(Debug, Default)]
pub struct StubState {
    pub emails: Vec<String>,
    pub attachment: Option<String>,
    pub sent: Vec<Value>,
}

pub type Shared = Arc<Mutex<StubState>>;

type Reply = (StatusCode, Json<Value>);

fn ok(message: impl Into<String>, data: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "message": message.into(), "data": data })))
}

fn bad_request(message: &str) -> Reply {
    (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "message": message })))
}

/// Read the multipart `file` field as (file name, bytes).
async fn read_file(mut multipart: Multipart) -> Option<(String, Vec<u8>)> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("unknown").to_string();
            let bytes = field.bytes().await.ok()?.to_vec();
            return Some((name, bytes));
        }
    }
    None
}

async fn add_emails(State(state): State<Shared>, Json(emails): Json<Vec<String>>) -> Reply {
    let mut state = state.lock().unwrap();
    let mut added = 0;
    for email in emails {
        let email = email.trim().to_string();
        if email.contains('@') && !state.emails.contains(&email) {
            state.emails.push(email);
            added += 1;
        }
    }
    if added == 0 {
        return bad_request("No valid email addresses provided");
    }
    let total = state.emails.len();
    ok(
        format!("Successfully added {} email address(es). Total: {}", added, total),
        json!(total),
    )
}

async fn upload(State(state): State<Shared>, multipart: Multipart) -> Reply {
    let Some((_, bytes)) = read_file(multipart).await else {
        return bad_request("Please select a file to upload");
    };

    let text = String::from_utf8_lossy(&bytes);
    let emails: Vec<String> = text
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| l.contains('@'))
        .collect();
    if emails.is_empty() {
        return bad_request("No valid email addresses found in the file");
    }

    let mut state = state.lock().unwrap();
    state.emails = emails;
    let total = state.emails.len();
    ok(
        format!("File uploaded successfully. Found {} email addresses", total),
        json!(total),
    )
}

async fn upload_attachment(State(state): State<Shared>, multipart: Multipart) -> Reply {
    let Some((name, _)) = read_file(multipart).await else {
        return bad_request("Please select a file to upload");
    };
    state.lock().unwrap().attachment = Some(name.clone());
    ok(format!("Attachment uploaded successfully: {}", name), json!(name))
}

async fn attachment_info(State(state): State<Shared>) -> Reply {
    match state.lock().unwrap().attachment.clone() {
        Some(name) => ok("Attachment available", json!(name)),
        None => (
            StatusCode::OK,
            Json(json!({ "success": false, "message": "No attachment uploaded", "data": null })),
        ),
    }
}

async fn remove_attachment(State(state): State<Shared>) -> Reply {
    state.lock().unwrap().attachment = None;
    ok("Attachment removed successfully", Value::Null)
}

async fn send(State(state): State<Shared>, Json(request): Json<Value>) -> Reply {
    let mut state = state.lock().unwrap();
    if state.emails.is_empty() {
        return bad_request("Please upload a file with email addresses first");
    }
    let mut message = format!(
        "Emails sending started successfully to {} recipients",
        state.emails.len()
    );
    if let Some(name) = &state.attachment {
        message.push_str(&format!(" with attachment: {}", name));
    }
    state.sent.push(request);
    ok(message, Value::Null)
}

async fn count(State(state): State<Shared>) -> Reply {
    let total = state.lock().unwrap().emails.len();
    ok("Email count retrieved successfully", json!(total))
}

async fn clear(State(state): State<Shared>) -> Reply {
    let mut state = state.lock().unwrap();
    state.emails.clear();
    state.attachment = None;
    ok("Email list and attachment cleared successfully", Value::Null)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "UP", "service": "Email Bulk Sender" }))
}

/// Router implementing the whole contract.
pub fn backend(state: Shared) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/email/add-emails", post(add_emails))
        .route("/email/upload", post(upload))
        .route("/email/upload-attachment", post(upload_attachment))
        .route("/email/attachment-info", get(attachment_info))
        .route("/email/attachment", delete(remove_attachment))
        .route("/email/send", post(send))
        .route("/email/count", get(count))
        .route("/email/clear", delete(clear))
        .with_state(state)
}

/// Router answering every request after `delay`.
pub fn slow(delay: Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        ok("too late", json!(1))
    })
}

/// Router answering every request with a bare 500.
pub fn broken() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() })
}

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nobody listens on.
pub async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
