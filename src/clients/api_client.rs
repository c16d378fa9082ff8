use std::path::Path;
use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::booking::Booking;
use crate::models::event::{Event, EventUpload};
use crate::service::token_store::TokenStore;

pub const DEFAULT_API_BASE: &str = "http://localhost:8083/api";

#[derive(Debug)]
enum Payload {
    Json(Value),
    Text(String),
}

/// HTTP access to the booking backend. Every request carries
/// `Accept: application/json` and, when a session token is stored, a bearer
/// `Authorization` header.
pub struct ApiClient {
    http: Client,
    base: String,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    pub fn new(base: &str, tokens: Arc<TokenStore>) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        match self.tokens.get_token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Payload, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let text = response.text().await?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            tracing::debug!("request failed with {}: {}", status, text);
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ApiError::Auth {
                    status: status.as_u16(),
                    reason,
                    body: text,
                });
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                reason,
                body: text,
            });
        }

        if is_json && !text.trim().is_empty() {
            Ok(Payload::Json(serde_json::from_str(&text)?))
        } else {
            Ok(Payload::Text(text))
        }
    }

    pub async fn get_events(&self) -> Result<Vec<Event>, ApiError> {
        let payload = self.send(self.request(Method::GET, "/events")).await?;
        into_list(payload)
    }

    pub async fn create_event(&self, upload: &EventUpload) -> Result<Event, ApiError> {
        let mut form = Form::new()
            .text("title", upload.title.clone())
            .text("description", upload.description.clone())
            .text("date", upload.date.clone())
            .text("capacity", upload.capacity.to_string());
        if let Some(image) = &upload.image {
            form = form.part("image", image_part(image).await?);
        }
        let payload = self
            .send(self.request(Method::POST, "/events").multipart(form))
            .await?;
        into_value(payload)
    }

    pub async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/events/{}", event_id)))
            .await?;
        Ok(())
    }

    pub async fn get_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let payload = self.send(self.request(Method::GET, "/bookings")).await?;
        into_list(payload)
    }

    pub async fn book_event(&self, event_id: i64) -> Result<Option<Booking>, ApiError> {
        let payload = self
            .send(self.request(Method::POST, &format!("/bookings/book/{}", event_id)))
            .await?;
        // The booking itself is informational; a body we cannot read is not a failure.
        Ok(match payload {
            Payload::Json(value) => serde_json::from_value(value).ok(),
            Payload::Text(_) => None,
        })
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/bookings/{}", booking_id)))
            .await?;
        Ok(())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let payload = self
            .send(self.request(Method::POST, "/auth/login").json(request))
            .await?;
        into_value(payload)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let payload = self
            .send(self.request(Method::POST, "/auth/register").json(request))
            .await?;
        match payload {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Text(text) => Ok(AuthResponse {
                token: None,
                message: Some(text).filter(|text| !text.trim().is_empty()),
            }),
        }
    }

    pub async fn admin_ping(&self) -> Result<String, ApiError> {
        let payload = self.send(self.request(Method::GET, "/admin/ping")).await?;
        Ok(match payload {
            Payload::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            Payload::Text(text) => text,
        })
    }
}

/// Bodies that are not a JSON array, whatever their content type, are treated
/// as an empty list.
fn into_list<T: DeserializeOwned>(payload: Payload) -> Result<Vec<T>, ApiError> {
    let value = match payload {
        Payload::Json(value) => value,
        Payload::Text(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => return Ok(Vec::new()),
        },
    };
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(Vec::new()),
    }
}

fn into_value<T: DeserializeOwned>(payload: Payload) -> Result<T, ApiError> {
    match payload {
        Payload::Json(value) => Ok(serde_json::from_value(value)?),
        Payload::Text(text) => Ok(serde_json::from_str(&text)?),
    }
}

async fn image_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))?;
    Ok(part)
}

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
