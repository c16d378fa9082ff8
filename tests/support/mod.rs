#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{json, Value};

use eventBooking::errors::ApiError;
use eventBooking::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use eventBooking::models::booking::Booking;
use eventBooking::models::event::{Event, EventUpload};
use eventBooking::service::booking_api::BookingApi;
use eventBooking::service::prompt::Prompter;

pub fn events(raw: Value) -> Vec<Event> {
    serde_json::from_value(raw).unwrap()
}

pub fn bookings(raw: Value) -> Vec<Booking> {
    serde_json::from_value(raw).unwrap()
}

pub fn token_for(payload: Value) -> String {
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn http_error(status: u16, message: &str) -> ApiError {
    let body = json!({ "message": message }).to_string();
    match status {
        401 | 403 => ApiError::Auth {
            status,
            reason: "Forbidden".to_string(),
            body,
        },
        _ => ApiError::Status {
            status,
            reason: "Internal Server Error".to_string(),
            body,
        },
    }
}

/// In-memory backend. Mutations change the stored lists so reloads observe them;
/// every call is recorded by name.
#[derive(Default)]
pub struct FakeApi {
    pub events: Mutex<Vec<Event>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub events_failure: Mutex<Option<u16>>,
    pub bookings_failure: Mutex<Option<u16>>,
    pub mutation_failure: Mutex<Option<u16>>,
    pub register_failure: Mutex<Option<u16>>,
    pub login_token: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_data(events: Vec<Event>, bookings: Vec<Booking>) -> Self {
        Self {
            events: Mutex::new(events),
            bookings: Mutex::new(bookings),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation(&self) -> Result<(), ApiError> {
        match *self.mutation_failure.lock().unwrap() {
            Some(status) => Err(http_error(status, "mutation rejected")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.record("list_events".to_string());
        if let Some(status) = *self.events_failure.lock().unwrap() {
            return Err(http_error(status, "events down"));
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn create_event(&self, upload: &EventUpload) -> Result<Event, ApiError> {
        self.record(format!("create_event {}", upload.title));
        self.mutation()?;
        let mut events = self.events.lock().unwrap();
        let id = events.iter().map(|event| event.id).max().unwrap_or(0) + 1;
        let event = Event {
            id,
            title: Some(upload.title.clone()),
            description: Some(upload.description.clone()),
            date: Some(upload.date.clone()),
            capacity: Some(i64::from(upload.capacity)),
            image_path: None,
        };
        events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        self.record(format!("delete_event {}", event_id));
        self.mutation()?;
        self.events.lock().unwrap().retain(|event| event.id != event_id);
        self.bookings
            .lock()
            .unwrap()
            .retain(|booking| booking.event_ref() != Some(event_id));
        Ok(())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.record("list_bookings".to_string());
        if let Some(status) = *self.bookings_failure.lock().unwrap() {
            return Err(http_error(status, "bookings restricted"));
        }
        Ok(self.bookings.lock().unwrap().clone())
    }

    async fn book_event(&self, event_id: i64) -> Result<Option<Booking>, ApiError> {
        self.record(format!("book_event {}", event_id));
        self.mutation()?;
        let mut bookings = self.bookings.lock().unwrap();
        let id = bookings.iter().map(|booking| booking.id).max().unwrap_or(0) + 1;
        let booking: Booking =
            serde_json::from_value(json!({"id": id, "event": {"id": event_id}})).unwrap();
        bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn cancel_booking(&self, booking_id: i64) -> Result<(), ApiError> {
        self.record(format!("cancel_booking {}", booking_id));
        self.mutation()?;
        self.bookings
            .lock()
            .unwrap()
            .retain(|booking| booking.id != booking_id);
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("login {}", request.username));
        match self.login_token.lock().unwrap().clone() {
            Some(token) => Ok(AuthResponse {
                token: Some(token),
                message: None,
            }),
            None => Err(http_error(401, "Invalid credentials")),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("register {}", request.username));
        if let Some(status) = *self.register_failure.lock().unwrap() {
            return Err(http_error(status, "Username taken"));
        }
        Ok(AuthResponse {
            token: None,
            message: Some("Registered".to_string()),
        })
    }

    async fn admin_ping(&self) -> Result<String, ApiError> {
        self.record("admin_ping".to_string());
        Ok("admin ok".to_string())
    }
}

/// Answers confirmations from a script (declining once it runs out) and
/// records every question and notice.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: Mutex<VecDeque<bool>>,
    pub questions: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, message: &str) -> bool {
        self.questions.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }

    async fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}
