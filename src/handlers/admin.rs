use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::ApiError;
use crate::models::event::EventUpload;
use crate::service::booking_api::BookingApi;
use crate::service::prompt::Prompter;
use crate::views::tables::{BookingRow, BookingsTable, EventRow, EventsTable, Table};

pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Raw create-event form input, as typed by the admin.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub capacity: String,
    pub image: Option<PathBuf>,
}

impl EventForm {
    pub fn validate(&self) -> Result<EventUpload, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        let date = self.date.trim();
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(format!("Date must be YYYY-MM-DD, got {:?}", date));
        }
        let capacity = self
            .capacity
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|capacity| *capacity >= 0)
            .ok_or_else(|| format!("Capacity must be a whole number, got {:?}", self.capacity))?;
        Ok(EventUpload {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            date: date.to_string(),
            capacity,
            image: self.image.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Declined,
    Done,
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AdminPage {
    pub events: EventsTable,
    pub bookings: BookingsTable,
    pub create_message: Option<FormMessage>,
    pub form: EventForm,
}

impl Default for AdminPage {
    fn default() -> Self {
        Self {
            events: Table::loading(),
            bookings: Table::loading(),
            create_message: None,
            form: EventForm::default(),
        }
    }
}

/// Drives the admin console: two tables, the create form and the row actions.
/// Every mutation is followed by a reload of the tables it affects.
pub struct AdminController {
    api: Arc<dyn BookingApi>,
    prompter: Arc<dyn Prompter>,
    page: AdminPage,
}

impl AdminController {
    pub fn new(api: Arc<dyn BookingApi>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            api,
            prompter,
            page: AdminPage::default(),
        }
    }

    pub fn page(&self) -> &AdminPage {
        &self.page
    }

    pub async fn start(&mut self) {
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        self.load_events().await;
        self.load_bookings().await;
    }

    pub async fn load_events(&mut self) {
        self.page.events = Table::loading();
        self.page.events = match self.api.list_events().await {
            Ok(events) if events.is_empty() => Table::Message("No events found".to_string()),
            Ok(events) => Table::Rows(events.iter().map(EventRow::from).collect()),
            Err(err) => {
                tracing::error!("failed to load events: {}", err);
                Table::Message(format!("Error loading events: {}", events_failure(&err)))
            }
        };
    }

    pub async fn load_bookings(&mut self) {
        self.page.bookings = Table::loading();
        self.page.bookings = match self.api.list_bookings().await {
            Ok(bookings) if bookings.is_empty() => {
                Table::Message("No bookings found".to_string())
            }
            Ok(bookings) => Table::Rows(bookings.iter().map(BookingRow::from).collect()),
            Err(err) if err.is_auth() => {
                let detail = err
                    .body_text()
                    .or_else(|| err.reason().map(str::to_string))
                    .unwrap_or_default();
                tracing::warn!("bookings restricted: {}", err);
                Table::Message(format!("Bookings not available: {}", detail))
            }
            Err(err) => {
                tracing::error!("failed to load bookings: {}", err);
                Table::Message(format!(
                    "Error loading bookings: {}",
                    err.describe("Failed to fetch bookings")
                ))
            }
        };
    }

    pub fn set_form(&mut self, form: EventForm) {
        self.page.form = form;
    }

    /// Submits the current form. On success the form is reset and both tables reload.
    pub async fn submit_form(&mut self) -> bool {
        self.page.create_message = None;
        let upload = match self.page.form.validate() {
            Ok(upload) => upload,
            Err(message) => {
                self.page.create_message = Some(FormMessage::Error(format!("Error: {}", message)));
                return false;
            }
        };
        if let Some(image) = &upload.image {
            match tokio::fs::metadata(image).await {
                Ok(meta) if meta.len() > MAX_IMAGE_BYTES => {
                    self.page.create_message = Some(FormMessage::Error(
                        "Error: File too large (max 20 MB)".to_string(),
                    ));
                    return false;
                }
                Ok(_) => {}
                Err(err) => {
                    self.page.create_message = Some(FormMessage::Error(format!(
                        "Error: cannot read {}: {}",
                        image.display(),
                        err
                    )));
                    return false;
                }
            }
        }

        match self.api.create_event(&upload).await {
            Ok(created) => {
                tracing::info!("created event {}", created.id);
                self.page.create_message = Some(FormMessage::Success(format!(
                    "Created event: {} (id: {})",
                    created.title.as_deref().unwrap_or(""),
                    created.id
                )));
                self.page.form = EventForm::default();
                self.refresh().await;
                true
            }
            Err(err) => {
                tracing::error!("failed to create event: {}", err);
                self.page.create_message = Some(FormMessage::Error(format!(
                    "Error: {}",
                    err.describe("Failed to create event")
                )));
                false
            }
        }
    }

    pub async fn create_event(&mut self, form: EventForm) -> bool {
        self.set_form(form);
        self.submit_form().await
    }

    pub async fn delete_event(&mut self, event_id: i64) -> ActionOutcome {
        let Some(row) = self.page.events.rows().iter().find(|row| row.id == event_id) else {
            return ActionOutcome::NotFound;
        };
        let question = format!(
            "Delete event \"{}\"? This will remove related bookings.",
            row.title
        );
        if !self.prompter.confirm(&question).await {
            return ActionOutcome::Declined;
        }
        match self.api.delete_event(event_id).await {
            Ok(()) => {
                self.refresh().await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = format!("Delete failed: {}", err.describe("Failed to delete"));
                self.prompter.notify(&message).await;
                ActionOutcome::Failed(message)
            }
        }
    }

    pub async fn cancel_booking(&mut self, booking_id: i64) -> ActionOutcome {
        if !self.page.bookings.rows().iter().any(|row| row.id == booking_id) {
            return ActionOutcome::NotFound;
        }
        if !self.prompter.confirm("Cancel this booking?").await {
            return ActionOutcome::Declined;
        }
        match self.api.cancel_booking(booking_id).await {
            Ok(()) => {
                self.load_bookings().await;
                ActionOutcome::Done
            }
            Err(err) => {
                let message = format!(
                    "Cancel failed: {}",
                    err.describe("Failed to cancel booking")
                );
                self.prompter.notify(&message).await;
                ActionOutcome::Failed(message)
            }
        }
    }

    pub async fn ping(&self) -> Result<String, ApiError> {
        self.api.admin_ping().await
    }
}

fn events_failure(err: &ApiError) -> String {
    match err.status() {
        Some(status) => format!("Failed to fetch events: {}", status),
        None => err.to_string(),
    }
}
