use std::sync::Arc;

use crate::errors::ApiError;
use crate::models::auth::{LoginRequest, RegisterRequest};
use crate::service::booking_api::BookingApi;
use crate::service::prompt::Prompter;
use crate::service::token_store::TokenStore;
use crate::service::view_state::{CalendarEntry, ViewState};
use crate::views::auth::{update_auth_ui, AuthPanel, HeaderView, PanelTab};
use crate::views::calendar::CalendarView;
use crate::views::strip::{render_strip, StripView};

/// Input of the mini register form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub mobile: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutcome {
    Booked,
    Declined,
    Unavailable,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPage {
    pub header: HeaderView,
    pub error: Option<String>,
    pub message: Option<String>,
    pub strip: StripView,
    pub calendar: Vec<CalendarEntry>,
    pub login_message: Option<String>,
    pub register_message: Option<String>,
}

impl Default for PublicPage {
    fn default() -> Self {
        Self {
            header: update_auth_ui(None),
            error: None,
            message: None,
            strip: StripView::default(),
            calendar: Vec::new(),
            login_message: None,
            register_message: None,
        }
    }
}

/// The public booking front end: session panel, header, card strip, calendar
/// and booking actions.
pub struct PublicController {
    api: Arc<dyn BookingApi>,
    tokens: Arc<TokenStore>,
    prompter: Arc<dyn Prompter>,
    state: ViewState,
    panel: AuthPanel,
    page: PublicPage,
}

impl PublicController {
    pub fn new(
        api: Arc<dyn BookingApi>,
        tokens: Arc<TokenStore>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            api,
            tokens,
            prompter,
            state: ViewState::default(),
            panel: AuthPanel::default(),
            page: PublicPage::default(),
        }
    }

    pub fn page(&self) -> &PublicPage {
        &self.page
    }

    pub fn panel(&self) -> &AuthPanel {
        &self.panel
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn calendar(&self) -> CalendarView {
        CalendarView::new(self.page.calendar.clone())
    }

    pub async fn start(&mut self) {
        self.refresh_auth();
        self.fetch_data().await;
    }

    fn refresh_auth(&mut self) {
        let token = self.tokens.get_token();
        self.page.header = update_auth_ui(token.as_deref());
        self.panel.render(token.as_deref());
    }

    pub fn toggle_panel(&mut self) {
        let token = self.tokens.get_token();
        self.panel.toggle(token.as_deref());
    }

    pub fn show_tab(&mut self, tab: PanelTab) {
        self.panel.show_tab(tab);
    }

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        self.page.login_message = None;
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.page.login_message = Some("Enter username and password".to_string());
            return false;
        }
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                self.page.login_message = Some(form_failure(&err, "Login error", "Login failed"));
                return false;
            }
        };
        let Some(token) = response.token.filter(|token| !token.is_empty()) else {
            self.page.login_message = Some("Login succeeded but token missing".to_string());
            return false;
        };
        if let Err(err) = self.tokens.set_token(&token) {
            let err = ApiError::from(err);
            tracing::error!("failed to store session: {}", err);
            self.page.login_message = Some(form_failure(&err, "Login error", "Login failed"));
            return false;
        }
        self.signed_in().await;
        true
    }

    pub async fn register(&mut self, form: RegisterForm) -> bool {
        self.page.register_message = None;
        let username = form.username.trim().to_string();
        if username.is_empty() || form.password.is_empty() {
            self.page.register_message = Some("Enter username and password".to_string());
            return false;
        }
        if form.password != form.password_confirm {
            self.page.register_message = Some("Passwords do not match".to_string());
            return false;
        }
        let request = RegisterRequest {
            username: username.clone(),
            password: form.password.clone(),
            mobile: non_blank(&form.mobile),
            email: non_blank(&form.email),
        };
        if let Err(err) = self.api.register(&request).await {
            self.page.register_message =
                Some(form_failure(&err, "Register error", "Register failed"));
            return false;
        }

        let login = LoginRequest {
            username,
            password: form.password,
        };
        let token = match self.api.login(&login).await {
            Ok(response) => response.token.filter(|token| !token.is_empty()),
            Err(err) => {
                tracing::warn!("auto-login after register failed: {}", err);
                None
            }
        };
        match token {
            Some(token) if self.tokens.set_token(&token).is_ok() => {
                self.signed_in().await;
                true
            }
            _ => {
                self.page.register_message = Some("Registered. Please login.".to_string());
                true
            }
        }
    }

    async fn signed_in(&mut self) {
        self.refresh_auth();
        self.panel.close();
        self.fetch_data().await;
    }

    pub async fn logout(&mut self) {
        if let Err(err) = self.tokens.clear_token() {
            tracing::error!("failed to clear session: {}", err);
        }
        self.refresh_auth();
        self.panel.close();
        self.fetch_data().await;
    }

    /// Loads events (required) and bookings (best effort), then rebuilds the
    /// view state, the calendar projection and the strip.
    pub async fn fetch_data(&mut self) {
        self.page.error = None;
        self.page.message = None;

        let events = match self.api.list_events().await {
            Ok(events) => events,
            Err(err) => {
                tracing::error!("Failed to load events: {}", err);
                self.page.error = Some(format!("Failed to load data: {}", err));
                self.page.strip = StripView::Message(format!("Failed to load data. {}", err));
                return;
            }
        };

        let bookings = match self.api.list_bookings().await {
            Ok(bookings) => bookings,
            Err(err) => {
                tracing::warn!("Bookings not loaded: {}", err);
                self.page.message = Some(format!("Bookings not loaded: {}", err));
                Vec::new()
            }
        };

        self.state = ViewState::new(events, &bookings);
        self.page.calendar = self.state.calendar_entries();
        self.page.strip = render_strip(&self.state.events, &self.state.booking_counts);
    }

    /// Filters the cached events without refetching.
    pub fn search(&mut self, query: &str) {
        let filtered = self.state.search(query);
        self.page.strip = render_strip(&filtered, &self.state.booking_counts);
    }

    pub async fn book(&mut self, event_id: i64) -> BookOutcome {
        let bookable = self
            .page
            .strip
            .card(event_id)
            .is_some_and(|card| card.book_enabled);
        if !bookable {
            return BookOutcome::Unavailable;
        }
        self.submit_booking(event_id).await
    }

    pub async fn book_from_calendar(&mut self, event_id: i64) -> BookOutcome {
        let calendar = self.calendar();
        let Some(entry) = calendar.find(event_id) else {
            return BookOutcome::Unavailable;
        };
        let question = format!("Book event \"{}\"?", entry.title);
        if !self.prompter.confirm(&question).await {
            return BookOutcome::Declined;
        }
        self.submit_booking(event_id).await
    }

    async fn submit_booking(&mut self, event_id: i64) -> BookOutcome {
        match self.api.book_event(event_id).await {
            Ok(_) => {
                self.prompter.notify("Booked successfully").await;
                self.fetch_data().await;
                BookOutcome::Booked
            }
            Err(err) => {
                let message = format!("Booking failed: {}", err);
                self.prompter.notify(&message).await;
                BookOutcome::Failed(message)
            }
        }
    }

    pub async fn details(&self, event_id: i64) -> bool {
        match self.page.strip.card(event_id) {
            Some(card) => {
                self.prompter.notify(&card.details).await;
                true
            }
            None => false,
        }
    }
}

/// Server rejections show the server's message; transport trouble is reported as an error.
fn form_failure(err: &ApiError, prefix: &str, fallback: &str) -> String {
    match err {
        ApiError::Transport(_) | ApiError::Io(_) | ApiError::Decode(_) | ApiError::Store(_) => {
            format!("{}: {}", prefix, err)
        }
        _ => err.server_message().unwrap_or_else(|| fallback.to_string()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
