use async_trait::async_trait;

use crate::clients::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::booking::Booking;
use crate::models::event::{Event, EventUpload};

/// The backend operations both controllers depend on.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;
    async fn create_event(&self, upload: &EventUpload) -> Result<Event, ApiError>;
    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError>;
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;
    async fn book_event(&self, event_id: i64) -> Result<Option<Booking>, ApiError>;
    async fn cancel_booking(&self, booking_id: i64) -> Result<(), ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn admin_ping(&self) -> Result<String, ApiError>;
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get_events().await
    }

    async fn create_event(&self, upload: &EventUpload) -> Result<Event, ApiError> {
        ApiClient::create_event(self, upload).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<(), ApiError> {
        ApiClient::delete_event(self, event_id).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get_bookings().await
    }

    async fn book_event(&self, event_id: i64) -> Result<Option<Booking>, ApiError> {
        ApiClient::book_event(self, event_id).await
    }

    async fn cancel_booking(&self, booking_id: i64) -> Result<(), ApiError> {
        ApiClient::cancel_booking(self, booking_id).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        ApiClient::register(self, request).await
    }

    async fn admin_ping(&self) -> Result<String, ApiError> {
        ApiClient::admin_ping(self).await
    }
}
