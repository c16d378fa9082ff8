use std::fmt;

use crate::models::booking::Booking;
use crate::models::event::Event;

const EMPTY_CELL: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub date: String,
    pub capacity: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            image: event
                .image_path
                .clone()
                .filter(|path| !path.is_empty())
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            title: event.title.clone().unwrap_or_default(),
            date: event.date_text().to_string(),
            capacity: event
                .capacity
                .map(|capacity| capacity.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRow {
    pub id: i64,
    pub user: String,
    pub event: String,
    pub qr_link: String,
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            user: booking.user_label(),
            event: booking.event_label(),
            qr_link: booking
                .qr_code_path
                .as_deref()
                .filter(|path| !path.is_empty())
                .map(|path| format!("/{}", path.trim_start_matches('/')))
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        }
    }
}

/// A table body: either data rows or a single muted message row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Table<R> {
    Rows(Vec<R>),
    Message(String),
}

impl<R> Table<R> {
    pub fn loading() -> Self {
        Table::Message("Loading...".to_string())
    }

    pub fn rows(&self) -> &[R] {
        match self {
            Table::Rows(rows) => rows.as_slice(),
            Table::Message(_) => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Table::Rows(_) => None,
            Table::Message(message) => Some(message),
        }
    }
}

pub type EventsTable = Table<EventRow>;
pub type BookingsTable = Table<BookingRow>;

impl fmt::Display for EventRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5}  {:<30}  {:<12}  {:>8}  {}",
            self.id, self.title, self.date, self.capacity, self.image
        )
    }
}

impl fmt::Display for BookingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5}  {:<20}  {:<30}  {}",
            self.id, self.user, self.event, self.qr_link
        )
    }
}

impl<R: fmt::Display> fmt::Display for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Message(message) => writeln!(f, "{}", message),
            Table::Rows(rows) => {
                for row in rows {
                    writeln!(f, "{}", row)?;
                }
                Ok(())
            }
        }
    }
}
