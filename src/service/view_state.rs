use std::collections::HashMap;

use crate::models::booking::Booking;
use crate::models::event::Event;

pub type BookingCounts = HashMap<i64, u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub id: i64,
    pub title: String,
    pub start: Option<String>,
}

/// Snapshot of the last successful fetch. Replaced wholesale on every fetch;
/// search only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub events: Vec<Event>,
    pub booking_counts: BookingCounts,
}

impl ViewState {
    pub fn new(events: Vec<Event>, bookings: &[Booking]) -> Self {
        Self {
            events,
            booking_counts: compute_booking_counts(bookings),
        }
    }

    pub fn booked(&self, event_id: i64) -> u32 {
        self.booking_counts.get(&event_id).copied().unwrap_or(0)
    }

    pub fn remaining(&self, event: &Event) -> u32 {
        remaining_capacity(event.capacity(), self.booked(event.id))
    }

    pub fn search(&self, query: &str) -> Vec<Event> {
        filter_events(&self.events, query)
    }

    pub fn calendar_entries(&self) -> Vec<CalendarEntry> {
        calendar_entries(&self.events)
    }
}

pub fn compute_booking_counts(bookings: &[Booking]) -> BookingCounts {
    let mut counts = BookingCounts::new();
    for event_id in bookings.iter().filter_map(Booking::event_ref) {
        *counts.entry(event_id).or_insert(0) += 1;
    }
    counts
}

/// Seats left, floored at zero for over-booked events.
pub fn remaining_capacity(capacity: i64, booked: u32) -> u32 {
    let remaining = capacity.saturating_sub(i64::from(booked)).max(0);
    u32::try_from(remaining).unwrap_or(u32::MAX)
}

pub fn filter_events(events: &[Event], query: &str) -> Vec<Event> {
    let query = query.trim().to_lowercase();
    events
        .iter()
        .filter(|event| {
            query.is_empty()
                || event
                    .title
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&query)
                || event.date_text().to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

pub fn calendar_entries(events: &[Event]) -> Vec<CalendarEntry> {
    events
        .iter()
        .map(|event| CalendarEntry {
            id: event.id,
            title: event.display_title().to_string(),
            start: event.date.clone().filter(|date| !date.is_empty()),
        })
        .collect()
}
