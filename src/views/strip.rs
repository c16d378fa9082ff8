use std::fmt;

use crate::models::event::Event;
use crate::service::view_state::{remaining_capacity, BookingCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Left(u32),
    Full,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Left(remaining) => write!(f, "{} left", remaining),
            Availability::Full => write!(f, "Full"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripCard {
    pub event_id: i64,
    pub title: String,
    pub image_url: String,
    pub meta: String,
    pub availability: Availability,
    pub book_enabled: bool,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripView {
    Cards(Vec<StripCard>),
    Message(String),
}

impl Default for StripView {
    fn default() -> Self {
        StripView::Cards(Vec::new())
    }
}

impl StripView {
    pub fn card(&self, event_id: i64) -> Option<&StripCard> {
        match self {
            StripView::Cards(cards) => cards.iter().find(|card| card.event_id == event_id),
            StripView::Message(_) => None,
        }
    }
}

pub fn placeholder_image(event_id: i64) -> String {
    format!("https://picsum.photos/seed/event-{}/600/360", event_id)
}

fn image_url(event: &Event) -> String {
    match event.image_path.as_deref() {
        Some(path) if !path.is_empty() => {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            }
        }
        _ => placeholder_image(event.id),
    }
}

pub fn details_text(event: &Event) -> String {
    let description = match event.description.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => "No description.",
    };
    format!(
        "{}\n\n{}\n\nDate: {}\nCapacity: {}",
        event.display_title(),
        description,
        event.date_text(),
        event.capacity()
    )
}

pub fn render_card(event: &Event, counts: &BookingCounts) -> StripCard {
    let booked = counts.get(&event.id).copied().unwrap_or(0);
    let remaining = remaining_capacity(event.capacity(), booked);
    let availability = if remaining > 0 {
        Availability::Left(remaining)
    } else {
        Availability::Full
    };
    StripCard {
        event_id: event.id,
        title: event.display_title().to_string(),
        image_url: image_url(event),
        meta: format!(
            "{} • Capacity: {} • Booked: {}",
            event.date_text(),
            event.capacity(),
            booked
        ),
        availability,
        book_enabled: remaining > 0,
        details: details_text(event),
    }
}

pub fn render_strip(events: &[Event], counts: &BookingCounts) -> StripView {
    if events.is_empty() {
        return StripView::Message("No events".to_string());
    }
    StripView::Cards(events.iter().map(|event| render_card(event, counts)).collect())
}

impl fmt::Display for StripCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.event_id, self.title)?;
        writeln!(f, "    {}", self.meta)?;
        writeln!(f, "    image: {}", self.image_url)?;
        let book = if self.book_enabled { "[Book]" } else { "[Book: unavailable]" };
        write!(f, "    {}  {}  [Details]", self.availability, book)
    }
}

impl fmt::Display for StripView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StripView::Message(message) => writeln!(f, "{}", message),
            StripView::Cards(cards) => {
                for (index, card) in cards.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{}", card)?;
                }
                Ok(())
            }
        }
    }
}
