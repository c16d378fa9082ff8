use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BookingUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BookingEvent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub user: Option<BookingUser>,
    #[serde(default)]
    pub event: Option<BookingEvent>,
    // Older payloads carry the event reference flat.
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub qr_code_path: Option<String>,
}

impl Booking {
    pub fn event_ref(&self) -> Option<i64> {
        self.event
            .as_ref()
            .and_then(|event| event.id)
            .or(self.event_id)
    }

    pub fn user_label(&self) -> String {
        match &self.user {
            Some(user) => match (&user.username, user.id) {
                (Some(name), _) if !name.is_empty() => name.clone(),
                (_, Some(id)) => format!("id:{}", id),
                _ => "id:N/A".to_string(),
            },
            None => "user_id:N/A".to_string(),
        }
    }

    pub fn event_label(&self) -> String {
        match &self.event {
            Some(event) => match (&event.title, event.id) {
                (Some(title), _) if !title.is_empty() => title.clone(),
                (_, Some(id)) => format!("id:{}", id),
                _ => "id:N/A".to_string(),
            },
            None => match self.event_id {
                Some(id) => format!("event_id:{}", id),
                None => "event_id:N/A".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ref_falls_back_to_flat_event_id() {
        let nested: Booking =
            serde_json::from_str(r#"{"id":1,"event":{"id":7,"title":"Gala"}}"#).unwrap();
        let flat: Booking = serde_json::from_str(r#"{"id":2,"eventId":9}"#).unwrap();
        let orphan: Booking = serde_json::from_str(r#"{"id":3,"event":{"title":"?"}}"#).unwrap();

        assert_eq!(nested.event_ref(), Some(7));
        assert_eq!(flat.event_ref(), Some(9));
        assert_eq!(orphan.event_ref(), None);
    }

    #[test]
    fn labels_prefer_names_then_ids() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":1,"user":{"id":4},"event":{"id":7,"title":"Gala"},"qrCodePath":"qr/1.png"}"#,
        )
        .unwrap();
        assert_eq!(booking.user_label(), "id:4");
        assert_eq!(booking.event_label(), "Gala");
        assert_eq!(booking.qr_code_path.as_deref(), Some("qr/1.png"));

        let bare: Booking = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert_eq!(bare.user_label(), "user_id:N/A");
        assert_eq!(bare.event_label(), "event_id:N/A");
    }
}
