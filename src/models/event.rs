use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub image_path: Option<String>,
}

impl Event {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "Untitled",
        }
    }

    pub fn date_text(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    pub fn capacity(&self) -> i64 {
        self.capacity.unwrap_or(0)
    }
}

/// A validated create-event submission, ready to be sent as multipart form data.
#[derive(Debug, Clone, PartialEq)]
pub struct EventUpload {
    pub title: String,
    pub description: String,
    pub date: String,
    pub capacity: i32,
    pub image: Option<PathBuf>,
}
