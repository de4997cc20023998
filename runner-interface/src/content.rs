use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::TrackEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationStatus {
    Ongoing,
    Completed,
    Cancelled,
    Hiatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

/// A titled group of tags, e.g. genres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub tags: Vec<Tag>,
}

/// Compact entry used in directory listings and tracker search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub title: String,
    pub cover: String,
    pub web_url: Option<String>,
    pub entry: Option<TrackEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRequest {
    pub query: Option<String>,
    pub page: u32,
    pub list_id: Option<String>,
    pub config_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfig {
    #[serde(default)]
    pub sort_options: Vec<Tag>,
    #[serde(default)]
    pub filters: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    pub results: Vec<Highlight>,
    pub is_last_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub title: String,
    pub cover: String,
    pub web_url: Option<String>,
    pub status: Option<PublicationStatus>,
    pub creators: Vec<String>,
    pub summary: Option<String>,
    pub properties: Vec<Property>,
}

/// Scanlation group or other provider credited for a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_id: String,
    pub number: f64,
    /// Position in the host list; 0 is the newest chapter.
    pub index: usize,
    pub date: DateTime<Utc>,
    pub language: String,
    pub title: Option<String>,
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterPage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterData {
    pub pages: Vec<ChapterPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingState {
    pub chapter_id: String,
    pub page: i64,
    pub read_date: Option<DateTime<Utc>>,
    /// Fraction of the chapter read, in `[0, 1]`.
    pub progress: f64,
}

/// Reading progress reported back to the host. An empty state means the
/// runner has nothing to sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProgressState {
    pub read_chapter_ids: Option<Vec<String>>,
    pub current_reading_state: Option<ReadingState>,
}

impl ContentProgressState {
    pub fn is_empty(&self) -> bool {
        self.read_chapter_ids.is_none() && self.current_reading_state.is_none()
    }
}
