use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackStatus {
    Current,
    Planned,
    Completed,
    Paused,
    Dropped,
    Repeating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackProgress {
    pub last_read_chapter: f64,
    pub max_available_chapter: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub status: TrackStatus,
    pub progress: TrackProgress,
}

/// Progress pushed by the host after the user reads a chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackProgressUpdate {
    pub chapter: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Keys the host uses to link content sources to this tracker.
    pub link_keys: Vec<String>,
}
