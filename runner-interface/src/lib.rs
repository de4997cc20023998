//! Host contract shared between the reading application and its runners.
//!
//! Every capability a runner can offer is its own trait; a runner type
//! implements the subset it supports and the host composes them.

pub use async_trait::async_trait;

pub mod content;
pub mod form;
pub mod network;
pub mod tracker;

pub use content::*;
pub use form::*;
pub use network::*;
pub use tracker::*;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogRating {
    Safe,
    Mixed,
    Nsfw,
}

/// Static description of a runner, shown in the host's runner list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerInfo {
    pub id: String,
    pub name: String,
    pub version: f64,
    pub thumbnail: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    pub rating: Option<CatalogRating>,
}

pub trait Runner: Send + Sync {
    fn info(&self) -> &RunnerInfo;
}

#[async_trait]
pub trait ContentSource: Runner {
    async fn get_directory(&self, request: DirectoryRequest) -> Result<PagedResult>;

    async fn get_directory_config(&self, config_id: Option<&str>) -> Result<DirectoryConfig>;

    async fn get_content(&self, content_id: &str) -> Result<Content>;

    async fn get_chapters(&self, content_id: &str) -> Result<Vec<Chapter>>;

    async fn get_chapter_data(&self, content_id: &str, chapter_id: &str) -> Result<ChapterData>;
}

/// Lets a runner rewrite the request the host makes for an image URL,
/// typically to attach credentials.
#[async_trait]
pub trait ImageRequestHandler: Runner {
    async fn will_request_image(&self, image_url: &str) -> Result<NetworkRequest>;
}

#[async_trait]
pub trait PreferenceProvider: Runner {
    async fn get_preference_menu(&self) -> Result<Form>;

    /// Called when the user edits the field with the given id.
    async fn update_preference(&self, id: &str, value: FieldValue) -> Result<()>;
}

#[async_trait]
pub trait ProgressSyncHandler: Runner {
    async fn get_progress_state(&self, content_id: &str) -> Result<ContentProgressState>;
}

#[async_trait]
pub trait ContentTracker: Runner {
    fn config(&self) -> &TrackerConfig;

    async fn did_update_last_read_chapter(&self, id: &str, progress: TrackProgressUpdate) -> Result<()>;

    async fn get_results_for_titles(&self, titles: &[String]) -> Result<Vec<Highlight>>;

    async fn get_track_item(&self, id: &str) -> Result<Highlight>;

    async fn did_update_status(&self, id: &str, status: TrackStatus) -> Result<()>;

    async fn begin_tracking(&self, id: &str, status: TrackStatus) -> Result<()>;

    async fn get_entry_form(&self, id: &str) -> Result<Form>;

    async fn did_submit_entry_form(&self, id: &str, form: FormValues) -> Result<()>;
}

#[async_trait]
pub trait Authenticatable: Runner {
    async fn get_authenticated_user(&self) -> Result<Option<User>>;

    async fn handle_user_sign_out(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub handle: String,
}
