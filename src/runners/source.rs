use std::sync::Arc;

use anyhow::Result;
use runner_interface::{
    async_trait, CatalogRating, Chapter, ChapterData, Content, ContentProgressState, ContentSource, DirectoryConfig,
    DirectoryRequest, FieldValue, Form, ImageRequestHandler, NetworkClient, NetworkRequest, PagedResult,
    PreferenceProvider, ProgressSyncHandler, Runner, RunnerInfo,
};
use tracing::debug;

use super::{image_request, settings, THUMBNAIL, WEBSITE};
use crate::client::SuwayomiClient;
use crate::gql::RemoteId;
use crate::mapping;
use crate::preferences::PreferenceStore;

/// Content source over the server's library.
pub struct SuwayomiSource {
    info: RunnerInfo,
    client: SuwayomiClient,
}

impl SuwayomiSource {
    pub const ID: &'static str = "tin.suwayomi";

    pub fn new(network: Arc<dyn NetworkClient>, store: Arc<dyn PreferenceStore>) -> Self {
        Self::with_client(SuwayomiClient::new(network, store))
    }

    pub fn with_client(client: SuwayomiClient) -> Self {
        let info = RunnerInfo {
            id: Self::ID.into(),
            name: "Suwayomi".into(),
            version: 0.2,
            thumbnail: Some(THUMBNAIL.into()),
            website: Some(WEBSITE.into()),
            supported_languages: vec!["UNIVERSAL".into()],
            rating: Some(CatalogRating::Safe),
        };
        Self { info, client }
    }
}

impl Runner for SuwayomiSource {
    fn info(&self) -> &RunnerInfo { &self.info }
}

#[async_trait]
impl ContentSource for SuwayomiSource {
    /// The whole library on one page, or library titles matching the query.
    async fn get_directory(&self, request: DirectoryRequest) -> Result<PagedResult> {
        let prefs = self.client.preferences().await?;
        let manga = match request.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => self.client.search(&prefs, q).await?,
            None => self.client.library(&prefs).await?,
        };
        debug!(count = manga.len(), "directory listing");
        Ok(PagedResult {
            results: manga.iter().map(|m| mapping::highlight_from_summary(&prefs, m)).collect(),
            is_last_page: true,
        })
    }

    async fn get_directory_config(&self, _config_id: Option<&str>) -> Result<DirectoryConfig> {
        Ok(DirectoryConfig::default())
    }

    async fn get_content(&self, content_id: &str) -> Result<Content> {
        let id = RemoteId::parse(content_id)?;
        let prefs = self.client.preferences().await?;
        let manga = self.client.manga(&prefs, id).await?;
        Ok(mapping::content_from_manga(&prefs, &manga))
    }

    async fn get_chapters(&self, content_id: &str) -> Result<Vec<Chapter>> {
        let id = RemoteId::parse(content_id)?;
        let prefs = self.client.preferences().await?;
        let manga = self.client.chapters(&prefs, id).await?;
        Ok(mapping::chapters_from_manga(&manga))
    }

    async fn get_chapter_data(&self, _content_id: &str, chapter_id: &str) -> Result<ChapterData> {
        let id = RemoteId::parse(chapter_id)?;
        let prefs = self.client.preferences().await?;
        let pages = self.client.chapter_pages(&prefs, id).await?;
        Ok(mapping::chapter_data_from_pages(&prefs, &pages))
    }
}

#[async_trait]
impl ImageRequestHandler for SuwayomiSource {
    async fn will_request_image(&self, image_url: &str) -> Result<NetworkRequest> {
        let prefs = self.client.preferences().await?;
        Ok(image_request(&prefs, image_url))
    }
}

#[async_trait]
impl PreferenceProvider for SuwayomiSource {
    async fn get_preference_menu(&self) -> Result<Form> {
        let prefs = self.client.preferences().await?;
        let mut sections = settings::connection_sections(&prefs);
        sections.push(settings::tracking_section(&prefs));
        Ok(Form { sections })
    }

    async fn update_preference(&self, id: &str, value: FieldValue) -> Result<()> {
        Ok(settings::update_preference(self.client.store(), id, &value).await?)
    }
}

#[async_trait]
impl ProgressSyncHandler for SuwayomiSource {
    async fn get_progress_state(&self, content_id: &str) -> Result<ContentProgressState> {
        let prefs = self.client.preferences().await?;
        if !prefs.track {
            return Ok(ContentProgressState::default());
        }
        let id = RemoteId::parse(content_id)?;
        let manga = self.client.chapters(&prefs, id).await?;
        Ok(mapping::progress_state_from_chapters(&manga.chapters.nodes))
    }
}
