use std::sync::Arc;

use runner_interface::NetworkClient;
use tracing::info;

use crate::error::Result;
use crate::gql::{self, RemoteId};
use crate::mapping::ProgressPlan;
use crate::model;
use crate::preferences::{PreferenceStore, Preferences};
use crate::transport;

/// Typed access to the server's GraphQL API. Each call takes the
/// preferences snapshot of the operation it belongs to.
#[derive(Clone)]
pub struct SuwayomiClient {
    network: Arc<dyn NetworkClient>,
    store: Arc<dyn PreferenceStore>,
}

impl SuwayomiClient {
    pub fn new(network: Arc<dyn NetworkClient>, store: Arc<dyn PreferenceStore>) -> Self {
        Self { network, store }
    }

    pub fn store(&self) -> &dyn PreferenceStore { self.store.as_ref() }

    pub async fn preferences(&self) -> Result<Preferences> {
        Preferences::load(self.store.as_ref()).await
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, prefs: &Preferences, query: &str) -> Result<T> {
        transport::post(self.network.as_ref(), prefs, query).await
    }

    /// Manga in the first category, which is the user's library.
    pub async fn library(&self, prefs: &Preferences) -> Result<Vec<model::MangaSummary>> {
        let data: model::CategoriesData = self.post(prefs, gql::ALL_CATEGORIES_QUERY).await?;
        Ok(data.categories.nodes.into_iter().next().map(|c| c.mangas.nodes).unwrap_or_default())
    }

    pub async fn search(&self, prefs: &Preferences, title: &str) -> Result<Vec<model::MangaSummary>> {
        let data: model::SearchData = self.post(prefs, &gql::search_manga_query(title)).await?;
        Ok(data.mangas.nodes)
    }

    pub async fn manga(&self, prefs: &Preferences, id: RemoteId) -> Result<model::Manga> {
        let data: model::MangaData = self.post(prefs, &gql::manga_query(id)).await?;
        Ok(data.manga)
    }

    pub async fn chapters(&self, prefs: &Preferences, manga: RemoteId) -> Result<model::MangaChapters> {
        let data: model::MangaChaptersData = self.post(prefs, &gql::manga_chapters_query(manga)).await?;
        Ok(data.manga)
    }

    pub async fn chapter_pages(&self, prefs: &Preferences, chapter: RemoteId) -> Result<model::ChapterPages> {
        let data: model::ChapterPagesData = self.post(prefs, &gql::chapter_pages_mutation(chapter)).await?;
        Ok(data.fetch_chapter_pages)
    }

    pub async fn set_chapters_read(&self, prefs: &Preferences, ids: &[RemoteId], read: bool) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let _: model::UpdateChaptersData = self.post(prefs, &gql::set_chapters_read_mutation(ids, read)).await?;
        Ok(())
    }

    /// Marks read first, then unread; the second request only runs once
    /// the first succeeded.
    pub async fn apply_progress(&self, prefs: &Preferences, plan: &ProgressPlan) -> Result<()> {
        info!(read = plan.read.len(), unread = plan.unread.len(), "syncing read state");
        self.set_chapters_read(prefs, &plan.read, true).await?;
        self.set_chapters_read(prefs, &plan.unread, false).await
    }
}
