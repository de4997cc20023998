use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use runner_interface::{
    async_trait, Authenticatable, ContentTracker, FieldValue, Form, FormField, FormSection, FormValues, Highlight,
    ImageRequestHandler, NetworkClient, NetworkRequest, PreferenceProvider, Runner, RunnerInfo, TrackProgressUpdate,
    TrackStatus, TrackerConfig, User,
};
use tracing::debug;

use super::{image_request, settings, THUMBNAIL, WEBSITE};
use crate::client::SuwayomiClient;
use crate::error::Error;
use crate::gql::RemoteId;
use crate::mapping;
use crate::preferences::{PreferenceStore, Preferences};

/// Id of the chapter stepper in the entry form.
pub const PROGRESS_FIELD: &str = "progress";

/// Tracker that mirrors reading progress into the server's read flags.
pub struct SuwayomiTracker {
    info: RunnerInfo,
    config: TrackerConfig,
    client: SuwayomiClient,
}

impl SuwayomiTracker {
    pub const ID: &'static str = "tin.suwayomitracker";

    pub fn new(network: Arc<dyn NetworkClient>, store: Arc<dyn PreferenceStore>) -> Self {
        Self::with_client(SuwayomiClient::new(network, store))
    }

    pub fn with_client(client: SuwayomiClient) -> Self {
        let info = RunnerInfo {
            id: Self::ID.into(),
            name: "Suwayomi Tracker".into(),
            version: 0.2,
            thumbnail: Some(THUMBNAIL.into()),
            website: Some(WEBSITE.into()),
            supported_languages: Vec::new(),
            rating: None,
        };
        let config = TrackerConfig { link_keys: vec!["suwayomi".into()] };
        Self { info, config, client }
    }

    async fn sync_to(&self, prefs: &Preferences, id: RemoteId, target: f64) -> Result<()> {
        let manga = self.client.chapters(prefs, id).await?;
        let plan = mapping::plan_progress_update(&manga.chapters.nodes, target)?;
        self.client.apply_progress(prefs, &plan).await?;
        Ok(())
    }
}

impl Runner for SuwayomiTracker {
    fn info(&self) -> &RunnerInfo { &self.info }
}

#[async_trait]
impl ContentTracker for SuwayomiTracker {
    fn config(&self) -> &TrackerConfig { &self.config }

    async fn did_update_last_read_chapter(&self, id: &str, progress: TrackProgressUpdate) -> Result<()> {
        let id = RemoteId::parse(id)?;
        let Some(chapter) = progress.chapter else {
            debug!(%id, "progress update without a chapter number");
            return Ok(());
        };
        let prefs = self.client.preferences().await?;
        self.sync_to(&prefs, id, chapter).await
    }

    /// Library titles matching any of `titles`, first match first.
    async fn get_results_for_titles(&self, titles: &[String]) -> Result<Vec<Highlight>> {
        let prefs = self.client.preferences().await?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for title in titles.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            for manga in self.client.search(&prefs, title).await? {
                if seen.insert(manga.id) {
                    out.push(mapping::highlight_from_summary(&prefs, &manga));
                }
            }
        }
        Ok(out)
    }

    async fn get_track_item(&self, id: &str) -> Result<Highlight> {
        let id = RemoteId::parse(id)?;
        let prefs = self.client.preferences().await?;
        let manga = self.client.manga(&prefs, id).await?;
        Ok(mapping::track_item_from_manga(&prefs, &manga))
    }

    async fn did_update_status(&self, _id: &str, _status: TrackStatus) -> Result<()> {
        Err(Error::Unsupported("changing tracking status").into())
    }

    async fn begin_tracking(&self, _id: &str, _status: TrackStatus) -> Result<()> {
        Err(Error::Unsupported("beginning tracking").into())
    }

    async fn get_entry_form(&self, id: &str) -> Result<Form> {
        let id = RemoteId::parse(id)?;
        let prefs = self.client.preferences().await?;
        let manga = self.client.manga(&prefs, id).await?;
        let stepper = FormField::Stepper {
            id: PROGRESS_FIELD.into(),
            title: "Chapter".into(),
            value: manga.latest_read_chapter.as_ref().map_or(0.0, |c| c.chapter_number),
            upper_bound: manga.highest_numbered_chapter.as_ref().map(|c| c.chapter_number),
            allow_decimal: true,
        };
        Ok(Form {
            sections: vec![FormSection { header: Some("Reading Progress".into()), footer: None, children: vec![stepper] }],
        })
    }

    async fn did_submit_entry_form(&self, id: &str, form: FormValues) -> Result<()> {
        let id = RemoteId::parse(id)?;
        let target = form
            .get(PROGRESS_FIELD)
            .and_then(FieldValue::as_f64)
            .ok_or_else(|| Error::InvalidFormField(PROGRESS_FIELD.into()))?;
        let prefs = self.client.preferences().await?;
        self.sync_to(&prefs, id, target).await
    }
}

#[async_trait]
impl PreferenceProvider for SuwayomiTracker {
    async fn get_preference_menu(&self) -> Result<Form> {
        let prefs = self.client.preferences().await?;
        Ok(Form { sections: settings::connection_sections(&prefs) })
    }

    async fn update_preference(&self, id: &str, value: FieldValue) -> Result<()> {
        Ok(settings::update_preference(self.client.store(), id, &value).await?)
    }
}

#[async_trait]
impl ImageRequestHandler for SuwayomiTracker {
    async fn will_request_image(&self, image_url: &str) -> Result<NetworkRequest> {
        let prefs = self.client.preferences().await?;
        Ok(image_request(&prefs, image_url))
    }
}

/// The server has no user sessions; these exist so the host treats the
/// tracker as signed in.
#[async_trait]
impl Authenticatable for SuwayomiTracker {
    async fn get_authenticated_user(&self) -> Result<Option<User>> {
        Ok(Some(User { handle: "placeholder".into() }))
    }

    async fn handle_user_sign_out(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryStore;
    use crate::testing::FakeClient;
    use serde_json::json;

    fn setup() -> (Arc<FakeClient>, SuwayomiTracker) {
        let fake = Arc::new(FakeClient::new());
        let tracker = SuwayomiTracker::new(fake.clone(), Arc::new(MemoryStore::new()));
        (fake, tracker)
    }

    fn chapters(numbers: &[f64]) -> serde_json::Value {
        let nodes: Vec<_> = numbers
            .iter()
            .map(|n| json!({"id": (*n * 10.0) as u64, "name": "", "chapterNumber": n, "uploadDate": "0"}))
            .collect();
        json!({"data": {"manga": {"id": 1, "chapters": {"nodes": nodes}}}})
    }

    fn updated() -> serde_json::Value {
        json!({"data": {"updateChapters": {"chapters": []}}})
    }

    fn form(progress: f64) -> FormValues {
        FormValues::from([(PROGRESS_FIELD.to_string(), FieldValue::Number(progress))])
    }

    #[tokio::test]
    async fn submit_marks_at_or_below_read_and_above_unread() {
        let (fake, tracker) = setup();
        fake.push_json(chapters(&[1.0, 3.0, 5.0, 7.0]));
        fake.push_json(updated());
        fake.push_json(updated());
        tracker.did_submit_entry_form("1", form(5.0)).await.unwrap();
        let q = fake.queries();
        assert_eq!(q.len(), 3);
        assert!(q[1].contains("ids: [10, 30, 50], patch: {isRead: true}"));
        assert!(q[2].contains("ids: [70], patch: {isRead: false}"));
    }

    #[tokio::test]
    async fn submit_between_chapters_succeeds() {
        let (fake, tracker) = setup();
        fake.push_json(chapters(&[1.0, 3.0, 5.0, 7.0]));
        fake.push_json(updated());
        fake.push_json(updated());
        tracker.did_submit_entry_form("1", form(6.0)).await.unwrap();
        assert!(fake.queries()[1].contains("ids: [10, 30, 50]"));
    }

    #[tokio::test]
    async fn submit_zero_only_unreads() {
        let (fake, tracker) = setup();
        fake.push_json(chapters(&[1.0, 3.0]));
        fake.push_json(updated());
        tracker.did_submit_entry_form("1", form(0.0)).await.unwrap();
        let q = fake.queries();
        assert_eq!(q.len(), 2);
        assert!(q[1].contains("ids: [10, 30], patch: {isRead: false}"));
    }

    #[tokio::test]
    async fn submit_below_first_chapter_fails_without_writes() {
        let (fake, tracker) = setup();
        fake.push_json(chapters(&[2.0, 3.0]));
        let err = tracker.did_submit_entry_form("1", form(1.0)).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ChapterNotFound(_))));
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn submit_without_progress_is_rejected() {
        let (fake, tracker) = setup();
        let err = tracker.did_submit_entry_form("1", FormValues::new()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidFormField(_))));
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn last_read_update_syncs_chapters() {
        let (fake, tracker) = setup();
        fake.push_json(chapters(&[1.0, 2.0]));
        fake.push_json(updated());
        fake.push_json(updated());
        let update = TrackProgressUpdate { chapter: Some(1.0), volume: None };
        tracker.did_update_last_read_chapter("1", update).await.unwrap();
        assert_eq!(fake.queries().len(), 3);

        let before = fake.requests().len();
        tracker.did_update_last_read_chapter("1", TrackProgressUpdate::default()).await.unwrap();
        assert_eq!(fake.requests().len(), before);
    }

    #[tokio::test]
    async fn status_changes_are_unsupported() {
        let (_, tracker) = setup();
        for err in [
            tracker.did_update_status("1", TrackStatus::Dropped).await.unwrap_err(),
            tracker.begin_tracking("1", TrackStatus::Planned).await.unwrap_err(),
        ] {
            assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Unsupported(_))));
        }
    }

    #[tokio::test]
    async fn title_search_dedupes_across_titles() {
        let (fake, tracker) = setup();
        fake.push_json(json!({"data": {"mangas": {"nodes": [{"id": 1, "title": "Vagabond", "thumbnailUrl": "/v"}]}}}));
        fake.push_json(json!({"data": {"mangas": {"nodes": [
            {"id": 1, "title": "Vagabond", "thumbnailUrl": "/v"},
            {"id": 2, "title": "Vagabond Gaiden", "thumbnailUrl": "/g"}
        ]}}}));
        let titles = vec!["Vagabond".to_string(), " ".to_string(), "バガボンド".to_string()];
        let found = tracker.get_results_for_titles(&titles).await.unwrap();
        assert_eq!(found.iter().map(|h| h.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn entry_form_and_track_item_reflect_server_progress() {
        let (fake, tracker) = setup();
        let manga = json!({"data": {"manga": {
            "id": 4, "title": "Monster", "thumbnailUrl": "/m", "genre": [],
            "highestNumberedChapter": {"chapterNumber": 162}, "latestReadChapter": {"chapterNumber": 162}
        }}});
        fake.push_json(manga.clone());
        fake.push_json(manga);

        let form = tracker.get_entry_form("4").await.unwrap();
        match &form.sections[0].children[0] {
            FormField::Stepper { id, value, upper_bound, allow_decimal, .. } => {
                assert_eq!(id, PROGRESS_FIELD);
                assert_eq!(*value, 162.0);
                assert_eq!(*upper_bound, Some(162.0));
                assert!(*allow_decimal);
            }
            other => panic!("unexpected {other:?}"),
        }

        let item = tracker.get_track_item("4").await.unwrap();
        assert_eq!(item.entry.unwrap().status, TrackStatus::Completed);
    }

    #[tokio::test]
    async fn placeholder_session() {
        let (_, tracker) = setup();
        assert_eq!(tracker.get_authenticated_user().await.unwrap().unwrap().handle, "placeholder");
        tracker.handle_user_sign_out().await.unwrap();
        assert_eq!(tracker.config().link_keys, vec!["suwayomi"]);
        assert_eq!(tracker.get_preference_menu().await.unwrap().sections.len(), 3);
    }
}
