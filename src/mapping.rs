//! Conversions from server payloads to the host's shapes.

use chrono::{DateTime, TimeZone, Utc};
use runner_interface::{
    Chapter, ChapterData, ChapterPage, Content, ContentProgressState, Highlight, Property, Provider,
    PublicationStatus, ReadingState, Tag, TrackEntry, TrackProgress, TrackStatus,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::gql::RemoteId;
use crate::model;
use crate::preferences::Preferences;

/// Provider id and name used when a chapter has no scanlator.
pub const UNKNOWN_SCANLATOR: &str = "UNKNOWN";
/// Language reported when the manga's source is not known.
pub const UNIVERSAL_LANGUAGE: &str = "UNIVERSAL";

pub fn match_manga_status(status: &str) -> Option<PublicationStatus> {
    match status {
        "ONGOING" | "LICENSED" => Some(PublicationStatus::Ongoing),
        "COMPLETED" | "PUBLISHING_FINISHED" => Some(PublicationStatus::Completed),
        "CANCELLED" => Some(PublicationStatus::Cancelled),
        "ON_HIATUS" => Some(PublicationStatus::Hiatus),
        other => {
            debug!(status = other, "unmapped manga status");
            None
        }
    }
}

/// Where the host should send the user to view a manga. The server's own
/// route differs, but this one is stable for host navigation.
pub fn web_url(prefs: &Preferences, manga_id: u64) -> String {
    format!("{}/manga/{}", prefs.base_url, manga_id)
}

fn cover(prefs: &Preferences, thumbnail: Option<&str>) -> String {
    prefs.absolute(thumbnail.unwrap_or_default())
}

pub fn highlight_from_summary(prefs: &Preferences, manga: &model::MangaSummary) -> Highlight {
    Highlight {
        id: manga.id.to_string(),
        title: manga.title.clone(),
        cover: cover(prefs, manga.thumbnail_url.as_deref()),
        web_url: None,
        entry: None,
    }
}

pub fn content_from_manga(prefs: &Preferences, manga: &model::Manga) -> Content {
    let mut tags: Vec<Tag> = manga.genre.iter().map(|g| Tag::new(g.as_str(), g.as_str())).collect();
    if let Some(name) = manga.source.as_ref().and_then(|s| s.display_name.as_deref()) {
        tags.push(Tag::new(format!("source:{name}"), name));
    }
    let creators = match manga.author.as_deref() {
        Some(a) if !a.is_empty() => a.split(", ").map(str::to_string).collect(),
        _ => Vec::new(),
    };
    Content {
        title: manga.title.clone(),
        cover: cover(prefs, manga.thumbnail_url.as_deref()),
        web_url: Some(web_url(prefs, manga.id)),
        status: manga.status.as_deref().and_then(match_manga_status),
        creators,
        summary: manga.description.clone(),
        properties: vec![Property { id: "genres".into(), title: "Genres".into(), tags }],
    }
}

fn upload_date(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}

/// Chapters newest first. The server sends them oldest first, so the list
/// is reversed before indices are handed out.
pub fn chapters_from_manga(manga: &model::MangaChapters) -> Vec<Chapter> {
    let language = manga
        .source
        .as_ref()
        .and_then(|s| s.lang.clone())
        .unwrap_or_else(|| UNIVERSAL_LANGUAGE.to_string());
    manga
        .chapters
        .nodes
        .iter()
        .rev()
        .enumerate()
        .map(|(index, c)| {
            let scanlator = c.scanlator.as_deref().filter(|s| !s.is_empty()).unwrap_or(UNKNOWN_SCANLATOR);
            Chapter {
                chapter_id: c.id.to_string(),
                number: c.chapter_number,
                index,
                date: upload_date(c.upload_date),
                language: language.clone(),
                title: Some(c.name.clone()).filter(|s| !s.is_empty()),
                providers: vec![Provider { id: scanlator.to_string(), name: scanlator.to_string() }],
            }
        })
        .collect()
}

pub fn chapter_data_from_pages(prefs: &Preferences, pages: &model::ChapterPages) -> ChapterData {
    ChapterData { pages: pages.pages.iter().map(|p| ChapterPage { url: prefs.absolute(p) }).collect() }
}

/// Two-decimal progress through a chapter.
pub fn reading_progress(last_page_read: i64, page_count: i64) -> f64 {
    if page_count <= 0 {
        return 0.0;
    }
    ((last_page_read as f64 / page_count as f64) * 100.0).round() / 100.0
}

/// Read ids plus a pointer at the first unread chapter, in the order the
/// server returned them.
pub fn progress_state_from_chapters(chapters: &[model::Chapter]) -> ContentProgressState {
    let read: Vec<String> = chapters.iter().filter(|c| c.is_read).map(|c| c.id.to_string()).collect();
    let Some(current) = chapters.iter().find(|c| !c.is_read) else {
        return ContentProgressState { read_chapter_ids: Some(read), current_reading_state: None };
    };
    let read_date = (current.last_read_at > 0)
        .then(|| Utc.timestamp_opt(current.last_read_at, 0).single())
        .flatten();
    ContentProgressState {
        read_chapter_ids: Some(read),
        current_reading_state: Some(ReadingState {
            chapter_id: current.id.to_string(),
            page: current.last_page_read,
            read_date,
            progress: reading_progress(current.last_page_read, current.page_count),
        }),
    }
}

/// Chapters to flag read and unread so the server matches a tracker
/// progress value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressPlan {
    pub read: Vec<RemoteId>,
    pub unread: Vec<RemoteId>,
}

/// Everything numbered at or below `target` becomes read, everything above
/// it unread. A target of 0 clears all progress. Any other target must
/// cover at least one chapter.
pub fn plan_progress_update(chapters: &[model::Chapter], target: f64) -> Result<ProgressPlan> {
    if target <= 0.0 {
        return Ok(ProgressPlan {
            read: Vec::new(),
            unread: chapters.iter().map(|c| RemoteId::new(c.id)).collect(),
        });
    }
    let (read, unread): (Vec<_>, Vec<_>) = chapters.iter().partition(|c| c.chapter_number <= target);
    if read.is_empty() {
        warn!(target, chapters = chapters.len(), "no chapter at or below tracker progress");
        return Err(Error::ChapterNotFound(target));
    }
    Ok(ProgressPlan {
        read: read.iter().map(|c| RemoteId::new(c.id)).collect(),
        unread: unread.iter().map(|c| RemoteId::new(c.id)).collect(),
    })
}

/// Tracker status implied by how far the user has read.
pub fn track_status(last_read: f64, max_available: Option<f64>) -> TrackStatus {
    match max_available {
        Some(max) if max > 0.0 && last_read >= max => TrackStatus::Completed,
        _ if last_read > 0.0 => TrackStatus::Current,
        _ => TrackStatus::Planned,
    }
}

pub fn track_item_from_manga(prefs: &Preferences, manga: &model::Manga) -> Highlight {
    let last_read_chapter = manga.latest_read_chapter.as_ref().map_or(0.0, |c| c.chapter_number);
    let max_available_chapter = manga.highest_numbered_chapter.as_ref().map(|c| c.chapter_number);
    Highlight {
        id: manga.id.to_string(),
        title: manga.title.clone(),
        cover: cover(prefs, manga.thumbnail_url.as_deref()),
        web_url: Some(web_url(prefs, manga.id)),
        entry: Some(TrackEntry {
            status: track_status(last_read_chapter, max_available_chapter),
            progress: TrackProgress { last_read_chapter, max_available_chapter },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prefs() -> Preferences {
        Preferences { base_url: "http://srv:4567".into(), ..Default::default() }
    }

    fn chapter(id: u64, number: f64, read: bool, page: i64, count: i64) -> model::Chapter {
        serde_json::from_value(json!({
            "id": id, "name": format!("Chapter {number}"), "chapterNumber": number,
            "uploadDate": (1_700_000_000_000i64 + id as i64 * 1000).to_string(),
            "scanlator": "Group", "isRead": read, "lastPageRead": page,
            "lastReadAt": "0", "pageCount": count
        }))
        .unwrap()
    }

    fn manga() -> model::Manga {
        serde_json::from_value(json!({
            "id": 7, "title": "Blue Period", "thumbnailUrl": "/api/v1/manga/7/thumbnail",
            "description": "Art school.", "author": "Tsubasa Yamaguchi, Someone Else",
            "status": "PUBLISHING_FINISHED", "genre": ["Drama", "Seinen"],
            "source": {"lang": "en", "displayName": "MangaDex (EN)"},
            "highestNumberedChapter": {"chapterNumber": 60.0},
            "latestReadChapter": {"chapterNumber": 12.5}
        }))
        .unwrap()
    }

    #[test]
    fn statuses_map_per_table() {
        let table = [
            ("ONGOING", Some(PublicationStatus::Ongoing)),
            ("LICENSED", Some(PublicationStatus::Ongoing)),
            ("COMPLETED", Some(PublicationStatus::Completed)),
            ("PUBLISHING_FINISHED", Some(PublicationStatus::Completed)),
            ("CANCELLED", Some(PublicationStatus::Cancelled)),
            ("ON_HIATUS", Some(PublicationStatus::Hiatus)),
            ("UNKNOWN", None),
            ("ongoing", None),
            ("", None),
        ];
        for (raw, expected) in table {
            assert_eq!(match_manga_status(raw), expected, "{raw}");
        }
    }

    #[test]
    fn content_prefixes_cover_and_splits_authors() {
        let c = content_from_manga(&prefs(), &manga());
        assert_eq!(c.title, "Blue Period");
        assert_eq!(c.cover, "http://srv:4567/api/v1/manga/7/thumbnail");
        assert_eq!(c.web_url.as_deref(), Some("http://srv:4567/manga/7"));
        assert_eq!(c.status, Some(PublicationStatus::Completed));
        assert_eq!(c.creators, vec!["Tsubasa Yamaguchi", "Someone Else"]);
        assert_eq!(c.summary.as_deref(), Some("Art school."));
        assert_eq!(c.properties.len(), 1);
        let titles: Vec<_> = c.properties[0].tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Drama", "Seinen", "MangaDex (EN)"]);
    }

    #[test]
    fn content_without_source_still_has_genre_group() {
        let mut m = manga();
        m.source = None;
        m.genre.clear();
        m.author = None;
        let c = content_from_manga(&prefs(), &m);
        assert_eq!(c.properties.len(), 1);
        assert!(c.properties[0].tags.is_empty());
        assert!(c.creators.is_empty());
    }

    #[test]
    fn cover_is_plain_concatenation() {
        let p = Preferences { base_url: "http://srv/".into(), ..Default::default() };
        let summary = model::MangaSummary { id: 1, title: "t".into(), thumbnail_url: Some("/thumb.jpg".into()) };
        assert_eq!(highlight_from_summary(&p, &summary).cover, "http://srv//thumb.jpg");
    }

    #[test]
    fn chapters_are_reversed_with_dense_indices() {
        let remote = model::MangaChapters {
            id: 7,
            source: Some(model::MangaSource { lang: Some("ja".into()), display_name: None }),
            chapters: model::Nodes { nodes: (1..=4).map(|i| chapter(i, i as f64, false, 0, 0)).collect() },
        };
        let list = chapters_from_manga(&remote);
        assert_eq!(list.len(), 4);
        assert_eq!(list.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(list[0].chapter_id, "4");
        assert_eq!(list[3].chapter_id, "1");
        assert!(list.iter().all(|c| c.language == "ja"));
        assert_eq!(list[3].date.timestamp_millis(), 1_700_000_001_000);
    }

    #[test]
    fn missing_scanlator_becomes_unknown() {
        let mut c = chapter(1, 1.0, false, 0, 0);
        c.scanlator = None;
        let remote = model::MangaChapters { id: 1, source: None, chapters: model::Nodes { nodes: vec![c] } };
        let list = chapters_from_manga(&remote);
        assert_eq!(list[0].providers, vec![Provider { id: "UNKNOWN".into(), name: "UNKNOWN".into() }]);
        assert_eq!(list[0].language, UNIVERSAL_LANGUAGE);
    }

    #[test]
    fn pages_are_prefixed() {
        let pages = model::ChapterPages { pages: vec!["/api/v1/manga/7/chapter/1/page/0".into()] };
        let data = chapter_data_from_pages(&prefs(), &pages);
        assert_eq!(data.pages[0].url, "http://srv:4567/api/v1/manga/7/chapter/1/page/0");
    }

    #[test]
    fn all_read_has_no_pointer() {
        let state = progress_state_from_chapters(&[chapter(1, 1.0, true, 0, 10), chapter(2, 2.0, true, 0, 10)]);
        assert_eq!(state.read_chapter_ids, Some(vec!["1".to_string(), "2".to_string()]));
        assert!(state.current_reading_state.is_none());
    }

    #[test]
    fn pointer_is_first_unread_in_server_order() {
        let chapters = [chapter(1, 1.0, true, 0, 8), chapter(9, 9.0, false, 3, 10), chapter(2, 2.0, false, 1, 5)];
        let state = progress_state_from_chapters(&chapters);
        assert_eq!(state.read_chapter_ids, Some(vec!["1".to_string()]));
        let current = state.current_reading_state.unwrap();
        assert_eq!(current.chapter_id, "9");
        assert_eq!(current.page, 3);
        assert_eq!(current.progress, 0.3);
        assert!(current.read_date.is_none());
    }

    #[test]
    fn pointer_date_uses_last_read_seconds() {
        let mut c = chapter(3, 3.0, false, 1, 3);
        c.last_read_at = 1_700_000_000;
        let current = progress_state_from_chapters(&[c]).current_reading_state.unwrap();
        assert_eq!(current.read_date.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(current.progress, 0.33);
    }

    #[test]
    fn progress_rounds_to_two_places() {
        assert_eq!(reading_progress(2, 3), 0.67);
        assert_eq!(reading_progress(10, 10), 1.0);
        assert_eq!(reading_progress(4, 0), 0.0);
    }

    fn ids(list: &[RemoteId]) -> Vec<u64> {
        list.iter().map(|i| i.get()).collect()
    }

    fn numbered(numbers: &[f64]) -> Vec<model::Chapter> {
        numbers.iter().map(|n| chapter(*n as u64, *n, false, 0, 0)).collect()
    }

    #[test]
    fn zero_progress_unreads_everything() {
        let plan = plan_progress_update(&numbered(&[1.0, 3.0, 5.0, 7.0]), 0.0).unwrap();
        assert!(plan.read.is_empty());
        assert_eq!(ids(&plan.unread), vec![1, 3, 5, 7]);
    }

    #[test]
    fn exact_progress_splits_at_target() {
        let plan = plan_progress_update(&numbered(&[1.0, 3.0, 5.0, 7.0]), 5.0).unwrap();
        assert_eq!(ids(&plan.read), vec![1, 3, 5]);
        assert_eq!(ids(&plan.unread), vec![7]);
    }

    #[test]
    fn progress_between_chapters_still_splits() {
        let plan = plan_progress_update(&numbered(&[1.0, 3.0, 5.0, 7.0]), 6.0).unwrap();
        assert_eq!(ids(&plan.read), vec![1, 3, 5]);
        assert_eq!(ids(&plan.unread), vec![7]);
    }

    #[test]
    fn progress_below_every_chapter_fails() {
        let err = plan_progress_update(&numbered(&[3.0, 4.0]), 2.0).unwrap_err();
        assert!(matches!(err, Error::ChapterNotFound(n) if n == 2.0));
        assert!(plan_progress_update(&[], 1.0).is_err());
    }

    #[test]
    fn track_item_reports_progress() {
        let item = track_item_from_manga(&prefs(), &manga());
        assert_eq!(item.id, "7");
        assert_eq!(item.web_url.as_deref(), Some("http://srv:4567/manga/7"));
        let entry = item.entry.unwrap();
        assert_eq!(entry.status, TrackStatus::Current);
        assert_eq!(entry.progress.last_read_chapter, 12.5);
        assert_eq!(entry.progress.max_available_chapter, Some(60.0));
    }

    #[test]
    fn track_status_from_progress() {
        assert_eq!(track_status(0.0, Some(10.0)), TrackStatus::Planned);
        assert_eq!(track_status(4.0, Some(10.0)), TrackStatus::Current);
        assert_eq!(track_status(10.0, Some(10.0)), TrackStatus::Completed);
        assert_eq!(track_status(0.0, None), TrackStatus::Planned);
    }
}
