//! Shapes of the GraphQL `data` payloads, as the server sends them.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub mangas: Nodes<MangaSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesData {
    pub categories: Nodes<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    pub mangas: Nodes<MangaSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaSource {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNumber {
    pub chapter_number: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manga {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: Vec<String>,
    #[serde(default)]
    pub source: Option<MangaSource>,
    #[serde(default)]
    pub highest_numbered_chapter: Option<ChapterNumber>,
    #[serde(default)]
    pub latest_read_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MangaData {
    pub manga: Manga,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: u64,
    pub name: String,
    pub chapter_number: f64,
    /// Epoch milliseconds, sent as a string.
    #[serde(default, deserialize_with = "long_string")]
    pub upload_date: i64,
    #[serde(default)]
    pub scanlator: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub last_page_read: i64,
    /// Epoch seconds, sent as a string. 0 when never read.
    #[serde(default, deserialize_with = "long_string")]
    pub last_read_at: i64,
    #[serde(default)]
    pub page_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaChapters {
    pub id: u64,
    #[serde(default)]
    pub source: Option<MangaSource>,
    pub chapters: Nodes<Chapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MangaChaptersData {
    pub manga: MangaChapters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterPages {
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPagesData {
    pub fetch_chapter_pages: ChapterPages,
}

/// Reply to `updateChapters`; only checked for shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChaptersData {
    pub update_chapters: serde_json::Value,
}

/// Suwayomi encodes longs as strings, but accept bare numbers and null too.
fn long_string<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }
    match Option::<Raw>::deserialize(d)? {
        None => Ok(0),
        Some(Raw::Num(n)) => Ok(n),
        Some(Raw::Str(s)) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
