use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const URL_KEY: &str = "suwayomi_url";
pub const USERNAME_KEY: &str = "suwayomi_username";
pub const PASSWORD_KEY: &str = "suwayomi_password";
pub const TRACK_KEY: &str = "suwayomi_track";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4567";
const API_PATH: &str = "/api/graphql";

/// Persistent key-value store the runners keep their settings in.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn string(&self, key: &str) -> Result<Option<String>>;
    async fn boolean(&self, key: &str) -> Result<Option<bool>>;
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;
    async fn set_boolean(&self, key: &str, value: bool) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Settings snapshot, read once per operation and passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Report server-side read state to the host.
    pub track: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), username: String::new(), password: String::new(), track: false }
    }
}

impl Preferences {
    pub async fn load(store: &dyn PreferenceStore) -> Result<Self> {
        Ok(Self {
            base_url: store.string(URL_KEY).await?.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            username: store.string(USERNAME_KEY).await?.unwrap_or_default(),
            password: store.string(PASSWORD_KEY).await?.unwrap_or_default(),
            track: store.boolean(TRACK_KEY).await?.unwrap_or(false),
        })
    }

    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url, API_PATH)
    }

    /// Make a server-relative path absolute. Plain concatenation.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Stored {
    Bool(bool),
    Text(String),
}

impl Stored {
    fn text(&self) -> Option<String> {
        match self { Stored::Text(s) => Some(s.clone()), Stored::Bool(_) => None }
    }

    fn flag(&self) -> Option<bool> {
        match self {
            Stored::Bool(b) => Some(*b),
            Stored::Text(s) => s.parse().ok(),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, Stored>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    fn get(&self, key: &str) -> Option<Stored> {
        self.values.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn put(&self, key: &str, value: Option<Stored>) {
        let mut map = self.values.write().unwrap_or_else(|e| e.into_inner());
        match value {
            Some(v) => { map.insert(key.to_string(), v); }
            None => { map.remove(key); }
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn string(&self, key: &str) -> Result<Option<String>> { Ok(self.get(key).and_then(|v| v.text())) }
    async fn boolean(&self, key: &str) -> Result<Option<bool>> { Ok(self.get(key).and_then(|v| v.flag())) }
    async fn set_string(&self, key: &str, value: &str) -> Result<()> { self.put(key, Some(Stored::Text(value.to_string()))); Ok(()) }
    async fn set_boolean(&self, key: &str, value: bool) -> Result<()> { self.put(key, Some(Stored::Bool(value))); Ok(()) }
    async fn remove(&self, key: &str) -> Result<()> { self.put(key, None); Ok(()) }
}

/// TOML file of `key = value` pairs. Re-read on every access so edits
/// made elsewhere are picked up; writes rewrite the whole file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// `<config dir>/preferences.toml` for this platform.
    pub fn default_path() -> Result<PathBuf> {
        let proj = ProjectDirs::from("dev", "suwayomi-runners", "suwayomi-runners")
            .ok_or_else(|| Error::Store("unable to determine config directory".into()))?;
        Ok(proj.config_dir().join("preferences.toml"))
    }

    pub fn path(&self) -> &Path { &self.path }

    async fn read(&self) -> Result<BTreeMap<String, Stored>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, key: &str, value: Option<Stored>) -> Result<()> {
        let mut map = self.read().await?;
        match value {
            Some(v) => { map.insert(key.to_string(), v); }
            None => { map.remove(key); }
        }
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, toml::to_string(&map)?).await?;
        debug!(key, path = %self.path.display(), "preference written");
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read().await?.get(key).and_then(Stored::text))
    }

    async fn boolean(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.read().await?.get(key).and_then(Stored::flag))
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.update(key, Some(Stored::Text(value.to_string()))).await
    }

    async fn set_boolean(&self, key: &str, value: bool) -> Result<()> {
        self.update(key, Some(Stored::Bool(value))).await
    }

    async fn remove(&self, key: &str) -> Result<()> { self.update(key, None).await }
}
