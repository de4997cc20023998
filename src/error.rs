use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The host's network client failed before a body came back.
    #[error("request to {url} failed: {source:#}")]
    Transport { url: String, source: anyhow::Error },

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope had no `data`; any GraphQL error messages are kept.
    #[error("server returned no data{}", format_messages(.0))]
    EmptyResponse(Vec<String>),

    #[error("invalid identifier `{0}`: expected a non-negative integer")]
    InvalidId(String),

    #[error("no chapter with number {0} found")]
    ChapterNotFound(f64),

    #[error("{0} is not supported by Suwayomi")]
    Unsupported(&'static str),

    #[error("unknown preference `{0}`")]
    UnknownPreference(String),

    #[error("invalid value for preference `{id}`: {reason}")]
    InvalidPreference { id: String, reason: String },

    #[error("form field `{0}` is missing or not a number")]
    InvalidFormField(String),

    #[error("preference store: {0}")]
    Store(String),
}

fn format_messages(messages: &[String]) -> String {
    if messages.is_empty() { String::new() } else { format!(": {}", messages.join("; ")) }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::Store(e.to_string()) }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self { Error::Store(e.to_string()) }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self { Error::Store(e.to_string()) }
}
