//! GraphQL documents sent to the Suwayomi server.
//!
//! Documents are plain strings with values interpolated. Identifiers go
//! through [`RemoteId`] first so only integers ever reach a document, and
//! search text is emitted as an escaped string literal.

mod mutations;
mod queries;

pub use mutations::*;
pub use queries::*;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Numeric id of a manga or chapter on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteId(u64);

impl RemoteId {
    pub fn new(id: u64) -> Self { Self(id) }

    pub fn parse(raw: &str) -> Result<Self> { raw.parse() }

    pub fn get(self) -> u64 { self.0 }
}

impl FromStr for RemoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidId(s.to_string()));
        }
        t.parse().map(Self).map_err(|_| Error::InvalidId(s.to_string()))
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Render text as a GraphQL string literal. JSON string syntax is a
/// subset of GraphQL's, so serde_json does the escaping.
pub(crate) fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn id_list(ids: &[RemoteId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
