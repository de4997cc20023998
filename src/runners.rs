//! Runner facades the host loads: a content source and a tracker, both
//! backed by the same server settings.

mod settings;
mod source;
mod tracker;

pub use settings::{connection_sections, update_preference};
pub use source::SuwayomiSource;
pub use tracker::SuwayomiTracker;

use runner_interface::{NetworkRequest, HttpMethod};

use crate::preferences::Preferences;
use crate::transport::auth_headers;

const WEBSITE: &str = "https://github.com/Suwayomi/Suwayomi-Server";
const THUMBNAIL: &str = "suwayomi.png";

/// Image fetch with the server credentials attached; the server guards
/// image bytes with the same Basic auth as the API.
pub(crate) fn image_request(prefs: &Preferences, image_url: &str) -> NetworkRequest {
    NetworkRequest {
        url: image_url.to_string(),
        method: HttpMethod::Get,
        headers: auth_headers(prefs),
        body: None,
    }
}
