use runner_interface::{FieldValue, FormField, FormSection};
use tracing::info;
use url::Url;

use crate::error::{Error, Result};
use crate::preferences::{PreferenceStore, Preferences, PASSWORD_KEY, TRACK_KEY, URL_KEY, USERNAME_KEY};

fn text_field(id: &str, title: &str, value: &str, secure: bool) -> FormField {
    FormField::TextField { id: id.into(), title: title.into(), value: value.into(), secure }
}

/// Server URL, username and password sections shared by every runner.
pub fn connection_sections(prefs: &Preferences) -> Vec<FormSection> {
    vec![
        FormSection {
            header: Some("Server URL".into()),
            footer: Some("The URL of the Suwayomi server".into()),
            children: vec![text_field(URL_KEY, "URL:", &prefs.base_url, false)],
        },
        FormSection {
            header: Some("Username".into()),
            footer: Some("Suwayomi username, if set".into()),
            children: vec![text_field(USERNAME_KEY, "Username:", &prefs.username, false)],
        },
        FormSection {
            header: Some("Password".into()),
            footer: None,
            children: vec![text_field(PASSWORD_KEY, "Password:", &prefs.password, true)],
        },
    ]
}

pub(crate) fn tracking_section(prefs: &Preferences) -> FormSection {
    FormSection {
        header: Some("Progress Sync".into()),
        footer: Some("Report chapters read on the server as read here".into()),
        children: vec![FormField::Toggle { id: TRACK_KEY.into(), title: "Sync read chapters".into(), value: prefs.track }],
    }
}

fn invalid(id: &str, reason: impl Into<String>) -> Error {
    Error::InvalidPreference { id: id.to_string(), reason: reason.into() }
}

fn text<'a>(id: &str, value: &'a FieldValue) -> Result<&'a str> {
    value.as_str().ok_or_else(|| invalid(id, "expected text"))
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| invalid(URL_KEY, e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid(URL_KEY, "expected an http(s) URL"));
    }
    Ok(trimmed.to_string())
}

/// Validate and persist a value edited in a preference form.
pub async fn update_preference(store: &dyn PreferenceStore, id: &str, value: &FieldValue) -> Result<()> {
    match id {
        URL_KEY => {
            let url = normalize_base_url(text(id, value)?)?;
            store.set_string(URL_KEY, &url).await?;
        }
        USERNAME_KEY | PASSWORD_KEY => store.set_string(id, text(id, value)?).await?,
        TRACK_KEY => {
            let on = value.as_bool().ok_or_else(|| invalid(id, "expected a toggle value"))?;
            store.set_boolean(TRACK_KEY, on).await?;
        }
        other => return Err(Error::UnknownPreference(other.to_string())),
    }
    info!(preference = id, "preference updated");
    Ok(())
}
