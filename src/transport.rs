use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use runner_interface::{HttpMethod, NetworkClient, NetworkRequest, NetworkResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::preferences::Preferences;

/// Credentials part of a Basic `authorization` header: base64 of
/// `username:password`, or empty when either half is missing.
pub fn auth_credentials(username: &str, password: &str) -> String {
    if username.is_empty() || password.is_empty() {
        return String::new();
    }
    STANDARD.encode(format!("{username}:{password}"))
}

/// Full header value. Always `Basic ...`, even with no credentials.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", auth_credentials(username, password))
}

pub(crate) fn auth_headers(prefs: &Preferences) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("authorization".to_string(), basic_auth_header(&prefs.username, &prefs.password));
    headers
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// Build the POST for a GraphQL document.
pub fn graphql_request(prefs: &Preferences, query: &str) -> NetworkRequest {
    let mut headers = auth_headers(prefs);
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    NetworkRequest {
        url: prefs.api_url(),
        method: HttpMethod::Post,
        headers,
        body: Some(serde_json::json!({ "query": query })),
    }
}

/// POST `query` to the server and deserialize the envelope's `data`.
///
/// The HTTP status is not looked at: a JSON body is unwrapped the same
/// way whatever the status, and only transport failures or bodies that
/// do not parse surface as errors.
pub async fn post<T: DeserializeOwned>(client: &dyn NetworkClient, prefs: &Preferences, query: &str) -> Result<T> {
    let request = graphql_request(prefs, query);
    let url = request.url.clone();
    debug!(%url, "graphql request");
    let response = client
        .request(request)
        .await
        .map_err(|source| Error::Transport { url: url.clone(), source })?;
    debug!(%url, status = response.status, bytes = response.data.len(), "graphql response");
    unwrap_data(&response.data)
}

pub(crate) fn unwrap_data<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope = serde_json::from_str(body)?;
    match envelope.data {
        Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
        _ => Err(Error::EmptyResponse(envelope.errors.into_iter().map(|e| e.message).collect())),
    }
}

/// [`NetworkClient`] backed by reqwest, for use outside a host app.
#[derive(Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self { Self::default() }

    pub fn with_client(inner: reqwest::Client) -> Self { Self { inner } }
}

#[async_trait]
impl NetworkClient for ReqwestClient {
    async fn request(&self, request: NetworkRequest) -> anyhow::Result<NetworkResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(&request.url),
            HttpMethod::Post => self.inner.post(&request.url),
        };
        for (k, v) in &request.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let resp = builder.send().await.with_context(|| format!("sending request to {}", request.url))?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let data = resp.text().await.with_context(|| format!("reading body from {}", request.url))?;
        Ok(NetworkResponse { status, headers, data })
    }
}
