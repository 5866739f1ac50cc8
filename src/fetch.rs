use crate::error::{FetchError, HttpError, ImageLoadError};
use crate::images::Sprite;
use crate::models::Pokemon;
use crate::ports::{ImageLoaderPort, JsonHttpPort};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Looks up one Pokémon per call. No caching, no retries.
#[derive(Clone)]
pub struct PokemonFetcher {
    http: Arc<dyn JsonHttpPort>,
    base: Url,
}

impl PokemonFetcher {
    pub fn new(http: Arc<dyn JsonHttpPort>, base: Url) -> Self {
        Self { http, base }
    }

    /// `<base>/<query>`, with the query pushed as a single path segment.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(query);
        }
        url
    }

    pub async fn fetch(&self, query: &str) -> Result<Pokemon, FetchError> {
        let url = self.request_url(query);
        tracing::debug!(%url, "fetching pokemon");
        let body = self.http.get_json(&url).await?;
        serde_json::from_value(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

/// `reqwest`-backed implementation of the network ports.
#[derive(Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn get_ok(&self, url: impl reqwest::IntoUrl) -> Result<reqwest::Response, HttpError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        let status = res.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }
        Ok(res)
    }
}

fn body_error(e: reqwest::Error) -> HttpError {
    if e.is_decode() {
        HttpError::Body(e.to_string())
    } else {
        HttpError::Transport(e.to_string())
    }
}

#[async_trait]
impl JsonHttpPort for HttpClient {
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, HttpError> {
        let res = self.get_ok(url.clone()).await?;
        res.json::<serde_json::Value>().await.map_err(body_error)
    }
}

#[async_trait]
impl ImageLoaderPort for HttpClient {
    async fn load(&self, url: &str) -> Result<Sprite, ImageLoadError> {
        let res = self.get_ok(url).await?;
        let bytes = res.bytes().await.map_err(body_error)?;
        Sprite::decode(&bytes)
    }
}
