//! HTTP client for the now-playing server and the lyrics API.

pub mod models;

use anyhow::Context;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::ServerConfig;
use crate::lyrics::{self, LyricsDocument};
use models::CurrentSong;

#[derive(Debug, Clone)]
pub struct NowPlayingClient {
    http: reqwest::Client,
    now_playing_url: String,
    lyrics_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl NowPlayingClient {
    const USER_AGENT: &'static str = concat!("nowlyrics/", env!("CARGO_PKG_VERSION"));

    pub fn new(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            http,
            now_playing_url: trim_trailing_slash(&cfg.now_playing_url).to_string(),
            lyrics_url: trim_trailing_slash(&cfg.lyrics_url).to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
        })
    }

    fn authed_get(&self, url: &str) -> reqwest::RequestBuilder {
        let rb = self.http.get(url);
        match &self.username {
            Some(user) => rb.basic_auth(user, self.password.as_deref()),
            None => rb,
        }
    }

    pub async fn current_song(&self) -> anyhow::Result<CurrentSong> {
        let url = format!("{}/playback/current", self.now_playing_url);
        tracing::debug!(%url, "fetching current song");

        let response = self
            .authed_get(&url)
            .send()
            .await
            .context("send current song request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error! Status: {}", response.status().as_u16());
        }

        response.json().await.context("parse current song json")
    }

    /// Raw lyrics response text, unparsed. The body may carry server notices
    /// ahead of the JSON; see [`lyrics::recover`].
    pub async fn lyrics_body(&self, track_id: &str) -> anyhow::Result<String> {
        let url = format!("{}/?trackid={}", self.lyrics_url, urlencoding::encode(track_id));
        tracing::debug!(%url, "fetching lyrics");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("send lyrics request")?;

        if !response.status().is_success() {
            anyhow::bail!("lyrics API error: {}", response.status());
        }

        response.text().await.context("read lyrics body")
    }

    /// Fetch and synchronize lyrics for a track.
    ///
    /// A body with no recoverable payload surfaces as
    /// [`lyrics::LyricsError::PayloadNotFound`] in the error chain.
    pub async fn fetch_lyrics(&self, track_id: &str) -> anyhow::Result<LyricsDocument> {
        let body = self.lyrics_body(track_id).await?;
        let doc = lyrics::from_body(&body)?;
        tracing::debug!(track_id, lines = doc.len(), sync_type = %doc.sync_type, "fetched lyrics");
        Ok(doc)
    }
}

fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(trim_trailing_slash("http://host:8080/"), "http://host:8080");
        assert_eq!(trim_trailing_slash("http://host:8080"), "http://host:8080");
        assert_eq!(trim_trailing_slash("http://host//"), "http://host/");
        assert_eq!(trim_trailing_slash(""), "");
    }

    #[test]
    fn test_new_from_config() {
        let cfg = ServerConfig {
            now_playing_url: "http://localhost:8888/".to_string(),
            lyrics_url: "http://localhost:8080".to_string(),
            username: Some("me".to_string()),
            password: None,
            timeout_secs: 5,
        };
        let client = NowPlayingClient::new(&cfg).unwrap();
        assert_eq!(client.now_playing_url, "http://localhost:8888");
        assert_eq!(client.lyrics_url, "http://localhost:8080");
    }

    #[test]
    fn test_payload_not_found_is_downcastable() {
        let err: anyhow::Error = lyrics::from_body("Fatal error").unwrap_err().into();
        assert!(matches!(
            err.downcast_ref::<lyrics::LyricsError>(),
            Some(lyrics::LyricsError::PayloadNotFound)
        ));
    }
}
