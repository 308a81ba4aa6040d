// KuGou lyrics backend
//
// Three JSON endpoints: song search (hash + duration), lyrics search by
// hash or keyword, and download (base64 `content`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::keyword::SearchKeyword;
use super::provider::{LyricCandidate, LyricsProvider, LyricsQuery, SongMatch};
use super::types::LyricsError;
use crate::config::LyricsConfig;

const SONG_SEARCH_URL: &str = "https://mobileservice.kugou.com/api/v3/search/song";
const LYRICS_SEARCH_URL: &str = "https://lyrics.kugou.com/search";
const DOWNLOAD_URL: &str = "https://lyrics.kugou.com/download";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct KugouProvider {
    client: Client,
    page_size: u32,
}

impl KugouProvider {
    pub fn new(config: &LyricsConfig) -> Result<Self, LyricsError> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.http_timeout));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            page_size: config.page_size,
        })
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, LyricsError> {
        let response = self.client.get(url).query(params).send().await?;

        if !response.status().is_success() {
            return Err(LyricsError::Api(format!("kugou: HTTP {}", response.status())));
        }

        // Some endpoints answer with a text/plain content type
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LyricsProvider for KugouProvider {
    fn name(&self) -> &'static str {
        "KuGou"
    }

    async fn search_songs(&self, keyword: &SearchKeyword) -> Result<Vec<SongMatch>, LyricsError> {
        let params = [
            ("version", "9108".to_string()),
            ("plat", "0".to_string()),
            ("pagesize", self.page_size.to_string()),
            ("showtype", "0".to_string()),
            ("keyword", keyword.to_string()),
        ];
        let body = self.get_json(SONG_SEARCH_URL, &params).await?;
        let songs = parse_song_matches(&body);
        debug!("[KuGou] {} song matches for '{}'", songs.len(), keyword);
        Ok(songs)
    }

    async fn search_lyrics(&self, query: LyricsQuery<'_>) -> Result<Vec<LyricCandidate>, LyricsError> {
        let mut params = vec![
            ("ver", "1".to_string()),
            ("man", "yes".to_string()),
            ("client", "pc".to_string()),
        ];
        match query {
            LyricsQuery::Hash(hash) => params.push(("hash", hash.to_string())),
            LyricsQuery::Keyword { keyword, duration_ms } => {
                params.push(("keyword", keyword.to_string()));
                if let Some(ms) = duration_ms {
                    params.push(("duration", ms.to_string()));
                }
            }
        }

        let body = self.get_json(LYRICS_SEARCH_URL, &params).await?;
        Ok(parse_candidates(&body))
    }

    async fn download(&self, candidate: &LyricCandidate) -> Result<Option<String>, LyricsError> {
        let params = [
            ("fmt", "lrc".to_string()),
            ("charset", "utf8".to_string()),
            ("client", "pc".to_string()),
            ("ver", "1".to_string()),
            ("id", candidate.id.clone()),
            ("accesskey", candidate.accesskey.clone()),
        ];
        let body = self.get_json(DOWNLOAD_URL, &params).await?;
        Ok(parse_download(&body))
    }
}

/// Ids come back as strings or numbers depending on the endpoint version
fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_song_matches(body: &Value) -> Vec<SongMatch> {
    body.pointer("/data/info")
        .and_then(Value::as_array)
        .map(|songs| {
            songs
                .iter()
                .filter_map(|song| {
                    Some(SongMatch {
                        hash: string_field(song, "hash")?,
                        duration: song
                            .get("duration")
                            .and_then(Value::as_u64)
                            .and_then(|d| u32::try_from(d).ok()),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_candidates(body: &Value) -> Vec<LyricCandidate> {
    body.get("candidates")
        .and_then(Value::as_array)
        .map(|candidates| {
            candidates
                .iter()
                .filter_map(|c| {
                    Some(LyricCandidate {
                        id: string_field(c, "id")?,
                        accesskey: string_field(c, "accesskey")?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_download(body: &Value) -> Option<String> {
    body.get("content")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
