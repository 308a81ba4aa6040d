// Typed views over catalog records

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolver::models::ThumbnailCandidate;

/// A catalog song/track record read with defaults
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    pub video_id: Option<String>,
    pub title: String,
    /// Artist names joined with ", "
    pub artists: String,
    /// `duration`, `length` or `duration_seconds`, as the catalog sent it
    pub duration: Option<Value>,
    pub year: Option<String>,
    /// `thumbnails` or `thumbnail`, catalog order (smallest first)
    pub thumbnails: Vec<ThumbnailCandidate>,
}

impl SongRecord {
    /// `fallback_artist` replaces the "Unknown Artist" default
    pub fn from_value(item: &Value, fallback_artist: Option<&str>) -> Self {
        let artists = item["artists"]
            .as_array()
            .map(|list| {
                list.iter()
                    .map(|a| a["name"].as_str().unwrap_or("Unknown"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let artists = if artists.is_empty() {
            fallback_artist.unwrap_or("Unknown Artist").to_string()
        } else {
            artists
        };

        let duration = ["duration", "length", "duration_seconds"]
            .iter()
            .map(|key| &item[*key])
            .find(|v| !v.is_null())
            .cloned();

        let year = match &item["year"] {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };

        let thumbnails = if item["thumbnails"].is_array() {
            ThumbnailCandidate::list_from_value(&item["thumbnails"])
        } else {
            ThumbnailCandidate::list_from_value(&item["thumbnail"])
        };

        Self {
            video_id: item["videoId"]
                .as_str()
                .filter(|id| !id.is_empty())
                .map(|id| id.to_string()),
            title: item["title"].as_str().unwrap_or("Unknown Title").to_string(),
            artists,
            duration,
            year,
            thumbnails,
        }
    }

    /// Names of the artists, lowercased, for matching
    pub fn artist_names_lower(item: &Value) -> Vec<String> {
        item["artists"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|a| a["name"].as_str())
                    .map(|n| n.to_lowercase())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Assembled song record produced by the aggregators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    pub title: String,
    pub artists: String,
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_original: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
}

impl SongDetails {
    /// Base record; `None` when the item has no video id
    pub fn from_record(record: &SongRecord) -> Option<Self> {
        Some(Self {
            title: record.title.clone(),
            artists: record.artists.clone(),
            video_id: record.video_id.clone()?,
            duration: record.duration.clone(),
            year: record.year.clone(),
            album_art: None,
            audio_url: None,
            is_original: None,
            artist_name: None,
        })
    }
}
