// Data models for media resolution
//
// Everything here is parsed out of yt-dlp's `--dump-json` output with
// defaults for missing fields. A malformed field never fails the parse.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Requested audio quality tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AudioQuality {
    Low,
    Med,
    #[default]
    High,
    VeryHigh,
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Med => write!(f, "med"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// Requested artwork quality tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailQuality {
    Low,
    Med,
    #[default]
    High,
    VeryHigh,
}

impl ThumbnailQuality {
    /// Edge length in pixels of the square image for this tier
    pub fn pixel_size(&self) -> u32 {
        match self {
            Self::Low => 60,
            Self::Med => 120,
            Self::High => 320,
            Self::VeryHigh => 544,
        }
    }

    /// Size token as used by the image hosts, e.g. `w320-h320`
    pub fn size_token(&self) -> String {
        let px = self.pixel_size();
        format!("w{}-h{}", px, px)
    }
}

impl fmt::Display for ThumbnailQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Med => write!(f, "med"),
            Self::High => write!(f, "high"),
            Self::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// One stream entry of an extraction result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamCandidate {
    pub url: Option<String>,
    /// Audio bitrate in kbps
    pub abr: Option<f64>,
    /// Total bitrate in kbps
    pub tbr: Option<f64>,
    /// Audio codec (mp4a, opus, none)
    pub acodec: Option<String>,
    pub ext: Option<String>,
    pub format_id: Option<String>,
    pub has_drm: bool,
}

impl StreamCandidate {
    pub fn from_value(v: &Value) -> Self {
        Self {
            url: v["url"].as_str().map(|s| s.to_string()),
            abr: v["abr"].as_f64(),
            tbr: v["tbr"].as_f64(),
            acodec: v["acodec"].as_str().map(|s| s.to_string()),
            ext: v["ext"].as_str().map(|s| s.to_string()),
            format_id: v["format_id"].as_str().map(|s| s.to_string()),
            has_drm: is_truthy(&v["has_drm"]) || is_truthy(&v["drm"]),
        }
    }

    /// Ranking key: abr, then tbr, then zero. Zero bitrates fall through.
    pub fn bitrate(&self) -> f64 {
        match (self.abr, self.tbr) {
            (Some(abr), _) if abr > 0.0 => abr,
            (_, Some(tbr)) if tbr > 0.0 => tbr,
            _ => 0.0,
        }
    }

    /// Direct, audio-bearing URL that is not a manifest
    pub fn is_streamable(&self) -> bool {
        if self.acodec.as_deref() == Some("none") {
            return false;
        }

        match self.url.as_deref() {
            Some(url) if !url.is_empty() => {
                let lower = url.to_lowercase();
                !lower.contains("manifest") && !lower.contains(".m3u8")
            }
            _ => false,
        }
    }
}

/// Thumbnail entry (catalog or extractor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailCandidate {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// Entries without a URL are dropped
    pub fn from_value(v: &Value) -> Option<Self> {
        let url = v["url"].as_str()?;
        Some(Self {
            url: url.to_string(),
            width: v["width"].as_u64().unwrap_or(0) as u32,
            height: v["height"].as_u64().unwrap_or(0) as u32,
        })
    }

    pub fn list_from_value(v: &Value) -> Vec<Self> {
        v.as_array()
            .map(|items| items.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// `|1 - w/h|`, infinite when the height is unknown
    pub fn squareness(&self) -> f64 {
        if self.height == 0 {
            return f64::INFINITY;
        }
        (1.0 - self.width as f64 / self.height as f64).abs()
    }
}

/// Parsed extraction result for one content id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedMedia {
    pub id: String,
    pub title: String,
    pub uploader: Option<String>,
    pub uploader_avatar: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    /// Non-empty values of album_art, album_artwork, artwork, cover (in that order)
    pub explicit_artwork: Vec<String>,
    pub is_live: bool,
    pub availability: Option<String>,
    pub drm: bool,
    pub formats: Option<Vec<StreamCandidate>>,
    pub requested_formats: Option<Vec<StreamCandidate>>,
    /// The media itself seen as a stream (used when no format list exists)
    pub direct: StreamCandidate,
    pub thumbnails: Vec<ThumbnailCandidate>,
}

const ARTWORK_FIELDS: [&str; 4] = ["album_art", "album_artwork", "artwork", "cover"];

impl ExtractedMedia {
    /// Build from a yt-dlp JSON document
    pub fn from_json(json: &Value) -> Self {
        let format_list = |key: &str| {
            json[key]
                .as_array()
                .map(|items| items.iter().map(StreamCandidate::from_value).collect())
        };

        let explicit_artwork = ARTWORK_FIELDS
            .iter()
            .filter_map(|field| json[*field].as_str())
            .filter(|url| !url.is_empty())
            .map(|url| url.to_string())
            .collect();

        Self {
            id: json["id"].as_str().unwrap_or("unknown").to_string(),
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            uploader: non_empty(&json["uploader"]),
            uploader_avatar: non_empty(&json["uploader_avatar_url"]),
            album: non_empty(&json["album"]),
            album_artist: non_empty(&json["album_artist"]),
            explicit_artwork,
            is_live: is_truthy(&json["is_live"]),
            availability: json["availability"].as_str().map(|s| s.to_string()),
            drm: is_truthy(&json["drm"]) || is_truthy(&json["has_drm"]),
            formats: format_list("formats"),
            requested_formats: format_list("requested_formats"),
            direct: StreamCandidate::from_value(json),
            thumbnails: ThumbnailCandidate::list_from_value(&json["thumbnails"]),
        }
    }

    /// `formats`, else `requested_formats`, else the media itself
    pub fn stream_candidates(&self) -> Vec<&StreamCandidate> {
        if let Some(formats) = &self.formats {
            return formats.iter().collect();
        }
        if let Some(requested) = &self.requested_formats {
            return requested.iter().collect();
        }
        vec![&self.direct]
    }

    /// DRM marker on the media or on any listed format
    pub fn has_drm(&self) -> bool {
        self.drm
            || self
                .formats
                .iter()
                .chain(self.requested_formats.iter())
                .flatten()
                .any(|f| f.has_drm)
    }

    pub fn is_unplayable(&self) -> bool {
        self.is_live || self.availability.as_deref() == Some("unavailable")
    }
}

fn non_empty(v: &Value) -> Option<String> {
    v.as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// yt-dlp emits flags as bools, ints or strings depending on the extractor
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bitrate_falls_through_zero_abr() {
        let c = StreamCandidate::from_value(&json!({"url": "https://a", "abr": 0, "tbr": 96.5}));
        assert_eq!(c.bitrate(), 96.5);

        let none = StreamCandidate::from_value(&json!({"url": "https://a"}));
        assert_eq!(none.bitrate(), 0.0);
    }

    #[test]
    fn test_streamable_rules() {
        let ok = StreamCandidate::from_value(&json!({"url": "https://cdn/a.m4a", "acodec": "mp4a.40.2"}));
        assert!(ok.is_streamable());

        // A missing codec is not the "none" placeholder
        let no_codec = StreamCandidate::from_value(&json!({"url": "https://cdn/a"}));
        assert!(no_codec.is_streamable());

        let video_only = StreamCandidate::from_value(&json!({"url": "https://cdn/v", "acodec": "none"}));
        assert!(!video_only.is_streamable());

        let hls = StreamCandidate::from_value(&json!({"url": "https://cdn/x/INDEX.M3U8"}));
        assert!(!hls.is_streamable());

        let manifest = StreamCandidate::from_value(&json!({"url": "https://cdn/api/manifest/dash"}));
        assert!(!manifest.is_streamable());

        let empty = StreamCandidate::from_value(&json!({"url": ""}));
        assert!(!empty.is_streamable());
    }

    #[test]
    fn test_candidate_source_order() {
        let with_formats = ExtractedMedia::from_json(&json!({
            "url": "https://top",
            "formats": [{"url": "https://f1"}],
            "requested_formats": [{"url": "https://r1"}]
        }));
        let urls: Vec<_> = with_formats
            .stream_candidates()
            .iter()
            .map(|c| c.url.clone().unwrap_or_default())
            .collect();
        assert_eq!(urls, vec!["https://f1"]);

        let requested_only = ExtractedMedia::from_json(&json!({
            "url": "https://top",
            "requested_formats": [{"url": "https://r1"}]
        }));
        assert_eq!(
            requested_only.stream_candidates()[0].url.as_deref(),
            Some("https://r1")
        );

        let bare = ExtractedMedia::from_json(&json!({"url": "https://top"}));
        assert_eq!(bare.stream_candidates()[0].url.as_deref(), Some("https://top"));
    }

    #[test]
    fn test_drm_anywhere() {
        let media = ExtractedMedia::from_json(&json!({
            "formats": [{"url": "https://a"}, {"url": "https://b", "has_drm": true}]
        }));
        assert!(media.has_drm());

        let clean = ExtractedMedia::from_json(&json!({"formats": [{"url": "https://a", "has_drm": false}]}));
        assert!(!clean.has_drm());
    }

    #[test]
    fn test_unplayable() {
        assert!(ExtractedMedia::from_json(&json!({"is_live": true})).is_unplayable());
        assert!(ExtractedMedia::from_json(&json!({"availability": "unavailable"})).is_unplayable());
        assert!(!ExtractedMedia::from_json(&json!({"availability": "public"})).is_unplayable());
    }

    #[test]
    fn test_squareness() {
        assert_eq!(ThumbnailCandidate::new("a", 544, 544).squareness(), 0.0);
        assert!(ThumbnailCandidate::new("a", 100, 0).squareness().is_infinite());
        assert!((ThumbnailCandidate::new("a", 1280, 720).squareness() - 0.7777).abs() < 0.001);
    }

    #[test]
    fn test_size_tokens() {
        assert_eq!(ThumbnailQuality::Low.size_token(), "w60-h60");
        assert_eq!(ThumbnailQuality::VeryHigh.size_token(), "w544-h544");
    }

    #[test]
    fn test_missing_fields_default() {
        let media = ExtractedMedia::from_json(&json!({"thumbnails": [{"width": 10}], "album_art": ""}));
        assert_eq!(media.title, "Unknown");
        assert!(media.thumbnails.is_empty());
        assert!(media.explicit_artwork.is_empty());
        assert!(!media.has_drm());
    }
}
