// Search keyword normalization
//
// Bracketed decorations ("(Live)", "《...》") and mixed artist separators
// make the provider's search miss, so both are stripped first.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref TITLE_NOISE_RE: Regex =
        Regex::new(r"\(.*\)|（.*）|「.*」|『.*』|<.*>|《.*》|〈.*〉|＜.*＞").unwrap();
    static ref ARTIST_SEPARATOR_RE: Regex = Regex::new(r", | & |\.|和").unwrap();
    static ref ARTIST_NOISE_RE: Regex = Regex::new(r"\(.*\)|（.*）").unwrap();
}

/// Normalized title/artist pair used for provider searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeyword {
    pub title: String,
    pub artist: String,
}

impl SearchKeyword {
    pub fn new(title: &str, artist: &str) -> Self {
        Self {
            title: normalize_title(title),
            artist: normalize_artist(artist),
        }
    }
}

impl fmt::Display for SearchKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

pub fn normalize_title(title: &str) -> String {
    TITLE_NOISE_RE.replace_all(title, "").trim().to_string()
}

pub fn normalize_artist(artist: &str) -> String {
    let joined = ARTIST_SEPARATOR_RE.replace_all(artist, "、");
    ARTIST_NOISE_RE.replace_all(&joined, "").trim().to_string()
}
