// LRC normalization and parsing
//
// Pipeline: unescape, keep timed lines, trim credit blocks at both ends,
// parse timestamps, sort.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use super::types::{LyricCue, LyricsError};

lazy_static! {
    static ref ACCEPTED_RE: Regex = Regex::new(r"^\[(\d\d):(\d\d)\.(\d{2,3})\].*").unwrap();
    // Timed line with a colon after the bracket: "作词：...", "Composer: ..."
    static ref BANNED_RE: Regex = Regex::new(r"^.+\].+[:：].+").unwrap();
}

const INSTRUMENTAL_MARKERS: [&str; 2] = ["纯音乐，请欣赏", "酷狗音乐  就是歌多"];

/// Provider content is base64 encoded UTF-8
pub fn decode_content(content: &str) -> Result<String, LyricsError> {
    let bytes = STANDARD
        .decode(content.trim())
        .map_err(|e| LyricsError::Decode(format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| LyricsError::Decode(format!("invalid UTF-8: {}", e)))
}

pub fn is_instrumental(lyrics: &str) -> bool {
    INSTRUMENTAL_MARKERS.iter().any(|m| lyrics.contains(m))
}

/// Keep timed lines and drop credit blocks within `trim_window` lines of either end
pub fn normalize_lyrics(raw: &str, trim_window: usize) -> String {
    let unescaped = raw.replace("&apos;", "'");
    let lines: Vec<&str> = unescaped.lines().filter(|l| ACCEPTED_RE.is_match(l)).collect();

    if lines.is_empty() {
        return String::new();
    }

    // Head: the deepest banned line inside the window cuts everything up to it
    let head_limit = trim_window.min(lines.len() - 1);
    let head_cut = (0..=head_limit)
        .rev()
        .find(|&i| BANNED_RE.is_match(lines[i]))
        .map_or(0, |i| i + 1);
    let body = &lines[head_cut..];

    if body.is_empty() {
        return String::new();
    }

    // Tail: mirror image over what is left
    let last = body.len() - 1;
    let tail_start = last - trim_window.min(last);
    let tail_cut = (tail_start..=last)
        .find(|&i| BANNED_RE.is_match(body[i]))
        .unwrap_or(body.len());

    body[..tail_cut].join("\n")
}

/// Parse timed lines into cues sorted by timestamp (stable for ties)
pub fn parse_lrc_timestamps(lyrics: &str) -> Vec<LyricCue> {
    let mut cues: Vec<LyricCue> = lyrics
        .lines()
        .filter_map(|line| {
            let caps = ACCEPTED_RE.captures(line)?;
            let minutes: u64 = caps[1].parse().ok()?;
            let seconds: u64 = caps[2].parse().ok()?;
            // "5" -> 500, "05" -> 50, "050" -> 50
            let fraction = format!("{:0<3}", &caps[3]);
            let millis: u64 = fraction[..3].parse().ok()?;

            let text = line.split_once(']').map(|(_, t)| t.trim()).unwrap_or("");
            if text.is_empty() {
                return None;
            }

            Some(LyricCue::new(minutes, seconds, millis, text))
        })
        .collect();

    cues.sort_by_key(|c| c.timestamp);
    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(lines: &[&str]) -> String {
        lines.join("\n")
    }

    /// `n` timed lines, one per second; indices in `credits` become credit lines
    fn numbered(n: usize, credits: &[usize]) -> Vec<String> {
        (0..n)
            .map(|i| {
                let text = if credits.contains(&i) {
                    "Composer: X".to_string()
                } else {
                    format!("line {}", i)
                };
                format!("[{:02}:{:02}.00]{}", i / 60, i % 60, text)
            })
            .collect()
    }

    #[test]
    fn test_parse_sorts_by_timestamp() {
        let cues = parse_lrc_timestamps("[00:01.50]Hello\n[00:00.25]World");
        assert_eq!(cues.len(), 2);
        assert_eq!((cues[0].timestamp, cues[0].text.as_str()), (250, "World"));
        assert_eq!((cues[1].timestamp, cues[1].text.as_str()), (1500, "Hello"));
        assert_eq!(cues[1].time_formatted, "00:01.500");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_lrc_timestamps("").is_empty());
        assert!(normalize_lyrics("", 30).is_empty());
    }

    #[test]
    fn test_parse_skips_untimed_and_blank() {
        let cues = parse_lrc_timestamps("[ti:Title]\n[00:02.000]   \n[00:03.123]  Line  \nplain text");
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Line");
        assert_eq!(cues[0].timestamp, 3123);
    }

    #[test]
    fn test_parse_is_stable_for_ties() {
        let cues = parse_lrc_timestamps("[00:05.00]first\n[00:01.00]early\n[00:05.00]second");
        let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["early", "first", "second"]);
    }

    #[test]
    fn test_normalize_keeps_only_timed_lines() {
        let raw = "[ti:Song]\n[ar:Band]\n[00:01.00]One\r\nnot timed\n[00:10.5]bad fraction\n[00:02.00]Two";
        assert_eq!(normalize_lyrics(raw, 30), "[00:01.00]One\n[00:02.00]Two");
    }

    #[test]
    fn test_head_credit_drops_previous_lines() {
        let raw = timed(&[
            "[00:00.00]Song - Band",
            "[00:05.00]Intro line",
            "[00:10.50]作词：Someone",
            "[00:15.00]First lyric",
            "[00:20.00]Second lyric",
        ]);
        assert_eq!(
            normalize_lyrics(&raw, 30),
            "[00:15.00]First lyric\n[00:20.00]Second lyric"
        );
    }

    #[test]
    fn test_one_digit_credit_line_is_filtered_not_trimmed() {
        // "[00:10.5]" is not a timed line, so it never reaches the trim
        let raw = timed(&[
            "[00:00.00]Song - Band",
            "[00:05.00]Intro line",
            "[00:10.5]作词：Someone",
            "[00:15.00]First lyric",
        ]);
        assert_eq!(
            normalize_lyrics(&raw, 30),
            "[00:00.00]Song - Band\n[00:05.00]Intro line\n[00:15.00]First lyric"
        );
    }

    #[test]
    fn test_head_window_last_index_cuts() {
        let lines = numbered(80, &[30]);
        assert_eq!(normalize_lyrics(&lines.join("\n"), 30), lines[31..].join("\n"));
    }

    #[test]
    fn test_head_window_past_last_index_keeps() {
        let lines = numbered(80, &[31]);
        assert_eq!(normalize_lyrics(&lines.join("\n"), 30), lines.join("\n"));
    }

    #[test]
    fn test_tail_window_with_default_size() {
        // 80 lines: head scans 0..=30, tail scans 49..=79
        let lines = numbered(80, &[60]);
        assert_eq!(normalize_lyrics(&lines.join("\n"), 30), lines[..60].join("\n"));

        let lines = numbered(80, &[49]);
        assert_eq!(normalize_lyrics(&lines.join("\n"), 30), lines[..49].join("\n"));

        let lines = numbered(80, &[48]);
        assert_eq!(normalize_lyrics(&lines.join("\n"), 30), lines.join("\n"));
    }

    #[test]
    fn test_head_credit_outside_window_is_kept() {
        let raw = timed(&[
            "[00:00.00]a",
            "[00:01.00]b",
            "[00:02.00]Composer: X",
            "[00:03.00]c",
        ]);
        // window of 1 only looks at the first two lines from the head
        let normalized = normalize_lyrics(&raw, 1);
        assert!(normalized.starts_with("[00:00.00]a"));
    }

    #[test]
    fn test_tail_credit_drops_following_lines() {
        let raw = timed(&[
            "[00:01.00]Verse",
            "[00:02.00]Chorus",
            "[00:03.00]Bridge",
            "[00:04.00]Outro",
            "[03:00.00]Mixed by: Someone",
            "[03:01.00]Mastered at Studio",
        ]);
        // window of 2 keeps the head scan away from the credits
        assert_eq!(
            normalize_lyrics(&raw, 2),
            "[00:01.00]Verse\n[00:02.00]Chorus\n[00:03.00]Bridge\n[00:04.00]Outro"
        );
    }

    #[test]
    fn test_only_credits() {
        let raw = timed(&["[00:00.00]作词：A", "[00:01.00]作曲：B"]);
        assert_eq!(normalize_lyrics(&raw, 30), "");
    }

    #[test]
    fn test_apos_unescaped() {
        let normalized = normalize_lyrics("[00:01.00]Don&apos;t stop", 30);
        assert_eq!(normalized, "[00:01.00]Don't stop");
    }

    #[test]
    fn test_instrumental_markers() {
        assert!(is_instrumental("[00:00.00]纯音乐，请欣赏"));
        assert!(is_instrumental("[00:00.00]酷狗音乐  就是歌多"));
        assert!(!is_instrumental("[00:00.00]酷狗音乐 就是歌多"));
    }

    #[test]
    fn test_decode_content() {
        // "[00:01.00]你好"
        let encoded = STANDARD.encode("[00:01.00]你好");
        assert_eq!(decode_content(&encoded).unwrap(), "[00:01.00]你好");

        assert!(matches!(decode_content("@@not base64@@"), Err(LyricsError::Decode(_))));
        let bad_utf8 = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_content(&bad_utf8), Err(LyricsError::Decode(_))));
    }
}
