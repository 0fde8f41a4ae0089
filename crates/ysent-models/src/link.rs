//! Link parsing for YouTube video and channel references.
//!
//! Turns an arbitrary user-pasted string into a [`LinkRef`] without any
//! network access. Forms that need a lookup (handles, legacy custom names)
//! are returned as such; the resolver in `ysent-youtube` finishes the job.
//!
//! Recognized forms, checked in this order (first match wins):
//! 1. Literal channel ID (`UC` followed by at least 20 ID characters)
//! 2. `watch?v=VIDEO_ID` query parameter
//! 3. `youtu.be/VIDEO_ID`
//! 4. Path segment (`/shorts/`, `/embed/`, `/live/`, `/v/`)
//! 5. `@handle`
//! 6. Legacy `/user/NAME` or `/c/NAME`
//! 7. `/channel/CHANNEL_ID`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every channel ID.
const CHANNEL_ID_PREFIX: &str = "UC";

/// Minimum number of ID characters after the channel prefix.
const CHANNEL_ID_MIN_BODY: usize = 20;

/// Video IDs are exactly this long.
const VIDEO_ID_LEN: usize = 11;

/// Path prefixes that carry a video ID as the next segment.
const VIDEO_PATH_PREFIXES: &[&str] = &["/shorts/", "/embed/", "/live/", "/v/"];

/// Hosts accepted when the input carries an explicit host.
const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
    "www.youtu.be",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

/// What a link points at, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LinkRef {
    /// Channel ID known without lookup
    ChannelId(String),
    /// Video ID known without lookup
    VideoId(String),
    /// `@handle`, needs a search lookup
    Handle(String),
    /// Legacy `/user/` or `/c/` name, needs a search lookup
    CustomName(String),
}

/// Errors that can occur while parsing a link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Link is empty")]
    Empty,

    #[error("Host is not a YouTube domain: {0}")]
    NotYoutube(String),

    #[error("Video ID has invalid format: {0}")]
    InvalidVideoId(String),

    #[error("Could not recognize a video or channel in: {0}")]
    Unrecognized(String),
}

/// Parse a link into a [`LinkRef`].
pub fn parse_link(input: &str) -> Result<LinkRef, LinkError> {
    let link = input.trim();
    if link.is_empty() {
        return Err(LinkError::Empty);
    }

    if let Some(host) = explicit_host(link) {
        if !YOUTUBE_HOSTS.contains(&host.as_str()) {
            return Err(LinkError::NotYoutube(host));
        }
    }

    if is_channel_id(link) {
        return Ok(LinkRef::ChannelId(link.to_string()));
    }

    if let Some(id) = extract_from_watch_url(link) {
        return validate_video_id(id).map(LinkRef::VideoId);
    }

    if let Some(id) = extract_from_short_url(link) {
        return validate_video_id(id).map(LinkRef::VideoId);
    }

    if let Some(id) = extract_from_video_path(link) {
        return validate_video_id(id).map(LinkRef::VideoId);
    }

    if let Some(handle) = extract_handle(link) {
        return Ok(LinkRef::Handle(handle));
    }

    if let Some(name) = segment_after(link, "/user/").or_else(|| segment_after(link, "/c/")) {
        return Ok(LinkRef::CustomName(name));
    }

    if let Some(id) = segment_after(link, "/channel/") {
        return Ok(LinkRef::ChannelId(id));
    }

    Err(LinkError::Unrecognized(link.to_string()))
}

/// Check whether the whole string is a literal channel ID.
pub fn is_channel_id(s: &str) -> bool {
    match s.strip_prefix(CHANNEL_ID_PREFIX) {
        Some(body) => body.len() >= CHANNEL_ID_MIN_BODY && is_valid_id_chars(body),
        None => false,
    }
}

/// Lower-cased host of the input, when it carries one.
fn explicit_host(link: &str) -> Option<String> {
    let candidate = if link.contains("://") {
        link.to_string()
    } else if link.to_ascii_lowercase().starts_with("www.") {
        format!("https://{}", link)
    } else {
        return None;
    };

    url::Url::parse(&candidate)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Extract ID from `watch?v=VIDEO_ID` or `&v=VIDEO_ID`.
fn extract_from_watch_url(link: &str) -> Option<String> {
    ["?v=", "&v="]
        .iter()
        .find_map(|marker| link.find(marker).map(|pos| &link[pos + marker.len()..]))
        .and_then(extract_id_from_segment)
}

/// Extract ID from `youtu.be/VIDEO_ID`.
fn extract_from_short_url(link: &str) -> Option<String> {
    let lower = link.to_ascii_lowercase();
    lower
        .find("youtu.be/")
        .and_then(|pos| extract_id_from_segment(&link[pos + "youtu.be/".len()..]))
}

/// Extract ID from `/shorts/VIDEO_ID` and friends.
fn extract_from_video_path(link: &str) -> Option<String> {
    VIDEO_PATH_PREFIXES
        .iter()
        .find_map(|prefix| segment_after(link, prefix))
}

/// Extract the handle from `/@handle` or a bare `@handle`.
fn extract_handle(link: &str) -> Option<String> {
    let rest = if let Some(pos) = link.find("/@") {
        &link[pos + 2..]
    } else {
        link.strip_prefix('@')?
    };
    extract_id_from_segment(rest)
}

/// The non-empty segment following `marker`, if any.
fn segment_after(link: &str, marker: &str) -> Option<String> {
    link.find(marker)
        .and_then(|pos| extract_id_from_segment(&link[pos + marker.len()..]))
}

/// Extract the first segment, stopping at any URL delimiter.
fn extract_id_from_segment(segment: &str) -> Option<String> {
    let delimiters = ['&', '#', '?', '/'];
    let end = segment
        .find(|c| delimiters.contains(&c))
        .unwrap_or(segment.len());
    let id = segment[..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Check if string contains only valid YouTube ID characters.
fn is_valid_id_chars(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate video ID format and return it.
fn validate_video_id(id: String) -> Result<String, LinkError> {
    if id.len() != VIDEO_ID_LEN || !is_valid_id_chars(&id) {
        return Err(LinkError::InvalidVideoId(id));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL: &str = "UCabcdefghijklmnopqrstuv";

    #[test]
    fn test_literal_channel_id() {
        assert_eq!(parse_link(CHANNEL).unwrap(), LinkRef::ChannelId(CHANNEL.into()));
        // Surrounding whitespace is ignored
        assert_eq!(
            parse_link(&format!("  {}  ", CHANNEL)).unwrap(),
            LinkRef::ChannelId(CHANNEL.into())
        );
    }

    #[test]
    fn test_channel_id_too_short_is_not_literal() {
        assert!(!is_channel_id("UCshort"));
        assert!(matches!(parse_link("UCshort"), Err(LinkError::Unrecognized(_))));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            parse_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123").unwrap(),
            LinkRef::VideoId("dQw4w9WgXcQ".into())
        );
        assert_eq!(
            parse_link("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap(),
            LinkRef::VideoId("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            parse_link("https://youtu.be/dQw4w9WgXcQ?t=30").unwrap(),
            LinkRef::VideoId("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn test_path_segment_urls() {
        for url in [
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?si=abc",
            "https://youtube.com/v/dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_link(url).unwrap(), LinkRef::VideoId("dQw4w9WgXcQ".into()), "{url}");
        }
    }

    #[test]
    fn test_handle_forms() {
        assert_eq!(
            parse_link("https://www.youtube.com/@SomeCreator/videos").unwrap(),
            LinkRef::Handle("SomeCreator".into())
        );
        assert_eq!(parse_link("@SomeCreator").unwrap(), LinkRef::Handle("SomeCreator".into()));
    }

    #[test]
    fn test_legacy_names() {
        assert_eq!(
            parse_link("https://www.youtube.com/user/oldname").unwrap(),
            LinkRef::CustomName("oldname".into())
        );
        assert_eq!(
            parse_link("https://www.youtube.com/c/CustomName/featured").unwrap(),
            LinkRef::CustomName("CustomName".into())
        );
    }

    #[test]
    fn test_channel_path() {
        assert_eq!(
            parse_link(&format!("https://www.youtube.com/channel/{}/videos", CHANNEL)).unwrap(),
            LinkRef::ChannelId(CHANNEL.into())
        );
    }

    #[test]
    fn test_video_forms_win_over_channel_forms() {
        // A watch link carried under a handle path is still a video link
        assert_eq!(
            parse_link("https://www.youtube.com/@creator/watch?v=dQw4w9WgXcQ").unwrap(),
            LinkRef::VideoId("dQw4w9WgXcQ".into())
        );
    }

    #[test]
    fn test_error_cases() {
        assert_eq!(parse_link("   "), Err(LinkError::Empty));
        assert!(matches!(
            parse_link("https://vimeo.com/123"),
            Err(LinkError::NotYoutube(h)) if h == "vimeo.com"
        ));
        assert!(matches!(
            parse_link("https://youtube.com/watch?v=abc123"),
            Err(LinkError::InvalidVideoId(_))
        ));
        assert!(matches!(
            parse_link("https://www.youtube.com/"),
            Err(LinkError::Unrecognized(_))
        ));
        assert!(matches!(parse_link("just some words"), Err(LinkError::Unrecognized(_))));
    }
}
