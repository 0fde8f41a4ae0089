//! Data API request/response types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use ysent_models::{RawComment, VideoDescriptor};

/// One page of top-level comments.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    /// Continuation cursor; `None` at end of stream
    pub next_page_token: Option<String>,
}

/// `search.list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// `videos.list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

/// Counts arrive as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Statistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

/// `commentThreads.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: Option<String>,
    #[serde(default)]
    pub text_display: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub published_at: Option<String>,
}

pub(crate) fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|s| s.parse().ok()).unwrap_or(0)
}

impl SearchItem {
    pub fn into_video(self) -> Option<VideoDescriptor> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet.unwrap_or_default();
        let mut video = VideoDescriptor::new(video_id, snippet.title.unwrap_or_default());
        video.published_at = parse_timestamp(snippet.published_at.as_deref());
        Some(video)
    }

    /// Channel ID of a channel search hit.
    pub fn channel_id(&self) -> Option<String> {
        self.id
            .channel_id
            .clone()
            .or_else(|| self.snippet.as_ref().and_then(|s| s.channel_id.clone()))
    }
}

impl VideoItem {
    /// Convert to a descriptor; missing statistics count as zero.
    pub fn into_video(self) -> VideoDescriptor {
        let snippet = self.snippet.unwrap_or_default();
        let stats = self.statistics.unwrap_or_default();
        let mut video = VideoDescriptor::new(self.id, snippet.title.unwrap_or_default())
            .with_statistics(
                parse_count(stats.view_count.as_deref()),
                parse_count(stats.comment_count.as_deref()),
            );
        video.published_at = parse_timestamp(snippet.published_at.as_deref());
        video
    }
}

impl CommentThread {
    pub fn into_comment(self, video_id: &str) -> RawComment {
        let snippet = self.snippet.top_level_comment.snippet;
        RawComment {
            video_id: video_id.to_string(),
            author: snippet.author_display_name.unwrap_or_default(),
            raw_text: snippet.text_display,
            like_count: snippet.like_count.unwrap_or(0),
            published_at: parse_timestamp(snippet.published_at.as_deref()),
        }
    }
}
