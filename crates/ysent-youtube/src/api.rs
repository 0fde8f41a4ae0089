//! The Data API surface the pipeline depends on.

use async_trait::async_trait;
use ysent_models::VideoDescriptor;

use crate::error::ApiResult;
use crate::types::CommentPage;

/// Lookup, listing and comment endpoints of the video platform.
///
/// [`crate::YoutubeClient`] talks to the real service; tests plug in fakes.
#[async_trait]
pub trait YoutubeApi: Send + Sync {
    /// Search channels by free text. Results keep the service's ranking.
    async fn search_channels(&self, query: &str) -> ApiResult<Vec<String>>;

    /// Channel owning `video_id`, `None` when the video is unknown.
    async fn video_channel(&self, video_id: &str) -> ApiResult<Option<String>>;

    /// Up to `max_results` videos of a channel, newest first.
    async fn channel_videos(&self, channel_id: &str, max_results: u32) -> ApiResult<Vec<VideoDescriptor>>;

    /// Details and statistics for the given videos.
    async fn video_details(&self, video_ids: &[String]) -> ApiResult<Vec<VideoDescriptor>>;

    /// One page of top-level comments.
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> ApiResult<CommentPage>;
}
