//! Video selection for a channel.
//!
//! `recent` relies on the server-side date ordering. The count-based criteria
//! fetch a recency-ordered superset, look up statistics for it and rank
//! locally. The superset is bounded, so a channel's true top videos outside
//! that window are missed; the ranking is an approximation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use ysent_models::{SelectionCriterion, VideoDescriptor};

use crate::api::YoutubeApi;
use crate::error::ApiResult;

/// Size of the recency window ranked by the count-based criteria.
pub const OVERSAMPLE_SIZE: u32 = 50;

/// Ordered selection result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Selection {
    pub criterion: SelectionCriterion,
    pub videos: Vec<VideoDescriptor>,

    /// Statistics could not be fetched; `videos` is in recency order.
    pub degraded: bool,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.video_id.clone()).collect()
    }
}

/// Picks and orders the videos of a channel.
#[derive(Clone)]
pub struct VideoSelector {
    api: Arc<dyn YoutubeApi>,
}

impl VideoSelector {
    pub fn new(api: Arc<dyn YoutubeApi>) -> Self {
        Self { api }
    }

    /// Select at most `limit` videos of `channel_id`.
    ///
    /// Fails only when the recency listing itself fails. A failed statistics
    /// lookup degrades to the recency order and sets [`Selection::degraded`].
    pub async fn select(
        &self,
        channel_id: &str,
        criterion: SelectionCriterion,
        limit: usize,
    ) -> ApiResult<Selection> {
        if limit == 0 {
            return Ok(Selection {
                criterion,
                ..Default::default()
            });
        }

        if !criterion.needs_statistics() {
            let mut videos = self.api.channel_videos(channel_id, clamp(limit)).await?;
            videos.truncate(limit);
            info!(channel_id, %criterion, count = videos.len(), "Selected videos");
            return Ok(Selection {
                criterion,
                videos,
                degraded: false,
            });
        }

        let window = OVERSAMPLE_SIZE.max(clamp(limit));
        let superset = self.api.channel_videos(channel_id, window).await?;
        let ids: Vec<String> = superset.iter().map(|v| v.video_id.clone()).collect();

        let (mut videos, degraded) = match self.api.video_details(&ids).await {
            Ok(details) => (rank(&superset, details, criterion), false),
            Err(e) => {
                warn!(
                    channel_id,
                    %criterion,
                    error = %e,
                    "Statistics lookup failed, falling back to recency order"
                );
                (superset, true)
            }
        };
        videos.truncate(limit);

        info!(
            channel_id,
            %criterion,
            count = videos.len(),
            degraded,
            "Selected videos"
        );
        Ok(Selection {
            criterion,
            videos,
            degraded,
        })
    }
}

fn clamp(limit: usize) -> u32 {
    u32::try_from(limit).unwrap_or(u32::MAX)
}

/// Order `details` by the superset's recency order, then stable-sort by the
/// criterion's count descending. Videos missing from `details` keep their
/// superset entry and rank as zero.
fn rank(
    superset: &[VideoDescriptor],
    mut details: Vec<VideoDescriptor>,
    criterion: SelectionCriterion,
) -> Vec<VideoDescriptor> {
    let mut ordered: Vec<VideoDescriptor> = superset
        .iter()
        .map(|base| {
            match details.iter().position(|d| d.video_id == base.video_id) {
                Some(idx) => {
                    let mut detail = details.swap_remove(idx);
                    if detail.published_at.is_none() {
                        detail.published_at = base.published_at;
                    }
                    detail
                }
                None => base.clone(),
            }
        })
        .collect();

    let key = |v: &VideoDescriptor| match criterion {
        SelectionCriterion::MostViewed => v.view_count.unwrap_or(0),
        SelectionCriterion::MostCommented => v.comment_count.unwrap_or(0),
        SelectionCriterion::Recent => 0,
    };
    ordered.sort_by(|a, b| key(b).cmp(&key(a)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::CommentPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Channel of six videos, newest first: v0 .. v5.
    struct StubChannel {
        stats_fail: bool,
        listed: Mutex<Vec<u32>>,
    }

    impl StubChannel {
        fn new(stats_fail: bool) -> Arc<Self> {
            Arc::new(Self {
                stats_fail,
                listed: Mutex::new(Vec::new()),
            })
        }
    }

    const VIEWS: [u64; 6] = [10, 500, 30, 500, 7, 90];
    const COMMENTS: [u64; 6] = [3, 1, 40, 2, 40, 0];

    #[async_trait]
    impl YoutubeApi for StubChannel {
        async fn search_channels(&self, _: &str) -> ApiResult<Vec<String>> {
            unreachable!()
        }

        async fn video_channel(&self, _: &str) -> ApiResult<Option<String>> {
            unreachable!()
        }

        async fn channel_videos(&self, _: &str, max_results: u32) -> ApiResult<Vec<VideoDescriptor>> {
            self.listed.lock().unwrap().push(max_results);
            Ok((0..6)
                .take(max_results as usize)
                .map(|i| VideoDescriptor::new(format!("v{i}"), format!("Video {i}")))
                .collect())
        }

        async fn video_details(&self, ids: &[String]) -> ApiResult<Vec<VideoDescriptor>> {
            if self.stats_fail {
                return Err(ApiError::status("videos", 403, "quotaExceeded"));
            }
            // Answer in reverse to check that ranking does not rely on response order
            Ok(ids
                .iter()
                .rev()
                .map(|id| {
                    let i: usize = id[1..].parse().unwrap();
                    VideoDescriptor::new(id.clone(), format!("Video {i}"))
                        .with_statistics(VIEWS[i], COMMENTS[i])
                })
                .collect())
        }

        async fn comment_page(&self, _: &str, _: Option<&str>, _: u32) -> ApiResult<CommentPage> {
            unreachable!()
        }
    }

    fn ids(selection: &Selection) -> Vec<&str> {
        selection.videos.iter().map(|v| v.video_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_recent_uses_server_order() {
        let stub = StubChannel::new(false);
        let selector = VideoSelector::new(stub.clone());

        let selection = selector.select("UCx", SelectionCriterion::Recent, 3).await.unwrap();
        assert_eq!(ids(&selection), vec!["v0", "v1", "v2"]);
        assert!(!selection.degraded);
        assert!(selection.videos.iter().all(|v| !v.has_statistics()));
        assert_eq!(*stub.listed.lock().unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_most_viewed_ranks_locally_with_stable_ties() {
        let stub = StubChannel::new(false);
        let selector = VideoSelector::new(stub.clone());

        let selection = selector
            .select("UCx", SelectionCriterion::MostViewed, 3)
            .await
            .unwrap();
        // v1 and v3 tie at 500 views; v1 is more recent
        assert_eq!(ids(&selection), vec!["v1", "v3", "v5"]);
        assert_eq!(selection.videos[0].view_count, Some(500));
        assert_eq!(*stub.listed.lock().unwrap(), vec![OVERSAMPLE_SIZE]);
    }

    #[tokio::test]
    async fn test_most_commented() {
        let selector = VideoSelector::new(StubChannel::new(false));
        let selection = selector
            .select("UCx", SelectionCriterion::MostCommented, 2)
            .await
            .unwrap();
        assert_eq!(ids(&selection), vec!["v2", "v4"]);
    }

    #[tokio::test]
    async fn test_statistics_failure_degrades_to_recency() {
        let selector = VideoSelector::new(StubChannel::new(true));
        let selection = selector
            .select("UCx", SelectionCriterion::MostViewed, 4)
            .await
            .unwrap();
        assert!(selection.degraded);
        assert_eq!(ids(&selection), vec!["v0", "v1", "v2", "v3"]);
        assert!(selection.videos.iter().all(|v| v.view_count.is_none()));
    }

    #[tokio::test]
    async fn test_zero_limit_is_empty() {
        let stub = StubChannel::new(false);
        let selector = VideoSelector::new(stub.clone());
        let selection = selector.select("UCx", SelectionCriterion::MostViewed, 0).await.unwrap();
        assert!(selection.is_empty());
        assert!(stub.listed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rank_keeps_videos_missing_from_details() {
        let superset = vec![VideoDescriptor::new("a", "A"), VideoDescriptor::new("b", "B")];
        let details = vec![VideoDescriptor::new("b", "B").with_statistics(5, 0)];
        let ranked = rank(&superset, details, SelectionCriterion::MostViewed);
        assert_eq!(ranked[0].video_id, "b");
        assert_eq!(ranked[1].video_id, "a");
        assert!(!ranked[1].has_statistics());
    }
}
