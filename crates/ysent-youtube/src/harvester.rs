//! Paginated comment harvesting.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};
use ysent_models::RawComment;

use crate::api::YoutubeApi;
use crate::cancel::CancelToken;
use crate::metrics;
use crate::throttle::PageThrottle;

/// Maximum page size of the comments endpoint.
pub const COMMENT_PAGE_SIZE: u32 = 100;

/// Why a harvest stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum HarvestEnd {
    /// No continuation cursor was returned
    Exhausted,
    /// The per-video cap was reached
    LimitReached,
    /// A page request failed; earlier pages are kept
    Failed(String),
    /// The cancel token fired
    Cancelled,
}

impl HarvestEnd {
    fn metric_reason(&self) -> Option<&'static str> {
        match self {
            HarvestEnd::Failed(_) => Some("failed"),
            HarvestEnd::Cancelled => Some("cancelled"),
            _ => None,
        }
    }
}

/// Comments of one video plus how the harvest ended.
#[derive(Debug, Clone, Serialize)]
pub struct Harvest {
    pub video_id: String,
    #[serde(skip)]
    pub comments: Vec<RawComment>,
    pub pages: u32,
    pub end: HarvestEnd,
}

impl Harvest {
    /// Whether the harvest stopped before end of stream or the cap.
    pub fn ended_early(&self) -> bool {
        matches!(self.end, HarvestEnd::Failed(_) | HarvestEnd::Cancelled)
    }
}

/// Per-video report without the comments themselves.
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    pub video_id: String,
    pub collected: usize,
    pub pages: u32,
    pub end: HarvestEnd,
}

impl From<&Harvest> for HarvestReport {
    fn from(harvest: &Harvest) -> Self {
        Self {
            video_id: harvest.video_id.clone(),
            collected: harvest.comments.len(),
            pages: harvest.pages,
            end: harvest.end.clone(),
        }
    }
}

/// Comments of several videos, concatenated in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchHarvest {
    pub comments: Vec<RawComment>,
    pub reports: Vec<HarvestReport>,
}

impl BatchHarvest {
    /// Videos whose harvest ended early.
    pub fn ended_early(&self) -> impl Iterator<Item = &HarvestReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.end, HarvestEnd::Failed(_) | HarvestEnd::Cancelled))
    }
}

/// Walks the comment cursor of one or more videos.
#[derive(Clone)]
pub struct CommentHarvester {
    api: Arc<dyn YoutubeApi>,
    throttle: PageThrottle,
    cancel: CancelToken,
    max_parallel: usize,
}

impl CommentHarvester {
    pub fn new(api: Arc<dyn YoutubeApi>, throttle: PageThrottle) -> Self {
        Self {
            api,
            throttle,
            cancel: CancelToken::never(),
            max_parallel: 1,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Number of videos harvested concurrently. The throttle stays shared.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Harvest up to `max_comments` top-level comments of one video.
    ///
    /// Never fails: a page error ends the harvest with
    /// [`HarvestEnd::Failed`] and keeps what was collected.
    pub async fn harvest(&self, video_id: &str, max_comments: usize) -> Harvest {
        let mut comments: Vec<RawComment> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        let end = loop {
            if comments.len() >= max_comments {
                break HarvestEnd::LimitReached;
            }
            if self.cancel.is_cancelled() {
                break HarvestEnd::Cancelled;
            }

            tokio::select! {
                _ = self.throttle.wait() => {}
                _ = self.cancel.cancelled() => break HarvestEnd::Cancelled,
            }

            let page = match self
                .api
                .comment_page(video_id, cursor.as_deref(), COMMENT_PAGE_SIZE)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        video_id,
                        page = pages + 1,
                        collected = comments.len(),
                        error = %e,
                        "Comment page failed, keeping partial harvest"
                    );
                    break HarvestEnd::Failed(e.to_string());
                }
            };

            pages += 1;
            metrics::record_comment_page();
            comments.extend(page.comments);
            debug!(video_id, page = pages, collected = comments.len(), "Fetched comment page");

            match page.next_page_token {
                Some(next) => cursor = Some(next),
                None if comments.len() >= max_comments => break HarvestEnd::LimitReached,
                None => break HarvestEnd::Exhausted,
            }
        };

        comments.truncate(max_comments);

        if let Some(reason) = end.metric_reason() {
            metrics::record_harvest_ended_early(reason);
        }
        info!(video_id, collected = comments.len(), pages, end = ?end, "Harvest finished");

        Harvest {
            video_id: video_id.to_string(),
            comments,
            pages,
            end,
        }
    }

    /// Harvest several videos and concatenate the comments in input order.
    ///
    /// A failure on one video does not stop the others. Once cancelled, the
    /// remaining videos are reported as cancelled without any request.
    pub async fn harvest_many(&self, video_ids: &[String], max_comments_per_video: usize) -> BatchHarvest {
        let harvests: Vec<Harvest> = stream::iter(video_ids.iter())
            .map(|video_id| async move {
                if self.cancel.is_cancelled() {
                    return Harvest {
                        video_id: video_id.clone(),
                        comments: Vec::new(),
                        pages: 0,
                        end: HarvestEnd::Cancelled,
                    };
                }
                self.harvest(video_id, max_comments_per_video).await
            })
            .buffered(self.max_parallel)
            .collect()
            .await;

        let mut batch = BatchHarvest::default();
        for harvest in harvests {
            batch.reports.push(HarvestReport::from(&harvest));
            batch.comments.extend(harvest.comments);
        }
        batch
    }
}
