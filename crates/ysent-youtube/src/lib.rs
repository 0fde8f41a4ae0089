//! YouTube Data API boundary for the comment sentiment pipeline.
//!
//! This crate provides:
//! - [`YoutubeApi`]: the endpoints the pipeline uses, with a reqwest-backed [`YoutubeClient`]
//! - [`LinkResolver`]: maps user links to video or channel IDs
//! - [`VideoSelector`]: picks and ranks videos of a channel
//! - [`CommentHarvester`]: cursor-based comment pagination with a shared throttle
//! - Cancellation and request metrics

pub mod api;
pub mod cancel;
pub mod client;
pub mod error;
pub mod harvester;
pub mod metrics;
pub mod resolver;
pub mod selector;
pub mod throttle;
pub mod types;

pub use api::YoutubeApi;
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use client::{YoutubeClient, YoutubeClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, ResolutionError};
pub use harvester::{BatchHarvest, CommentHarvester, Harvest, HarvestEnd, HarvestReport, COMMENT_PAGE_SIZE};
pub use resolver::{LinkResolver, ResolvedTarget, TargetKind};
pub use selector::{Selection, VideoSelector, OVERSAMPLE_SIZE};
pub use throttle::{PageThrottle, DEFAULT_PAGE_DELAY};
pub use types::CommentPage;
