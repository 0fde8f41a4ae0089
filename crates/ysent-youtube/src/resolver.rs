//! Link resolution.
//!
//! String forms that name a video or channel directly are resolved without
//! any network call. Handles and legacy custom names go through a channel
//! search and take the first hit. Every failed or empty lookup is a
//! [`ResolutionError`]; no placeholder ID is ever returned.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ysent_models::{parse_link, LinkRef};

use crate::api::YoutubeApi;
use crate::error::ResolutionError;

/// Whether a resolved ID names a video or a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Video,
    Channel,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Video => write!(f, "video"),
            TargetKind::Channel => write!(f, "channel"),
        }
    }
}

/// Canonical identifier a link resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub kind: TargetKind,
    pub id: String,
}

impl ResolvedTarget {
    pub fn video(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Video,
            id: id.into(),
        }
    }

    pub fn channel(id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Channel,
            id: id.into(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == TargetKind::Video
    }
}

/// Maps user input to a video or channel ID.
#[derive(Clone)]
pub struct LinkResolver {
    api: Arc<dyn YoutubeApi>,
}

impl LinkResolver {
    pub fn new(api: Arc<dyn YoutubeApi>) -> Self {
        Self { api }
    }

    /// Resolve a link to a video or channel ID.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedTarget, ResolutionError> {
        let link = parse_link(input)?;
        debug!(?link, "Parsed link");

        let target = match link {
            LinkRef::VideoId(id) => ResolvedTarget::video(id),
            LinkRef::ChannelId(id) => ResolvedTarget::channel(id),
            LinkRef::Handle(name) | LinkRef::CustomName(name) => {
                ResolvedTarget::channel(self.search_channel(&name).await?)
            }
        };

        info!(kind = %target.kind, id = %target.id, "Resolved link");
        Ok(target)
    }

    /// Resolve a link to a channel ID, looking up the owner of video links.
    pub async fn resolve_channel(&self, input: &str) -> Result<String, ResolutionError> {
        let target = self.resolve(input).await?;
        match target.kind {
            TargetKind::Channel => Ok(target.id),
            TargetKind::Video => self.channel_of_video(&target.id).await,
        }
    }

    /// Channel owning `video_id`.
    pub async fn channel_of_video(&self, video_id: &str) -> Result<String, ResolutionError> {
        self.api
            .video_channel(video_id)
            .await
            .map_err(|e| ResolutionError::lookup_failed(video_id, e))?
            .ok_or_else(|| ResolutionError::NotFound(video_id.to_string()))
    }

    /// First channel matching `name`.
    async fn search_channel(&self, name: &str) -> Result<String, ResolutionError> {
        let hits = self
            .api
            .search_channels(name)
            .await
            .map_err(|e| ResolutionError::lookup_failed(name, e))?;

        hits.into_iter()
            .next()
            .ok_or_else(|| ResolutionError::NotFound(name.to_string()))
    }
}
