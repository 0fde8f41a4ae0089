//! Data API HTTP client.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ysent_models::VideoDescriptor;

use crate::api::YoutubeApi;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::types::{CommentPage, CommentThreadListResponse, SearchResponse, VideoListResponse};

/// Public Data API v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// `search.list` caps `maxResults` at 50.
const SEARCH_MAX_RESULTS: u32 = 50;

/// `videos.list` accepts at most 50 IDs per call.
const VIDEOS_MAX_IDS: usize = 50;

/// Hits requested when searching a channel by name.
const CHANNEL_SEARCH_RESULTS: u32 = 5;

/// Configuration for the Data API client.
#[derive(Clone)]
pub struct YoutubeClientConfig {
    /// Base URL of the Data API
    pub base_url: String,
    /// Static API key
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
}

impl YoutubeClientConfig {
    /// Create a config for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    /// Point the client at another base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        let api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingApiKey)?;

        Ok(Self {
            base_url: std::env::var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout: Duration::from_secs(
                std::env::var("YOUTUBE_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("YOUTUBE_REQUEST_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

impl fmt::Debug for YoutubeClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YoutubeClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Client for the Data API.
pub struct YoutubeClient {
    http: Client,
    config: YoutubeClientConfig,
}

impl YoutubeClient {
    /// Create a new client.
    pub fn new(config: YoutubeClientConfig) -> ApiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(YoutubeClientConfig::from_env()?)
    }

    /// GET `endpoint` with `params` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);

        debug!(endpoint, "Sending Data API request");

        let response = self
            .with_retry(endpoint, || async {
                let started = Instant::now();
                let sent = self
                    .http
                    .get(&url)
                    .query(params)
                    .query(&[("key", self.config.api_key.as_str())])
                    .send()
                    .await;
                let response = match sent {
                    Ok(response) => response,
                    // The request URL carries the key
                    Err(e) => return Err(ApiError::Network(e.without_url())),
                };

                let status = response.status();
                metrics::record_request(endpoint, status.as_u16(), started.elapsed());

                if status.is_success() {
                    Ok(response)
                } else {
                    let body = response.text().await.unwrap_or_default();
                    Err(ApiError::status(endpoint, status.as_u16(), body))
                }
            })
            .await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::invalid_response(endpoint, e.without_url().to_string()))
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, endpoint: &str, operation: F) -> ApiResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ApiResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    attempt += 1;
                    warn!(
                        "{} request failed (attempt {}), retrying in {:?}: {}",
                        endpoint, attempt, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl YoutubeApi for YoutubeClient {
    async fn search_channels(&self, query: &str) -> ApiResult<Vec<String>> {
        let params = [
            ("part", "snippet".to_string()),
            ("type", "channel".to_string()),
            ("q", query.to_string()),
            ("maxResults", CHANNEL_SEARCH_RESULTS.to_string()),
        ];
        let response: SearchResponse = self.get_json("search", &params).await?;

        Ok(response.items.iter().filter_map(|item| item.channel_id()).collect())
    }

    async fn video_channel(&self, video_id: &str) -> ApiResult<Option<String>> {
        let params = [("part", "snippet".to_string()), ("id", video_id.to_string())];
        let response: VideoListResponse = self.get_json("videos", &params).await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .and_then(|snippet| snippet.channel_id))
    }

    async fn channel_videos(&self, channel_id: &str, max_results: u32) -> ApiResult<Vec<VideoDescriptor>> {
        let params = [
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("order", "date".to_string()),
            ("type", "video".to_string()),
            ("maxResults", max_results.min(SEARCH_MAX_RESULTS).to_string()),
        ];
        let response: SearchResponse = self.get_json("search", &params).await?;

        Ok(response.items.into_iter().filter_map(|item| item.into_video()).collect())
    }

    async fn video_details(&self, video_ids: &[String]) -> ApiResult<Vec<VideoDescriptor>> {
        let mut videos = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(VIDEOS_MAX_IDS) {
            let params = [
                ("part", "snippet,statistics".to_string()),
                ("id", chunk.join(",")),
            ];
            let response: VideoListResponse = self.get_json("videos", &params).await?;
            videos.extend(response.items.into_iter().map(|item| item.into_video()));
        }

        Ok(videos)
    }

    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> ApiResult<CommentPage> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", page_size.to_string()),
            ("textFormat", "plainText".to_string()),
            ("order", "relevance".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response: CommentThreadListResponse = self.get_json("commentThreads", &params).await?;

        Ok(CommentPage {
            comments: response
                .items
                .into_iter()
                .map(|thread| thread.into_comment(video_id))
                .collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}
