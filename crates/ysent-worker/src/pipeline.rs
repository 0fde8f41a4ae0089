//! One harvest-and-analyse run.
//!
//! link → resolve → select → harvest → normalize → classify → aggregate.
//! Each stage consumes the previous stage's output only.

use std::sync::Arc;

use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;
use ysent_analysis::{
    normalize_all, summarize, summarize_by_video, top_comments, top_tokens, ClassifierSlot, SentimentEngine,
};
use ysent_models::{AnalysisMode, SentimentLabel, VideoDescriptor};
use ysent_youtube::{
    CancelToken, CommentHarvester, LinkResolver, PageThrottle, ResolutionError, Selection,
    TargetKind, VideoSelector, YoutubeApi, YoutubeClient,
};

use crate::config::{RunOptions, WorkerConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::logging::{stage, RunLogger};
use crate::report::{ClassifierStatus, RunReport};

/// Title used when a single video's details cannot be fetched.
pub const SINGLE_VIDEO_TITLE: &str = "Vídeo único";

/// Runs the full pipeline for a link.
pub struct Pipeline {
    api: Arc<dyn YoutubeApi>,
    engine: SentimentEngine,
    options: RunOptions,
    throttle: PageThrottle,
    cancel: CancelToken,
}

impl Pipeline {
    pub fn new(api: Arc<dyn YoutubeApi>, engine: SentimentEngine, options: RunOptions) -> Self {
        let throttle = PageThrottle::new(options.page_delay);
        Self {
            api,
            engine,
            options,
            throttle,
            cancel: CancelToken::never(),
        }
    }

    /// Build the pipeline with real clients; classifier availability is
    /// settled here, once.
    pub async fn from_config(config: &WorkerConfig) -> PipelineResult<Self> {
        let api = Arc::new(YoutubeClient::new(config.youtube.clone())?);

        let slots = vec![
            ClassifierSlot::lexicon(config.lexicon_enabled, config.lexicon_path.as_deref()),
            ClassifierSlot::model(config.ml.clone()).await,
        ];

        Ok(Self::new(api, SentimentEngine::new(slots), config.run.clone()))
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run the pipeline for `link`.
    pub async fn run(&self, link: &str) -> PipelineResult<RunReport> {
        let logger = RunLogger::new(Uuid::new_v4().to_string(), link);
        let span = logger.create_span();
        self.run_logged(link, &logger).instrument(span).await
    }

    async fn run_logged(&self, link: &str, logger: &RunLogger) -> PipelineResult<RunReport> {
        logger.log_start();
        let started_at = Utc::now();
        let resolver = LinkResolver::new(self.api.clone());

        let target = resolver.resolve(link).await.inspect_err(|e| {
            logger.log_error(stage::RESOLVE, &e.to_string());
        })?;

        // Only video mode analyses the linked video alone
        let single_video = self.options.mode == AnalysisMode::Video;
        if single_video && target.kind == TargetKind::Channel {
            let err = ResolutionError::NotAVideo(link.to_string());
            logger.log_error(stage::RESOLVE, &err.to_string());
            return Err(err.into());
        }

        let channel_id = match target.kind {
            TargetKind::Channel => target.id.clone(),
            TargetKind::Video => resolver.channel_of_video(&target.id).await.inspect_err(|e| {
                logger.log_error(stage::RESOLVE, &e.to_string());
            })?,
        };
        self.check_cancelled()?;

        let selection = if single_video {
            self.single_video(&target.id).await
        } else {
            self.select(&channel_id, logger).await?
        };

        if selection.is_empty() {
            logger.log_error(stage::SELECT, "no videos selected");
            return Err(PipelineError::NoVideos(channel_id));
        }
        logger.log_progress(
            stage::SELECT,
            &format!("{} video(s) selected by {}", selection.videos.len(), selection.criterion),
        );
        self.check_cancelled()?;

        let harvester = CommentHarvester::new(self.api.clone(), self.throttle.clone())
            .with_cancel(self.cancel.clone())
            .with_max_parallel(self.options.max_parallel_videos);
        let batch = harvester
            .harvest_many(&selection.video_ids(), self.options.max_comments_per_video)
            .await;
        self.check_cancelled()?;

        for report in batch.ended_early() {
            logger.log_warning(
                stage::HARVEST,
                &format!(
                    "Harvest of {} ended early after {} comment(s): {:?}",
                    report.video_id, report.collected, report.end
                ),
            );
        }
        if batch.comments.is_empty() {
            logger.log_error(stage::HARVEST, "no comments harvested");
            return Err(PipelineError::NoComments {
                videos: selection.videos.len(),
            });
        }
        logger.log_progress(stage::HARVEST, &format!("{} comment(s) harvested", batch.comments.len()));

        let classified = self.engine.classify(normalize_all(batch.comments)).await;
        logger.log_progress(stage::CLASSIFY, &format!("{} comment(s) classified", classified.len()));

        let names = self.engine.classifier_names();
        let insights = self.options.insights_classifier.as_str();
        let report = RunReport {
            run_id: logger.run_id().to_string(),
            link: link.to_string(),
            mode: self.options.mode,
            target,
            channel_id,
            harvests: batch.reports,
            classifiers: self.engine.slots().iter().map(ClassifierStatus::from).collect(),
            summary: summarize(&classified, &names),
            per_video: summarize_by_video(&classified, &names),
            top_tokens: top_tokens(&classified, self.options.top_tokens, None),
            negative_tokens: top_tokens(
                &classified,
                self.options.top_tokens,
                Some((insights, SentimentLabel::Negativo)),
            ),
            top_positive: top_comments(&classified, insights, SentimentLabel::Positivo, self.options.top_comments),
            top_negative: top_comments(&classified, insights, SentimentLabel::Negativo, self.options.top_comments),
            comments: classified,
            selection,
            started_at,
            finished_at: Utc::now(),
        };
        logger.log_progress(stage::AGGREGATE, "summaries computed");
        logger.log_completion(report.comments.len(), report.selection.videos.len());

        Ok(report)
    }

    /// Rank the channel's videos. A failed listing fails the run.
    async fn select(&self, channel_id: &str, logger: &RunLogger) -> PipelineResult<Selection> {
        let selector = VideoSelector::new(self.api.clone());
        let selection = selector
            .select(channel_id, self.options.criterion, self.options.max_videos)
            .await
            .inspect_err(|e| logger.log_error(stage::SELECT, &format!("Video listing failed: {e}")))?;

        if selection.degraded {
            logger.log_warning(stage::SELECT, "statistics unavailable, using recency order");
        }
        Ok(selection)
    }

    /// Selection holding just `video_id`, with details when they can be fetched.
    async fn single_video(&self, video_id: &str) -> Selection {
        let details = self
            .api
            .video_details(&[video_id.to_string()])
            .await
            .ok()
            .and_then(|videos| videos.into_iter().find(|v| v.video_id == video_id));

        let video = details.unwrap_or_else(|| VideoDescriptor::new(video_id, SINGLE_VIDEO_TITLE));
        Selection {
            criterion: self.options.criterion,
            videos: vec![video],
            degraded: false,
        }
    }

    fn check_cancelled(&self) -> PipelineResult<()> {
        if self.cancel.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .field("throttle", &self.throttle)
            .finish()
    }
}

