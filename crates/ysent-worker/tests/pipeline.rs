//! End-to-end pipeline runs against in-memory backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ysent_analysis::{
    ClassifierSlot, LexiconClassifier, ModelClassifier, RatingModel, SentimentEngine, EMPTY_AFTER_CLEANING, LEXICON,
    MODEL,
};
use ysent_ml_client::{MlResult, Rating};
use ysent_models::{AnalysisMode, RawComment, SelectionCriterion, SentimentLabel, VideoDescriptor};
use ysent_worker::{Pipeline, PipelineError, RunOptions, SINGLE_VIDEO_TITLE};
use ysent_youtube::{
    cancel_pair, ApiError, ApiResult, CommentPage, HarvestEnd, ResolutionError, TargetKind, YoutubeApi,
};

const CHANNEL: &str = "UCfakechannel0000000000";

/// A channel whose videos are listed newest first.
struct FakeChannel {
    videos: Vec<(VideoDescriptor, Vec<RawComment>)>,
    failing: Vec<String>,
    listing_fails: bool,
    comment_requests: AtomicUsize,
}

impl FakeChannel {
    fn new() -> Self {
        Self {
            videos: Vec::new(),
            failing: Vec::new(),
            listing_fails: false,
            comment_requests: AtomicUsize::new(0),
        }
    }

    fn video(mut self, id: &str, views: u64, comments: &[(&str, u64)]) -> Self {
        let descriptor = VideoDescriptor::new(id, format!("Title {id}")).with_statistics(views, comments.len() as u64);
        let comments = comments
            .iter()
            .enumerate()
            .map(|(i, (text, likes))| RawComment::new(id, format!("user{i}"), *text).with_like_count(*likes))
            .collect();
        self.videos.push((descriptor, comments));
        self
    }

    fn failing(mut self, id: &str) -> Self {
        self.failing.push(id.to_string());
        self
    }

    fn listing_fails(mut self) -> Self {
        self.listing_fails = true;
        self
    }
}

#[async_trait]
impl YoutubeApi for FakeChannel {
    async fn search_channels(&self, query: &str) -> ApiResult<Vec<String>> {
        Ok(if query == "canalfake" { vec![CHANNEL.to_string()] } else { vec![] })
    }

    async fn video_channel(&self, video_id: &str) -> ApiResult<Option<String>> {
        Ok(self
            .videos
            .iter()
            .any(|(v, _)| v.video_id == video_id)
            .then(|| CHANNEL.to_string()))
    }

    async fn channel_videos(&self, channel_id: &str, max_results: u32) -> ApiResult<Vec<VideoDescriptor>> {
        if self.listing_fails {
            return Err(ApiError::status("search", 403, "quotaExceeded"));
        }
        if channel_id != CHANNEL {
            return Ok(vec![]);
        }
        Ok(self
            .videos
            .iter()
            .take(max_results as usize)
            .map(|(v, _)| VideoDescriptor::new(v.video_id.clone(), v.title.clone()))
            .collect())
    }

    async fn video_details(&self, video_ids: &[String]) -> ApiResult<Vec<VideoDescriptor>> {
        Ok(self
            .videos
            .iter()
            .filter(|(v, _)| video_ids.contains(&v.video_id))
            .map(|(v, _)| v.clone())
            .collect())
    }

    async fn comment_page(&self, video_id: &str, page_token: Option<&str>, page_size: u32) -> ApiResult<CommentPage> {
        self.comment_requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|f| f == video_id) {
            return Err(ApiError::status("commentThreads", 403, "commentsDisabled"));
        }

        let comments = self
            .videos
            .iter()
            .find(|(v, _)| v.video_id == video_id)
            .map(|(_, c)| c.clone())
            .unwrap_or_default();

        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + page_size as usize).min(comments.len());
        Ok(CommentPage {
            comments: comments[start..end].to_vec(),
            next_page_token: (end < comments.len()).then(|| end.to_string()),
        })
    }
}

/// Rates comments containing "ruim" with one star and everything else with five.
#[derive(Default)]
struct KeywordModel {
    calls: AtomicUsize,
}

#[async_trait]
impl RatingModel for KeywordModel {
    async fn rate(&self, texts: &[String]) -> MlResult<Vec<Rating>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| Rating {
                label: if t.contains("ruim") { "1 star" } else { "5 stars" }.to_string(),
                score: 0.8,
            })
            .collect())
    }
}

fn channel() -> FakeChannel {
    FakeChannel::new()
        .video("vidNewest01", 10, &[("Vídeo ótimo!!", 4), ("muito ruim, não gostei", 9)])
        .video("vidMiddle02", 900, &[("Excelente conteúdo", 30), ("bom dia bom dia", 1), ("!!!", 0)])
        .video("vidOldest03", 50, &[("Amei demais https://x.y", 2)])
}

fn options() -> RunOptions {
    RunOptions {
        page_delay: Duration::ZERO,
        ..RunOptions::default()
    }
}

fn engine(model: Arc<KeywordModel>) -> SentimentEngine {
    SentimentEngine::new(vec![
        ClassifierSlot::available(LexiconClassifier::default()),
        ClassifierSlot::Available(Arc::new(ModelClassifier::new(model))),
    ])
}

fn build(api: FakeChannel, options: RunOptions) -> (Arc<FakeChannel>, Arc<KeywordModel>, Pipeline) {
    let api = Arc::new(api);
    let model = Arc::new(KeywordModel::default());
    let pipeline = Pipeline::new(api.clone(), engine(model.clone()), options);
    (api, model, pipeline)
}

#[tokio::test]
async fn test_channel_run_produces_full_report() {
    let (_, model, pipeline) = build(channel(), options());
    let report = pipeline
        .run(&format!("https://www.youtube.com/channel/{CHANNEL}"))
        .await
        .unwrap();

    assert_eq!(report.target.kind, TargetKind::Channel);
    assert_eq!(report.channel_id, CHANNEL);
    assert_eq!(report.selection.videos.len(), 3);
    assert_eq!(report.comments.len(), 6);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);

    // Comments keep harvest order and trace back to their raw record
    assert_eq!(report.comments[0].video_id(), "vidNewest01");
    assert_eq!(report.comments[0].raw().raw_text.as_deref(), Some("Vídeo ótimo!!"));
    assert_eq!(report.comments[4].clean_text(), EMPTY_AFTER_CLEANING);

    assert_eq!(report.summary.total, 6);
    let model_summary = report.summary.classifier(MODEL).unwrap();
    assert_eq!(model_summary.count(SentimentLabel::Negativo), 1);
    assert_eq!(model_summary.count(SentimentLabel::Positivo), 5);
    assert!(report.summary.classifier(LEXICON).is_some());

    assert_eq!(report.per_video.len(), 3);
    assert_eq!(report.per_video[1].video_id, "vidMiddle02");
    assert_eq!(report.per_video[1].summary.total, 3);

    assert_eq!(report.top_tokens[0].token, "bom");
    assert_eq!(report.top_tokens[0].frequency, 2);
    assert!(report.negative_tokens.iter().any(|t| t.token == "ruim"));
    assert_eq!(report.top_positive[0].raw().like_count, 30);
    assert_eq!(report.top_negative.len(), 1);
    assert!(!report.is_partial());
    assert!(report.classifiers.iter().all(|c| c.available));
}

#[tokio::test]
async fn test_handle_link_is_looked_up() {
    let (_, _, pipeline) = build(channel(), options());
    let report = pipeline.run("https://www.youtube.com/@canalfake").await.unwrap();
    assert_eq!(report.channel_id, CHANNEL);
}

#[tokio::test]
async fn test_most_viewed_selection() {
    let opts = RunOptions {
        criterion: SelectionCriterion::MostViewed,
        max_videos: 2,
        ..options()
    };
    let (_, _, pipeline) = build(channel(), opts);
    let report = pipeline.run(CHANNEL).await.unwrap();

    let ids: Vec<&str> = report.selection.videos.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(ids, vec!["vidMiddle02", "vidOldest03"]);
    assert_eq!(report.comments.len(), 4);
}

fn video_mode() -> RunOptions {
    RunOptions {
        mode: AnalysisMode::Video,
        ..options()
    }
}

#[tokio::test]
async fn test_video_link_in_auto_mode_analyses_owner_channel() {
    let (_, _, pipeline) = build(channel(), options());
    let report = pipeline.run("https://youtu.be/vidMiddle02").await.unwrap();

    assert_eq!(report.target.kind, TargetKind::Video);
    assert_eq!(report.channel_id, CHANNEL);
    assert_eq!(report.selection.videos.len(), 3);
    assert_eq!(report.comments.len(), 6);
}

#[tokio::test]
async fn test_video_mode_analyses_single_video() {
    let (_, _, pipeline) = build(channel(), video_mode());
    let report = pipeline.run("https://youtu.be/vidMiddle02").await.unwrap();

    assert_eq!(report.channel_id, CHANNEL);
    assert_eq!(report.selection.videos.len(), 1);
    assert_eq!(report.selection.videos[0].title, "Title vidMiddle02");
    assert!(report.comments.iter().all(|c| c.video_id() == "vidMiddle02"));
}

#[tokio::test]
async fn test_single_video_without_comments() {
    let api = channel().video("vidSilent09", 0, &[]);
    let (_, _, pipeline) = build(api, video_mode());

    let err = pipeline.run("https://www.youtube.com/watch?v=vidSilent09").await.unwrap_err();
    assert!(matches!(err, PipelineError::NoComments { videos: 1 }));
}

#[tokio::test]
async fn test_undescribed_single_video_uses_placeholder_title() {
    let api = Arc::new(Orphan { owner_known: true });
    let pipeline = Pipeline::new(api, engine(Arc::new(KeywordModel::default())), video_mode());
    let report = pipeline.run("https://www.youtube.com/shorts/orphanVid01").await.unwrap();
    assert_eq!(report.selection.videos[0].title, SINGLE_VIDEO_TITLE);
    assert_eq!(report.channel_id, CHANNEL);
}

#[tokio::test]
async fn test_failed_owner_lookup_fails_the_run() {
    for opts in [video_mode(), options()] {
        let api = Arc::new(Orphan { owner_known: false });
        let pipeline = Pipeline::new(api, engine(Arc::new(KeywordModel::default())), opts);

        let err = pipeline.run("https://www.youtube.com/shorts/orphanVid01").await.unwrap_err();
        assert!(matches!(err, PipelineError::Resolution(ResolutionError::LookupFailed { .. })));
        assert_eq!(err.exit_code(), 2);
    }
}

/// Backend with comments for a video it cannot describe.
struct Orphan {
    owner_known: bool,
}

#[async_trait]
impl YoutubeApi for Orphan {
    async fn search_channels(&self, _: &str) -> ApiResult<Vec<String>> {
        Ok(vec![])
    }

    async fn video_channel(&self, _: &str) -> ApiResult<Option<String>> {
        if self.owner_known {
            Ok(Some(CHANNEL.to_string()))
        } else {
            Err(ApiError::status("videos", 500, "backend error"))
        }
    }

    async fn channel_videos(&self, _: &str, _: u32) -> ApiResult<Vec<VideoDescriptor>> {
        Ok(vec![])
    }

    async fn video_details(&self, _: &[String]) -> ApiResult<Vec<VideoDescriptor>> {
        Err(ApiError::status("videos", 500, "backend error"))
    }

    async fn comment_page(&self, video_id: &str, _: Option<&str>, _: u32) -> ApiResult<CommentPage> {
        Ok(CommentPage {
            comments: vec![RawComment::new(video_id, "anon", "legal")],
            next_page_token: None,
        })
    }
}

#[tokio::test]
async fn test_video_mode_rejects_channel_link() {
    let (api, _, pipeline) = build(channel(), video_mode());
    let err = pipeline.run(CHANNEL).await.unwrap_err();

    assert!(matches!(err, PipelineError::Resolution(ResolutionError::NotAVideo(_))));
    assert_eq!(api.comment_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_channel_mode_with_video_link_uses_owner() {
    let opts = RunOptions {
        mode: AnalysisMode::Channel,
        ..options()
    };
    let (_, _, pipeline) = build(channel(), opts);
    let report = pipeline.run("https://www.youtube.com/watch?v=vidOldest03").await.unwrap();
    assert_eq!(report.selection.videos.len(), 3);
}

#[tokio::test]
async fn test_resolution_errors_are_distinct_from_empty_results() {
    let (_, _, pipeline) = build(channel(), options());

    let err = pipeline.run("https://www.youtube.com/playlist?list=PL123").await.unwrap_err();
    assert!(matches!(err, PipelineError::Resolution(_)));

    let err = pipeline.run("@nobody").await.unwrap_err();
    assert!(matches!(err, PipelineError::Resolution(ResolutionError::NotFound(_))));

    let err = pipeline.run("UCemptychannel000000000").await.unwrap_err();
    assert!(matches!(err, PipelineError::NoVideos(_)));
}

#[tokio::test]
async fn test_failed_listing_is_an_api_error() {
    let (api, _, pipeline) = build(channel().listing_fails(), options());
    let err = pipeline.run(CHANNEL).await.unwrap_err();

    assert!(matches!(err, PipelineError::Api(ApiError::Status { status: 403, .. })));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(api.comment_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_video_does_not_stop_the_others() {
    let (_, _, pipeline) = build(channel().failing("vidNewest01"), options());
    let report = pipeline.run(CHANNEL).await.unwrap();

    assert_eq!(report.comments.len(), 4);
    assert!(report.is_partial());
    assert!(matches!(report.harvests[0].end, HarvestEnd::Failed(_)));
    assert_eq!(report.harvests[1].end, HarvestEnd::Exhausted);
}

#[tokio::test]
async fn test_comment_cap_applies_per_video() {
    let opts = RunOptions {
        max_comments_per_video: 1,
        ..options()
    };
    let (_, _, pipeline) = build(channel(), opts);
    let report = pipeline.run(CHANNEL).await.unwrap();
    assert_eq!(report.comments.len(), 3);
    assert!(report.harvests.iter().all(|h| h.collected == 1));
}

#[tokio::test]
async fn test_unavailable_model_degrades_to_undefined() {
    let api = Arc::new(channel());
    let engine = SentimentEngine::new(vec![
        ClassifierSlot::available(LexiconClassifier::default()),
        ClassifierSlot::unavailable(MODEL, "ML_SERVICE_URL not configured"),
    ]);
    let pipeline = Pipeline::new(api, engine, options());
    let report = pipeline.run(CHANNEL).await.unwrap();

    let model = report.summary.classifier(MODEL).unwrap();
    assert_eq!(model.count(SentimentLabel::Indefinido), 6);
    assert_eq!(model.percent(SentimentLabel::Indefinido), 100.0);
    assert_eq!(model.count(SentimentLabel::Positivo), 0);
    assert!(report.top_positive.is_empty());

    let lexicon = report.summary.classifier(LEXICON).unwrap();
    assert_eq!(lexicon.count(SentimentLabel::Indefinido), 0);

    let status = report.classifiers.iter().find(|c| c.name == MODEL).unwrap();
    assert!(!status.available);
}

#[tokio::test]
async fn test_cancelled_run() {
    let (handle, token) = cancel_pair();
    handle.cancel();

    let api = Arc::new(channel());
    let pipeline = Pipeline::new(api.clone(), engine(Arc::new(KeywordModel::default())), options()).with_cancel(token);

    let err = pipeline.run(CHANNEL).await.unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
    assert_eq!(api.comment_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let (_, _, pipeline) = build(channel(), options());
    let report = pipeline.run(CHANNEL).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["total"], 6);
    assert_eq!(json["summary"]["per_classifier"]["model"]["counts"]["negativo"], 1);
    assert_eq!(json["harvests"][0]["end"]["reason"], "exhausted");
    assert_eq!(json["comments"][0]["sentiments"]["model"]["raw_label"], "5 stars");
}
