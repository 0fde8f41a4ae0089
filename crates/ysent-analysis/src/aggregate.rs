//! Counts, percentages and frequency tables over classified comments.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use ysent_models::{
    ClassifiedComment, ClassifierSummary, FrequencyTable, SentimentLabel, SentimentSummary, TokenFrequency,
};

use crate::normalizer::is_sentinel;

/// Tokens of this many characters or fewer are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Portuguese function words excluded from frequency tables.
pub const STOPWORDS: &[&str] = &[
    "que", "com", "para", "por", "uma", "uns", "umas", "não", "nao", "mais", "mas", "como",
    "dos", "das", "nos", "nas", "aos", "pela", "pelo", "pelas", "pelos", "isso", "isto",
    "esse", "essa", "esses", "essas", "este", "esta", "estes", "estas", "aquele", "aquela",
    "ele", "ela", "eles", "elas", "você", "voce", "vocês", "voces", "seu", "sua", "seus",
    "suas", "meu", "minha", "meus", "minhas", "nosso", "nossa", "tem", "ter", "foi", "ser",
    "está", "são", "sao", "era", "vai", "vou", "sim", "quando", "onde", "quem",
    "qual", "muito", "muita", "também", "tambem", "só", "então", "entao", "porque", "pra",
    "pro", "sobre", "até", "ate", "já", "ainda", "depois", "antes", "mesmo", "tudo", "todo",
    "toda", "todos", "todas", "aqui", "ali", "lá", "bem", "tão", "tao", "num", "numa", "há",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Label distribution per classifier.
///
/// The three defined labels are always present; `indefinido` only when it
/// occurs. Percentages use `max(total, 1)` as denominator and are rounded to
/// two decimals.
pub fn summarize(records: &[ClassifiedComment], classifiers: &[String]) -> SentimentSummary {
    let total = records.len();
    let denominator = total.max(1) as f64;

    let per_classifier = classifiers
        .iter()
        .map(|name| {
            let mut counts: BTreeMap<SentimentLabel, usize> =
                SentimentLabel::DEFINED.iter().map(|label| (*label, 0)).collect();
            for record in records {
                *counts.entry(record.label(name)).or_insert(0) += 1;
            }

            let percents = counts
                .iter()
                .map(|(label, count)| (*label, round2(*count as f64 * 100.0 / denominator)))
                .collect();

            (name.clone(), ClassifierSummary { counts, percents })
        })
        .collect();

    SentimentSummary { total, per_classifier }
}

/// Summary of one video's comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub summary: SentimentSummary,
}

/// [`summarize`] per video, in order of first appearance.
pub fn summarize_by_video(records: &[ClassifiedComment], classifiers: &[String]) -> Vec<VideoSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<ClassifiedComment>> = HashMap::new();

    for record in records {
        let video_id = record.video_id();
        groups
            .entry(video_id)
            .or_insert_with(|| {
                order.push(video_id);
                Vec::new()
            })
            .push(record.clone());
    }

    order
        .into_iter()
        .map(|video_id| VideoSummary {
            video_id: video_id.to_string(),
            summary: summarize(groups.get(video_id).map(Vec::as_slice).unwrap_or_default(), classifiers),
        })
        .collect()
}

/// Most frequent tokens of `clean_text`.
///
/// With `filter = Some((classifier, label))` only records carrying that label
/// are counted. Empty tokens, tokens of [`MIN_TOKEN_CHARS`] characters or
/// fewer and stopwords are dropped. Normalizer sentinels are dropped as well:
/// they mark comments with no text and would otherwise rank as words.
/// Ties keep first-seen order.
pub fn top_tokens(
    records: &[ClassifiedComment],
    n: usize,
    filter: Option<(&str, SentimentLabel)>,
) -> FrequencyTable {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut table: FrequencyTable = Vec::new();

    let selected = records
        .iter()
        .filter(|r| filter.map_or(true, |(classifier, label)| r.label(classifier) == label));

    for record in selected {
        for token in record.clean_text().split_whitespace() {
            if token.chars().count() <= MIN_TOKEN_CHARS || is_stopword(token) || is_sentinel(token) {
                continue;
            }
            match index.get(token) {
                Some(&i) => table[i].frequency += 1,
                None => {
                    index.insert(token, table.len());
                    table.push(TokenFrequency {
                        token: token.to_string(),
                        frequency: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    table.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    table.truncate(n);
    table
}

/// The `n` most-liked comments labelled `label` by `classifier`.
pub fn top_comments(
    records: &[ClassifiedComment],
    classifier: &str,
    label: SentimentLabel,
    n: usize,
) -> Vec<ClassifiedComment> {
    let mut matching: Vec<&ClassifiedComment> =
        records.iter().filter(|r| r.label(classifier) == label).collect();
    matching.sort_by(|a, b| b.raw().like_count.cmp(&a.raw().like_count));
    matching.into_iter().take(n).cloned().collect()
}
