//! Rule-based polarity lexicon.
//!
//! Valences use the VADER scale (about -4 to 4). A token's valence is boosted
//! by intensifiers and flipped by negations found among the three preceding
//! tokens. The summed valence is squashed into `[-1, 1]`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult};

/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

/// Largest accepted valence magnitude.
pub const MAX_VALENCE: f64 = 4.0;

/// Scalar applied to a valence preceded by a negation.
const NEGATION_SCALAR: f64 = -0.74;

/// Base intensifier increment.
const BOOST_INCR: f64 = 0.293;

/// How far back negations and intensifiers are searched.
const LOOKBACK: usize = 3;

const POSITIVE: &[(&str, f64)] = &[
    // pt
    ("bom", 1.9),
    ("boa", 1.9),
    ("otimo", 3.0),
    ("ótimo", 3.0),
    ("otima", 3.0),
    ("ótima", 3.0),
    ("excelente", 3.2),
    ("maravilhoso", 3.0),
    ("maravilhosa", 3.0),
    ("incrivel", 2.9),
    ("incrível", 2.9),
    ("amei", 3.0),
    ("amo", 3.1),
    ("adoro", 2.9),
    ("adorei", 2.9),
    ("gostei", 2.0),
    ("gosto", 1.8),
    ("legal", 1.8),
    ("lindo", 2.6),
    ("linda", 2.6),
    ("perfeito", 3.0),
    ("perfeita", 3.0),
    ("parabens", 2.5),
    ("parabéns", 2.5),
    ("obrigado", 1.7),
    ("obrigada", 1.7),
    ("feliz", 2.7),
    ("melhor", 2.2),
    ("sensacional", 3.0),
    ("show", 1.8),
    ("top", 1.9),
    ("massa", 1.6),
    ("demais", 1.5),
    ("util", 1.6),
    ("útil", 1.6),
    ("recomendo", 2.1),
    ("sucesso", 2.4),
    ("genial", 2.8),
    // en
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("love", 3.2),
    ("loved", 2.9),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("nice", 1.8),
    ("best", 3.2),
    ("happy", 2.7),
    ("beautiful", 2.9),
    ("perfect", 2.7),
    ("thanks", 1.9),
    ("helpful", 1.8),
    ("fun", 2.3),
];

const NEGATIVE: &[(&str, f64)] = &[
    // pt
    ("ruim", -2.2),
    ("pessimo", -3.0),
    ("péssimo", -3.0),
    ("pessima", -3.0),
    ("péssima", -3.0),
    ("horrivel", -3.0),
    ("horrível", -3.0),
    ("odeio", -3.2),
    ("odiei", -3.0),
    ("lixo", -2.7),
    ("chato", -1.8),
    ("chata", -1.8),
    ("triste", -2.1),
    ("pior", -2.8),
    ("fraco", -1.5),
    ("fraca", -1.5),
    ("mentira", -2.0),
    ("mentiroso", -2.4),
    ("vergonha", -2.1),
    ("decepcao", -2.4),
    ("decepção", -2.4),
    ("decepcionante", -2.5),
    ("nojo", -2.8),
    ("medo", -1.9),
    ("errado", -1.6),
    ("problema", -1.5),
    ("raiva", -2.5),
    ("absurdo", -2.0),
    ("golpe", -2.6),
    ("inutil", -2.0),
    ("inútil", -2.0),
    ("chatice", -1.8),
    // en
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("hate", -2.7),
    ("worst", -3.1),
    ("sad", -2.1),
    ("boring", -1.3),
    ("horrible", -2.5),
    ("fake", -2.1),
    ("poor", -2.1),
    ("scam", -2.4),
    ("useless", -1.8),
    ("wrong", -2.1),
];

const NEGATIONS: &[&str] = &[
    "não", "nao", "nunca", "jamais", "nem", "nenhum", "nenhuma", "nada", "sem", "not", "no",
    "never", "dont", "doesnt", "didnt", "cant", "cannot", "isnt", "wasnt", "wont", "neither",
    "nor", "nothing", "without",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("muito", BOOST_INCR),
    ("muita", BOOST_INCR),
    ("super", BOOST_INCR),
    ("bem", BOOST_INCR),
    ("extremamente", BOOST_INCR),
    ("bastante", BOOST_INCR),
    ("tão", BOOST_INCR),
    ("tao", BOOST_INCR),
    ("mega", BOOST_INCR),
    ("very", BOOST_INCR),
    ("really", BOOST_INCR),
    ("extremely", BOOST_INCR),
    ("so", BOOST_INCR),
    ("totally", BOOST_INCR),
    ("pouco", -BOOST_INCR),
    ("meio", -BOOST_INCR),
    ("slightly", -BOOST_INCR),
    ("kinda", -BOOST_INCR),
    ("somewhat", -BOOST_INCR),
];

/// Word valences plus negation and intensifier sets.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// Built-in Portuguese and English lexicon.
    pub fn builtin() -> Self {
        let words = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(w, v)| (w.to_string(), *v))
            .collect();
        Self::with_words(words)
    }

    /// Lexicon with the given valences and the built-in modifier sets.
    /// Valences are clamped to `±MAX_VALENCE`; non-finite ones are dropped.
    pub fn with_words(words: HashMap<String, f64>) -> Self {
        let words = words
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(w, v)| (w, v.clamp(-MAX_VALENCE, MAX_VALENCE)))
            .collect();
        Self {
            words,
            negations: NEGATIONS.iter().map(|s| s.to_string()).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, b)| (w.to_string(), *b)).collect(),
        }
    }

    /// Parse a VADER-format lexicon: `token<TAB>mean<TAB>...` per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Tokens are
    /// lowercased to match normalized text.
    pub fn parse_vader(path: &Path, content: &str) -> AnalysisResult<Self> {
        let mut words = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().trim();
            let mean = fields.next().map(str::trim);

            let valence = match mean.map(str::parse::<f64>) {
                Some(Ok(v)) if v.is_finite() => v,
                _ => {
                    return Err(AnalysisError::LexiconFormat {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        reason: format!("expected token and numeric mean, got {line:?}"),
                    })
                }
            };
            if valence.abs() > MAX_VALENCE {
                return Err(AnalysisError::LexiconFormat {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("valence {valence} outside [-{MAX_VALENCE}, {MAX_VALENCE}]"),
                });
            }
            if token.is_empty() {
                return Err(AnalysisError::LexiconFormat {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: "empty token".to_string(),
                });
            }

            words.insert(token.to_lowercase(), valence);
        }

        Ok(Self::with_words(words))
    }

    /// Load a VADER-format lexicon file.
    pub fn from_vader_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::LexiconIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_vader(path, &content)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn valence(&self, token: &str) -> Option<f64> {
        self.words.get(token).copied()
    }

    /// Compound polarity of whitespace-separated `text`, in `[-1, 1]`.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.valence(token) else {
                continue;
            };

            let window = &tokens[i.saturating_sub(LOOKBACK)..i];
            for (distance, prev) in window.iter().rev().enumerate() {
                if let Some(boost) = self.intensifiers.get(*prev) {
                    let damp = match distance {
                        0 => 1.0,
                        1 => 0.95,
                        _ => 0.9,
                    };
                    let boost = boost * damp;
                    valence += if valence > 0.0 { boost } else { -boost };
                }
            }
            if window.iter().any(|prev| self.negations.contains(*prev)) {
                valence *= NEGATION_SCALAR;
            }

            sum += valence;
        }

        squash(sum)
    }
}

fn squash(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / sum.hypot(ALPHA.sqrt())).clamp(-1.0, 1.0)
}
