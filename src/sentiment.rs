//! Rule-based sentiment labelling.
//!
//! A [`Lexicon`] holds two disjoint sets of normalized stems. The score of a
//! text is the number of distinct positive stems it contains minus the number
//! of distinct negative stems; the sign of the score is the label.
//!
//! Texts must already be normalized (see [`crate::normalize::normalize`])
//! because the stems are stored lower-cased and accent-folded.
//!
//! # Lexicon files
//!
//! The built-in vocabulary can be replaced with a YAML file:
//!
//! ```yaml
//! positive: [sucesso, inovação, crescimento]
//! negative: [crise, queda]
//! ```
//!
//! Terms are normalized on load, so accented spellings collapse onto their
//! folded stem.

use crate::error::LexiconError;
use crate::models::Sentiment;
use crate::normalize::normalize;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{info, instrument};

/// Economic and social progress vocabulary.
pub const POSITIVE_STEMS: &[&str] = &[
    "avanco",
    "sucesso",
    "beneficio",
    "inovacao",
    "oportunidade",
    "melhoria",
    "positivo",
    "crescimento",
    "lider",
    "premio",
    "recorde",
    "aprovado",
    "parceria",
    "investimento",
    "emprego",
    "eficiencia",
    "seguranca",
    "educacao",
    "saude",
    "desenvolvimento",
];

/// Crisis and failure vocabulary.
pub const NEGATIVE_STEMS: &[&str] = &[
    "crise",
    "queda",
    "fracasso",
    "falha",
    "problema",
    "risco",
    "ameaca",
    "vulneravel",
    "negativo",
    "crime",
    "golpe",
    "investigacao",
    "vazamento",
    "demissao",
    "corte",
    "perda",
    "atraso",
    "erro",
    "polemica",
    "prejuizo",
    "ineficiencia",
];

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
}

/// Positive and negative keyword sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from raw terms, normalizing each one.
    ///
    /// Fails with [`LexiconError::Overlap`] if a normalized term lands in both
    /// sets.
    pub fn new<P, N>(positive: P, negative: N) -> Result<Self, LexiconError>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let positive = normalize_terms(positive);
        let negative = normalize_terms(negative);

        let overlap: BTreeSet<String> = positive.intersection(&negative).cloned().collect();
        if !overlap.is_empty() {
            return Err(LexiconError::Overlap(overlap.into_iter().collect()));
        }

        Ok(Self { positive, negative })
    }

    /// Parse a lexicon from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_yaml::from_str(yaml)?;
        Self::new(file.positive, file.negative)
    }

    /// Load a lexicon from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        let lexicon = Self::from_yaml(&yaml)?;
        info!(
            positive = lexicon.positive.len(),
            negative = lexicon.negative.len(),
            "Loaded lexicon"
        );
        Ok(lexicon)
    }

    pub fn positive(&self) -> &HashSet<String> {
        &self.positive
    }

    pub fn negative(&self) -> &HashSet<String> {
        &self.negative
    }

    /// Distinct positive hits minus distinct negative hits.
    pub fn score(&self, text: &str) -> i32 {
        let tokens: HashSet<&str> = text.split_whitespace().collect();
        let pos = tokens.iter().filter(|t| self.positive.contains(**t)).count();
        let neg = tokens.iter().filter(|t| self.negative.contains(**t)).count();
        pos as i32 - neg as i32
    }

    /// Label a normalized text.
    pub fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_score(self.score(text))
    }

    /// Label each text independently, in input order.
    pub fn classify_batch<I>(&self, texts: I) -> Vec<Sentiment>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|t| self.classify(t.as_ref()))
            .collect()
    }
}

impl Default for Lexicon {
    /// The built-in Portuguese vocabulary.
    fn default() -> Self {
        Self {
            positive: POSITIVE_STEMS.iter().map(|s| s.to_string()).collect(),
            negative: NEGATIVE_STEMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn normalize_terms<I>(terms: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
