//! Engine & persistence (SPEC_FULL.md §6, §7, §9): `RhymeEngine` is the
//! library's public surface, `PersistedModel` its JSON-on-disk shape.

use crate::corpus::{Corpus, Poem};
use crate::detector::detect;
use crate::error::{RhymeError, Result};
use crate::keys::PairKey;
use crate::output::{self, OutputFormat, TagOutput};
use crate::probability::ProbabilityTables;
use crate::settings::Settings;
use crate::training::{train, TrainingReport};
use crate::transcriber::Transcriber;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// A transcriber that always errors; used internally when `settings
/// .transcribed` is true and callers supply their own IPA, so there is
/// nothing for a real transcriber to do.
struct NoopTranscriber;

impl Transcriber for NoopTranscriber {
    fn ipa(&self, _text: &str, _lang: &str) -> Result<String> {
        Err(RhymeError::Configuration(
            "no transcriber configured; settings.transcribed requires supplying ipa_lines".into(),
        ))
    }
}

/// Per-call overrides for `RhymeEngine::tag`, mirroring the reference
/// tagger's keyword-argument override pattern at tagging time.
#[derive(Debug, Clone, Default)]
pub struct TagOverrides {
    pub window: Option<u32>,
    pub stanza_limit: Option<bool>,
    pub same_words: Option<bool>,
    pub prob_ipa_min: Option<f64>,
    pub prob_ngram_min: Option<f64>,
    pub ngram: Option<u32>,
    pub radif: Option<f64>,
}

impl TagOverrides {
    fn apply(&self, base: &Settings) -> Settings {
        let mut s = base.clone();
        if let Some(v) = self.window {
            s.window = v;
        }
        if let Some(v) = self.stanza_limit {
            s.stanza_limit = v;
        }
        if let Some(v) = self.same_words {
            s.same_words = v;
        }
        if let Some(v) = self.prob_ipa_min {
            s.prob_ipa_min = v;
        }
        if let Some(v) = self.prob_ngram_min {
            s.prob_ngram_min = v;
        }
        if let Some(v) = self.ngram {
            s.ngram = v;
        }
        if let Some(v) = self.radif {
            s.radif = v;
        }
        s
    }
}

/// The JSON-on-disk shape of a trained model (SPEC_FULL.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedModel {
    settings: Settings,
    probs: HashMap<String, HashMap<String, f64>>,
}

fn probabilities_to_persisted(probabilities: &ProbabilityTables) -> HashMap<String, HashMap<String, f64>> {
    let mut probs = HashMap::new();

    let g_table: HashMap<String, f64> = probabilities
        .p_g
        .iter()
        .map(|(k, v)| (k.to_json_key(), *v))
        .collect();
    probs.insert("g".to_string(), g_table);

    for (i, table) in probabilities.p_c.iter().enumerate() {
        let position_table: HashMap<String, f64> =
            table.iter().map(|(k, v)| (k.to_json_key(), *v)).collect();
        probs.insert(i.to_string(), position_table);
    }

    probs
}

fn persisted_to_probabilities(
    probs: &HashMap<String, HashMap<String, f64>>,
) -> Result<ProbabilityTables> {
    let mut tables = ProbabilityTables::default();

    if let Some(g_table) = probs.get("g") {
        for (key, &value) in g_table {
            let pair = PairKey::from_json_key(key).map_err(|reason| RhymeError::ModelParse {
                key: key.clone(),
                reason,
            })?;
            tables.p_g.insert(pair, value);
        }
    }

    let mut positions: Vec<u16> = probs
        .keys()
        .filter(|k| k.as_str() != "g")
        .map(|k| {
            k.parse::<u16>().map_err(|_| RhymeError::ModelParse {
                key: k.clone(),
                reason: "expected a non-negative integer position key".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    positions.sort_unstable();

    if let Some(&max_pos) = positions.last() {
        tables.p_c = vec![HashMap::new(); max_pos as usize + 1];
        for pos in positions {
            if let Some(position_table) = probs.get(&pos.to_string()) {
                for (key, &value) in position_table {
                    let pair =
                        PairKey::from_json_key(key).map_err(|reason| RhymeError::ModelParse {
                            key: key.clone(),
                            reason,
                        })?;
                    tables.p_c[pos as usize].insert(pair, value);
                }
            }
        }
    }

    Ok(tables)
}

/// Lifecycle stage of a `RhymeEngine`, enforced by its public methods
/// (SPEC_FULL.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Building,
    Trained,
}

/// The library's public surface: accumulate a training corpus, train it to
/// a fixed point (or load a previously trained model), then tag new poems.
pub struct RhymeEngine {
    settings: Settings,
    transcriber: Box<dyn Transcriber>,
    corpus: Corpus,
    probabilities: ProbabilityTables,
    stage: Stage,
}

impl RhymeEngine {
    /// Start a new, untrained model. `transcriber` is required unless
    /// `settings.transcribed` is true, in which case `None` is accepted and
    /// callers must supply IPA directly to `add_to_model`/`tag`.
    pub fn new_model(settings: Settings, transcriber: Option<Box<dyn Transcriber>>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            transcriber: transcriber.unwrap_or_else(|| Box::new(NoopTranscriber)),
            corpus: Corpus::new(),
            probabilities: ProbabilityTables::default(),
            stage: Stage::Building,
        })
    }

    /// Ingest one poem into the training corpus. Repeatable. `ipa_lines`
    /// must be supplied, one entry per flattened line, when
    /// `settings.transcribed` is true.
    pub fn add_to_model(&mut self, poem: &Poem, ipa_lines: Option<&[String]>) -> Result<()> {
        debug!(lines_so_far = self.corpus.data.len(), "ingesting poem");
        self.corpus
            .add_poem(poem, self.transcriber.as_ref(), &self.settings, ipa_lines)
    }

    /// Train the accumulated corpus to a fixed point.
    pub fn train_model(&mut self) -> Result<TrainingReport> {
        if self.corpus.data.is_empty() {
            return Err(RhymeError::EmptyCorpus);
        }
        let report = train(
            &self.corpus.data,
            &self.corpus.vocabulary,
            &self.settings,
            &mut self.probabilities,
        );
        self.stage = Stage::Trained;
        Ok(report)
    }

    /// Persist settings and trained probabilities as JSON.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let persisted = PersistedModel {
            settings: self.settings.clone(),
            probs: probabilities_to_persisted(&self.probabilities),
        };
        let content = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load a previously trained model from JSON.
    pub fn load_model<P: AsRef<Path>>(path: P, transcriber: Option<Box<dyn Transcriber>>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let persisted: PersistedModel = serde_json::from_str(&content)?;

        if persisted.settings.ngram != 0
            && persisted.settings.ngram == persisted.settings.ngram_length as u32
        {
            warn!(
                ngram = persisted.settings.ngram,
                ngram_length = persisted.settings.ngram_length,
                "loaded model has ngram == ngram_length; this may be a model saved by a writer \
                 that always mirrors ngram_length into ngram rather than an intentionally \
                 configured value"
            );
        }

        let probabilities = persisted_to_probabilities(&persisted.probs)?;

        Ok(Self {
            settings: persisted.settings,
            transcriber: transcriber.unwrap_or_else(|| Box::new(NoopTranscriber)),
            corpus: Corpus::new(),
            probabilities,
            stage: Stage::Trained,
        })
    }

    /// Tag a poem, grouping its rhyming lines, against a freshly-built
    /// per-call corpus (no state crosses tagging requests).
    pub fn tag(
        &self,
        poem: &Poem,
        ipa_lines: Option<&[String]>,
        format: OutputFormat,
        overrides: Option<TagOverrides>,
    ) -> Result<TagOutput> {
        if self.stage != Stage::Trained {
            return Err(RhymeError::UnloadedModel);
        }

        let settings = overrides
            .map(|o| o.apply(&self.settings))
            .unwrap_or_else(|| self.settings.clone());

        let mut corpus = Corpus::new();
        corpus.add_poem(poem, self.transcriber.as_ref(), &settings, ipa_lines)?;

        let ngram_enabled = settings.ngram != 0;
        let rhymes = detect(
            &corpus.data,
            &corpus.vocabulary,
            &settings,
            &self.probabilities,
            ngram_enabled,
        );

        Ok(output::format(&rhymes, corpus.data.len(), format))
    }
}
