//! Corpus Frequency Counter (SPEC_FULL.md §4.C).

use crate::corpus::LineRecord;
use crate::keys::PairKey;
use crate::settings::Settings;
use std::collections::HashMap;

/// Raw frequency tables computed once per `train_model()` call.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTables {
    pub f_w: HashMap<String, u64>,
    pub f_wp: HashMap<PairKey, u64>,
    pub f_g: HashMap<String, u64>,
    pub n_g: u64,
    /// Indexed by position; `f_c[i]` is the frequency table for component
    /// position `i`.
    pub f_c: Vec<HashMap<String, u64>>,
    pub n_c: Vec<u64>,
}

impl FrequencyTables {
    fn ensure_positions(&mut self, n: usize) {
        if self.f_c.len() < n {
            self.f_c.resize_with(n, HashMap::new);
        }
        if self.n_c.len() < n {
            self.n_c.resize(n, 0);
        }
    }

    /// Single linear sweep over `data`, accumulating word, n-gram,
    /// per-position component and word-pair frequencies.
    pub fn compute(
        data: &[LineRecord],
        vocabulary: &crate::corpus::Vocabulary,
        settings: &Settings,
    ) -> Self {
        let mut tables = FrequencyTables::default();

        for record in data.iter() {
            let Some(word) = record.rhyme_word.as_ref() else {
                continue;
            };
            // Frequencies are counted against the vocabulary's per-word-type
            // fingerprint, not the line's own transcription, so that a word
            // repeated across many lines contributes one consistent
            // component/ngram identity each time (SPEC_FULL.md §4.C).
            let Some((components, ngram)) = vocabulary.get(word) else {
                continue;
            };

            *tables.f_w.entry(word.clone()).or_insert(0) += 1;
            *tables.f_g.entry(ngram.clone()).or_insert(0) += 1;
            tables.n_g += 1;

            tables.ensure_positions(components.len());
            for (i, component) in components.iter().enumerate() {
                *tables.f_c[i].entry(component.clone()).or_insert(0) += 1;
                tables.n_c[i] += 1;
            }
        }

        for (i, record) in data.iter().enumerate() {
            if record.rhyme_word.is_none() {
                continue;
            }
            for d in 1..=settings.window as usize {
                let Some(j) = i.checked_add(d) else { break };
                let Some(neighbor) = data.get(j) else { break };
                if neighbor.poem_id != record.poem_id {
                    break;
                }
                if settings.stanza_limit && neighbor.stanza_id != record.stanza_id {
                    continue;
                }
                let Some(neighbor_word) = neighbor.rhyme_word.as_ref() else {
                    continue;
                };
                let word = record.rhyme_word.as_ref().unwrap();
                let key = PairKey::new(word.clone(), neighbor_word.clone());
                *tables.f_wp.entry(key).or_insert(0) += 1;
            }
        }

        tables
    }
}
