//! Collocation Detector (SPEC_FULL.md §4.D): scores word-pairs by t-score
//! and seeds the per-iteration training set.

use crate::corpus::Vocabulary;
use crate::frequency::FrequencyTables;
use crate::keys::PairKey;
use crate::settings::Settings;
use std::collections::HashMap;

/// Pair counts accumulated for one training iteration, keyed the same way
/// as `FrequencyTables` but holding collocation weights instead of raw
/// occurrence counts.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub t_g: HashMap<PairKey, u64>,
    pub t_c: Vec<HashMap<PairKey, u64>>,
}

impl TrainingSet {
    fn ensure_positions(&mut self, n: usize) {
        if self.t_c.len() < n {
            self.t_c.resize_with(n, HashMap::new);
        }
    }

    pub fn clear(&mut self) {
        self.t_g.clear();
        for table in self.t_c.iter_mut() {
            table.clear();
        }
    }

    /// Fold one collocated pair `(w1, w2)`, observed `k` times, into the
    /// n-gram and per-position component tables (SPEC_FULL.md §4.D).
    pub fn add_to_training_set(&mut self, vocabulary: &Vocabulary, w1: &str, w2: &str, k: u64) {
        let Some((c1, g1)) = vocabulary.get(w1) else {
            return;
        };
        let Some((c2, g2)) = vocabulary.get(w2) else {
            return;
        };

        let g_key = PairKey::new(g1.clone(), g2.clone());
        *self.t_g.entry(g_key).or_insert(0) += k;

        let m = c1.len().min(c2.len());
        self.ensure_positions(m);
        for i in 0..m {
            let key = PairKey::new(c1[i].clone(), c2[i].clone());
            *self.t_c[i].entry(key).or_insert(0) += k;
        }
    }
}

/// Score every word-pair in `frequency.f_wp` by t-score; pairs clearing both
/// thresholds seed `training_set` via `add_to_training_set`.
pub fn detect_collocations(
    frequency: &FrequencyTables,
    vocabulary: &Vocabulary,
    settings: &Settings,
    data_len: usize,
    training_set: &mut TrainingSet,
) {
    let n = data_len as f64;
    if n == 0.0 {
        return;
    }

    for (pair, &f_xy) in frequency.f_wp.iter() {
        let w1 = pair.first();
        let w2 = pair.second();
        if !settings.same_words && w1 == w2 {
            continue;
        }

        let f_x = *frequency.f_w.get(w1).unwrap_or(&0) as f64;
        let f_y = *frequency.f_w.get(w2).unwrap_or(&0) as f64;
        let f_xy_f = f_xy as f64;

        let t_score = (f_xy_f - (f_x * f_y) / n) / f_xy_f.sqrt();

        if t_score > settings.t_score_min && f_xy > settings.frequency_min {
            training_set.add_to_training_set(vocabulary, w1, w2, f_xy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, Poem};
    use crate::transcriber::test_support::StubTranscriber;

    fn corpus_for_collocations() -> (Vec<crate::corpus::LineRecord>, Vocabulary, Settings) {
        let t = StubTranscriber::new([("light", "laɪt"), ("night", "naɪt"), ("dog", "dɔg")]);
        let mut corpus = Corpus::new();
        let mut settings = Settings::for_lang("en");
        settings.t_score_min = 0.0;
        settings.frequency_min = 0;
        settings.window = 5;
        for _ in 0..5 {
            let poem = Poem::Lines(vec!["a light".to_string(), "a night".to_string()]);
            corpus.add_poem(&poem, &t, &settings, None).unwrap();
        }
        (corpus.data, corpus.vocabulary, settings)
    }

    #[test]
    fn strongly_collocated_pair_seeds_training_set() {
        let (data, vocab, settings) = corpus_for_collocations();
        let freq = FrequencyTables::compute(&data, &vocab, &settings);
        let mut training_set = TrainingSet::default();
        detect_collocations(&freq, &vocab, &settings, data.len(), &mut training_set);

        let g_key = PairKey::new("ght".to_string(), "ght".to_string());
        assert!(training_set.t_g.contains_key(&g_key));
    }

    #[test]
    fn same_words_false_skips_self_pairs() {
        let t = StubTranscriber::new([("light", "laɪt")]);
        let mut corpus = Corpus::new();
        let mut settings = Settings::for_lang("en");
        settings.same_words = false;
        settings.t_score_min = -100.0;
        settings.frequency_min = 0;
        for _ in 0..3 {
            let poem = Poem::Lines(vec!["a light".to_string(), "a light".to_string()]);
            corpus.add_poem(&poem, &t, &settings, None).unwrap();
        }
        let freq = FrequencyTables::compute(&corpus.data, &corpus.vocabulary, &settings);
        let mut training_set = TrainingSet::default();
        detect_collocations(
            &freq,
            &corpus.vocabulary,
            &settings,
            corpus.data.len(),
            &mut training_set,
        );
        assert!(training_set.t_g.is_empty());
    }
}
