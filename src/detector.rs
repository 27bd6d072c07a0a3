//! Windowed Rhyme Detector & Chain Linker (SPEC_FULL.md §4.G).

use crate::corpus::{LineRecord, Vocabulary};
use crate::probability::ProbabilityTables;
use crate::scorer::{component_score, ngram_score};
use crate::settings::Settings;
use std::collections::{BTreeSet, HashMap};

/// `line index -> sorted set of rhyming line indices`, built by one
/// `detect` pass.
pub type RhymeMap = HashMap<usize, BTreeSet<usize>>;

fn link(rhymes: &mut RhymeMap, a: usize, b: usize) {
    rhymes.entry(a).or_default().insert(b);
    rhymes.entry(b).or_default().insert(a);
}

fn skip_neighbor(data: &[LineRecord], i: usize, j: usize, settings: &Settings) -> bool {
    if j >= data.len() {
        return true;
    }
    let li = &data[i];
    let lj = &data[j];
    if li.poem_id != lj.poem_id {
        return true;
    }
    if settings.stanza_limit && li.stanza_id != lj.stanza_id {
        return true;
    }
    if lj.rhyme_word.is_none() {
        return true;
    }
    if !settings.same_words && li.rhyme_word == lj.rhyme_word {
        return true;
    }
    false
}

/// Run one windowed detection pass over `data`. `ngram_enabled` gates Phase
/// 2 (n-gram fallback), independent of training-iteration bookkeeping,
/// which the caller (training loop or tagging entry point) resolves.
pub fn detect(
    data: &[LineRecord],
    vocabulary: &Vocabulary,
    settings: &Settings,
    probabilities: &ProbabilityTables,
    ngram_enabled: bool,
) -> RhymeMap {
    let mut rhymes: RhymeMap = HashMap::new();
    let window = settings.window as usize;

    for i in 0..data.len() {
        if data[i].rhyme_word.is_none() {
            continue;
        }

        // Phase 1: component-based scoring with transitive chain closure.
        for j in (i + 1)..=(i + window) {
            if skip_neighbor(data, i, j, settings) {
                continue;
            }

            let score = component_score(
                &data[i].components,
                &data[j].components,
                data[i].reduplicant_length,
                data[j].reduplicant_length,
                probabilities,
                settings.length_penalty,
            );

            if score > settings.prob_ipa_min {
                let existing: Vec<usize> =
                    rhymes.get(&i).map(|s| s.iter().copied().collect()).unwrap_or_default();
                link(&mut rhymes, i, j);
                for k in existing {
                    if k != j {
                        link(&mut rhymes, j, k);
                    }
                }
            }
        }

        // Phase 2: n-gram fallback, only when i found nothing in Phase 1.
        if !ngram_enabled || rhymes.contains_key(&i) {
            continue;
        }

        for j in (i + 1)..=(i + window) {
            if skip_neighbor(data, i, j, settings) {
                continue;
            }
            if rhymes.contains_key(&j) {
                continue;
            }

            let w1 = data[i].rhyme_word.as_ref().unwrap();
            let w2 = data[j].rhyme_word.as_ref().unwrap();
            let Some((_, g1)) = vocabulary.get(w1) else {
                continue;
            };
            let Some((_, g2)) = vocabulary.get(w2) else {
                continue;
            };

            let score = ngram_score(
                g1,
                g2,
                data[i].reduplicant_length,
                data[j].reduplicant_length,
                probabilities,
                settings.length_penalty,
            );

            if score > settings.prob_ngram_min {
                link(&mut rhymes, i, j);
            }
        }
    }

    rhymes
}
