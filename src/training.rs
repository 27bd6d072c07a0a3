//! Training Loop (SPEC_FULL.md §4.H): orchestrates
//! frequency → collocation → probability → detection to a fixed point.

use crate::collocation::{detect_collocations, TrainingSet};
use crate::corpus::{LineRecord, Vocabulary};
use crate::detector::detect;
use crate::frequency::FrequencyTables;
use crate::probability::ProbabilityTables;
use crate::settings::Settings;
use tracing::{debug, info};

/// What happened during `train`: how many iterations ran and whether a
/// fixed point was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingReport {
    pub iterations: u32,
    pub reached_equilibrium: bool,
}

/// Run the training loop over `data`/`vocabulary`, mutating `probabilities`
/// in place and returning a summary of how it terminated.
pub fn train(
    data: &[LineRecord],
    vocabulary: &Vocabulary,
    settings: &Settings,
    probabilities: &mut ProbabilityTables,
) -> TrainingReport {
    let frequency = FrequencyTables::compute(data, vocabulary, settings);

    let mut training_set = TrainingSet::default();
    detect_collocations(&frequency, vocabulary, settings, data.len(), &mut training_set);

    for t in 1..=settings.max_iter {
        let improved = probabilities.estimate(
            &training_set,
            &frequency.f_g,
            frequency.n_g,
            &frequency.f_c,
            &frequency.n_c,
        );

        if !improved {
            info!(iteration = t, "training reached equilibrium");
            return TrainingReport {
                iterations: t,
                reached_equilibrium: true,
            };
        }

        if t == settings.max_iter {
            info!(iteration = t, "training stopped without reaching equilibrium");
            return TrainingReport {
                iterations: t,
                reached_equilibrium: false,
            };
        }

        let ngram_enabled = settings.ngram != 0 && t >= settings.ngram;
        let rhymes = detect(data, vocabulary, settings, probabilities, ngram_enabled);

        training_set.clear();
        for (&i, neighbors) in rhymes.iter() {
            for &j in neighbors.iter() {
                if i > j {
                    continue;
                }
                let Some(w1) = data[i].rhyme_word.as_ref() else {
                    continue;
                };
                let Some(w2) = data[j].rhyme_word.as_ref() else {
                    continue;
                };
                training_set.add_to_training_set(vocabulary, w1, w2, 1);
            }
        }

        debug!(iteration = t, pairs = rhymes.len(), "training iteration complete");
    }

    TrainingReport {
        iterations: settings.max_iter,
        reached_equilibrium: false,
    }
}
