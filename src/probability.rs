//! Probability Estimator (SPEC_FULL.md §4.E): turns training-set pair
//! counts into per-keyspace pair probabilities.

use crate::collocation::TrainingSet;
use crate::keys::PairKey;
use std::collections::HashMap;

/// Per-position and n-gram pair probabilities, carried across training
/// iterations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityTables {
    pub p_g: HashMap<PairKey, f64>,
    pub p_c: Vec<HashMap<PairKey, f64>>,
}

impl ProbabilityTables {
    /// Re-derive every table from `training_set`'s pair counts and the
    /// corpus-wide per-keyspace frequencies, returning `true` iff any
    /// entry differs from the previous tables ("improved").
    pub fn estimate(
        &mut self,
        training_set: &TrainingSet,
        f_g: &HashMap<String, u64>,
        n_g: u64,
        f_c: &[HashMap<String, u64>],
        n_c: &[u64],
    ) -> bool {
        let previous = std::mem::take(self);

        let new_p_g = estimate_keyspace(&training_set.t_g, f_g, n_g);
        let mut new_p_c = Vec::with_capacity(training_set.t_c.len());
        for (i, t_i) in training_set.t_c.iter().enumerate() {
            let f_i = f_c.get(i).cloned().unwrap_or_default();
            let n_i = n_c.get(i).copied().unwrap_or(0);
            new_p_c.push(estimate_keyspace(t_i, &f_i, n_i));
        }

        let improved = new_p_g != previous.p_g || new_p_c != previous.p_c;

        self.p_g = new_p_g;
        self.p_c = new_p_c;
        improved
    }
}

/// `p[(a,b)] = ft_ab / (ft_ab + fc_a * fc_b)` for one keyspace, where
/// `ft_ab` is the pair's share of total training weight and `fc_a`/`fc_b`
/// are the elements' corpus-wide frequency shares.
fn estimate_keyspace(
    t_x: &HashMap<PairKey, u64>,
    f_x: &HashMap<String, u64>,
    n_x: u64,
) -> HashMap<PairKey, f64> {
    let mut result = HashMap::new();
    let t_total: u64 = t_x.values().sum();
    if t_total == 0 || n_x == 0 {
        return result;
    }
    let t_total = t_total as f64;
    let n_x = n_x as f64;

    for (pair, &weight) in t_x.iter() {
        let ft_ab = weight as f64 / t_total;
        let fc_a = *f_x.get(pair.first()).unwrap_or(&0) as f64 / n_x;
        let fc_b = *f_x.get(pair.second()).unwrap_or(&0) as f64 / n_x;
        let denom = ft_ab + fc_a * fc_b;
        if denom > 0.0 {
            result.insert(pair.clone(), ft_ab / denom);
        }
    }
    result
}
