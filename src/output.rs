//! Output Formatter (SPEC_FULL.md §4.I): renders a detection pass as
//! neighbor lists, rhyme chains, or an ABBA-style scheme.

use crate::detector::RhymeMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    NeighborLists,
    Chains,
    Abba,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutput {
    /// One slot per line; each holds its sorted rhyming-line indices.
    NeighborLists(Vec<Vec<usize>>),
    /// Deduplicated rhyme chains (each a sorted list of line indices),
    /// sorted by their first element.
    Chains(Vec<Vec<usize>>),
    /// One slot per line: the 1-based index of the chain containing it, or
    /// `None` if the line rhymes with nothing.
    Abba(Vec<Option<usize>>),
}

fn chains(rhymes: &RhymeMap) -> Vec<Vec<usize>> {
    let mut unique: BTreeSet<Vec<usize>> = BTreeSet::new();
    for (&i, neighbors) in rhymes.iter() {
        let mut chain: Vec<usize> = neighbors.iter().copied().collect();
        chain.push(i);
        chain.sort_unstable();
        chain.dedup();
        unique.insert(chain);
    }
    let mut result: Vec<Vec<usize>> = unique.into_iter().collect();
    result.sort_by_key(|c| c.first().copied().unwrap_or(usize::MAX));
    result
}

/// Render a detection pass in `format`, against a corpus of `line_count`
/// lines.
pub fn format(rhymes: &RhymeMap, line_count: usize, format: OutputFormat) -> TagOutput {
    match format {
        OutputFormat::NeighborLists => {
            let mut out = Vec::with_capacity(line_count);
            for i in 0..line_count {
                out.push(
                    rhymes
                        .get(&i)
                        .map(|s| s.iter().copied().collect())
                        .unwrap_or_default(),
                );
            }
            TagOutput::NeighborLists(out)
        }
        OutputFormat::Chains => TagOutput::Chains(chains(rhymes)),
        OutputFormat::Abba => {
            let built = chains(rhymes);
            let mut out = vec![None; line_count];
            for (chain_idx, chain) in built.iter().enumerate() {
                for &line in chain {
                    if line < out.len() {
                        out[line] = Some(chain_idx + 1);
                    }
                }
            }
            TagOutput::Abba(out)
        }
    }
}
