//! Word tokenization, rhyme-word extraction, and radif stripping
//! (SPEC_FULL.md §4.B, §9).

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Punctuation the tokenizer treats as boundary-only, never part of a word.
const PUNCT_CHARS: &str = "¿«»¡…\"\u{201C}\u{201D}()[]–—'\u{2019}.,;:!?-";

fn is_punct_char(c: char) -> bool {
    c.is_ascii_punctuation() || PUNCT_CHARS.contains(c)
}

fn is_pure_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_punct_char)
}

/// Split a line into Unicode word-boundary tokens, dropping pure whitespace.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_word_bounds()
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty())
        .collect()
}

fn ends_with_possessive_suffix(line: &str) -> bool {
    let trimmed = line.trim_end();
    match trimmed.rfind(['\'', '\u{2019}']) {
        Some(pos) => {
            let suffix = &trimmed[pos + '\''.len_utf8()..];
            !suffix.is_empty() && !suffix.chars().any(is_punct_char)
        }
        None => false,
    }
}

/// Tokenize a line down to its content words, dropping pure-punctuation
/// tokens but otherwise leaving case and possessive suffixes untouched. This
/// is the raw, case-preserving token list that radif-stripping operates on
/// (mirroring the reference `_delete_radif`'s own tokenize-then-filter pass,
/// which runs before any lowercasing or possessive merge happens).
pub fn raw_tokens(line: &str) -> Vec<String> {
    tokenize(line)
        .into_iter()
        .filter(|t| !is_pure_punctuation(t))
        .collect()
}

/// Tokenize a line down to its lowercased content words, with possessive
/// `'s`-style suffixes merged back onto the preceding token. This is the
/// second-pass tokenization run on a (possibly radif-stripped) line to
/// derive its rhyme word; its last element is the line's rhyme word.
pub fn significant_tokens(line: &str) -> Vec<String> {
    let significant = raw_tokens(line);
    if significant.is_empty() {
        return Vec::new();
    }
    let mut tokens: Vec<String> = significant.iter().map(|t| t.to_lowercase()).collect();
    if ends_with_possessive_suffix(line) && tokens.len() >= 2 {
        let n = tokens.len();
        let merged = format!("{}{}", tokens[n - 2], tokens[n - 1]);
        tokens.truncate(n - 2);
        tokens.push(merged);
    }
    tokens
}

/// Derive the line's rhyme word: the lowercased last non-punctuation token,
/// with possessive `'s`-style suffixes merged back onto the preceding token.
pub fn rhyme_word(line: &str) -> Option<String> {
    significant_tokens(line).last().cloned()
}

/// Strip a radif (a word repeated at the end of every line of a form) from
/// `lines`, in place. Each element is the *raw* (case-preserving,
/// un-merged) token list for one line, in original order, as produced by
/// [`raw_tokens`]; the candidate radif is always the line's last token.
///
/// `radif` is a fraction threshold in `[0,1]`; values `> 1.0` disable
/// stripping. Bounded by the number of distinct trailing tokens observed up
/// front, guaranteeing termination (SPEC_FULL.md §9).
pub fn strip_radif(lines: &mut [Vec<String>], radif: f64) {
    if radif > 1.0 {
        return;
    }

    let effective_threshold = if lines.len() <= 2 && radif <= 0.5 {
        0.51
    } else {
        radif
    };

    let cap = {
        let mut distinct: HashMap<&str, ()> = HashMap::new();
        for l in lines.iter() {
            if let Some(last) = l.last() {
                distinct.insert(last.as_str(), ());
            }
        }
        distinct.len()
    };

    let total = lines.len();
    if total == 0 {
        return;
    }

    let mut rounds = 0usize;
    loop {
        if rounds > cap {
            debug_assert!(false, "radif stripping loop exceeded its termination cap");
            break;
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for l in lines.iter() {
            if let Some(last) = l.last() {
                *counts.entry(last.clone()).or_insert(0) += 1;
            }
        }

        // Every token whose trailing share clears the threshold is stripped
        // in the same round, mirroring the reference's single fin_words_f
        // sweep per iteration.
        let candidates: Vec<String> = counts
            .into_iter()
            .filter(|(_, c)| (*c as f64) / (total as f64) >= effective_threshold)
            .map(|(tok, _)| tok)
            .collect();

        if candidates.is_empty() {
            break;
        }

        for l in lines.iter_mut() {
            if let Some(last) = l.last() {
                if candidates.iter().any(|c| c == last) {
                    l.pop();
                }
            }
        }
        rounds += 1;
    }
}
