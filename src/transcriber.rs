//! The external IPA transcriber boundary (SPEC_FULL.md §6).
//!
//! The engine never runs grapheme-to-phoneme transcription itself; it calls
//! out to whatever implements `Transcriber` and batches one call per poem,
//! joining lines with [`LINE_SEPARATOR`] so a single process round-trip
//! covers a whole poem instead of one per line.

use crate::error::{RhymeError, Result};

/// Sentinel joined between lines before a single batched transcription call.
pub const LINE_SEPARATOR: &str = " {.SEPARATORLINER.} ";

/// A source of IPA transcriptions for orthographic text.
///
/// Implementations are expected to emit primary stress `ˈ`, optional
/// secondary stress `ˌ`, length marks `ː`/`ˑ`, `U+0329` for syllabic
/// consonants, and a tie character (`U+0361` or ASCII `_`) for diphthongs
/// realized as a single peak. Batched calls must preserve line order.
pub trait Transcriber {
    fn ipa(&self, text: &str, lang: &str) -> Result<String>;
}

/// Transcribe a whole poem's lines in one call, using [`LINE_SEPARATOR`] as
/// the join sentinel, and split the result back into per-line IPA strings.
///
/// Looks up the separator's own IPA once so lines aren't accidentally split
/// in the middle of a transcribed sentinel (the separator's transcription
/// may not equal its orthographic form once sandwiched between real words).
pub fn transcribe_poem(
    transcriber: &dyn Transcriber,
    lines: &[String],
    lang: &str,
) -> Result<Vec<String>> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    if lines.len() == 1 {
        return Ok(vec![transcriber.ipa(&lines[0], lang)?]);
    }

    let joined = lines.join(LINE_SEPARATOR);
    let separator_ipa = transcriber.ipa(LINE_SEPARATOR, lang)?;
    let batch_ipa = transcriber.ipa(&joined, lang)?;

    let parts: Vec<&str> = batch_ipa.split(separator_ipa.trim()).collect();
    if parts.len() != lines.len() {
        return Err(RhymeError::Transcriber(format!(
            "expected {} lines after splitting on the separator IPA, got {}",
            lines.len(),
            parts.len()
        )));
    }
    Ok(parts.into_iter().map(|s| s.trim().to_string()).collect())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;

    /// A deterministic in-memory `Transcriber` for tests: a fixed lookup
    /// table of whole strings to IPA, with a literal pass-through fallback
    /// for anything it composes itself (the separator, joined batches).
    pub struct StubTranscriber {
        table: HashMap<String, String>,
    }

    impl StubTranscriber {
        pub fn new(pairs: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
            Self {
                table: pairs
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl Transcriber for StubTranscriber {
        fn ipa(&self, text: &str, _lang: &str) -> Result<String> {
            if text == LINE_SEPARATOR {
                return Ok(" SEP ".to_string());
            }
            if let Some(v) = self.table.get(text) {
                return Ok(v.clone());
            }
            // Compose a batched call out of per-word lookups, joined the
            // same way the real transcriber would join tokens.
            let words: Vec<&str> = text.split(LINE_SEPARATOR).collect();
            let ipas: Result<Vec<String>> = words
                .iter()
                .map(|w| {
                    self.table.get(*w).cloned().ok_or_else(|| {
                        RhymeError::Transcriber(format!("no stub IPA for {w:?}"))
                    })
                })
                .collect();
            Ok(ipas?.join(" SEP "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::StubTranscriber;
    use super::*;

    #[test]
    fn single_line_skips_batching() {
        let t = StubTranscriber::new([("cat", "kæt")]);
        let out = transcribe_poem(&t, &["cat".to_string()], "en").unwrap();
        assert_eq!(out, vec!["kæt"]);
    }

    #[test]
    fn multi_line_splits_back_to_original_count() {
        let t = StubTranscriber::new([("cat", "kæt"), ("hat", "hæt"), ("bat", "bæt")]);
        let lines = vec!["cat".to_string(), "hat".to_string(), "bat".to_string()];
        let out = transcribe_poem(&t, &lines, "en").unwrap();
        assert_eq!(out, vec!["kæt", "hæt", "bæt"]);
    }

    #[test]
    fn empty_poem_yields_no_lines() {
        let t = StubTranscriber::new([]);
        let out = transcribe_poem(&t, &[], "en").unwrap();
        assert!(out.is_empty());
    }
}
