//! Poem ingestion: binds lines to `LineRecord`s and builds the rhyme
//! vocabulary (SPEC_FULL.md §3, §4.B).

use crate::error::Result;
use crate::ipa::{extract_fingerprint, FingerprintSettings};
use crate::settings::Settings;
use crate::tokenizer;
use crate::transcriber::{transcribe_poem, Transcriber};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// A poem as fed to `add_to_model`/`tag`: either a flat list of lines, or
/// lines grouped into stanzas.
#[derive(Debug, Clone)]
pub enum Poem {
    Lines(Vec<String>),
    Stanzas(Vec<Vec<String>>),
}

impl Poem {
    /// Flatten into `(line, stanza_id)` pairs in reading order.
    fn flatten(&self) -> Vec<(String, u32)> {
        match self {
            Poem::Lines(lines) => lines.iter().map(|l| (l.clone(), 0)).collect(),
            Poem::Stanzas(stanzas) => stanzas
                .iter()
                .enumerate()
                .flat_map(|(stanza_id, lines)| {
                    lines
                        .iter()
                        .map(move |l| (l.clone(), stanza_id as u32))
                        .collect::<Vec<_>>()
                })
                .collect(),
        }
    }
}

/// One corpus line, in insertion order (SPEC_FULL.md §3).
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub rhyme_word: Option<String>,
    pub poem_id: u32,
    pub stanza_id: u32,
    pub components: Vec<String>,
    pub reduplicant_length: f32,
}

/// `rhyme_word -> (components, final_ngram)`.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: HashMap<String, (Vec<String>, String)>,
}

impl Vocabulary {
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&(Vec<String>, String)> {
        self.entries.get(word)
    }

    pub fn insert(&mut self, word: String, components: Vec<String>, ngram: String) {
        self.entries.entry(word).or_insert((components, ngram));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The last `ngram_length` characters of `word` (or the whole word if
/// shorter).
pub fn final_ngram(word: &str, ngram_length: usize) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() >= ngram_length {
        chars[chars.len() - ngram_length..].iter().collect()
    } else {
        word.to_string()
    }
}

fn strip_trailing_punctuation(line: &str) -> String {
    line.replace('\n', " ")
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

/// The corpus accumulated so far: one `LineRecord` per ingested line, plus
/// the rhyme vocabulary built alongside it.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub data: Vec<LineRecord>,
    pub vocabulary: Vocabulary,
    next_poem_id: u32,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one poem, transcribing it (batched, per §6) unless
    /// `settings.transcribed` is set, in which case `ipa_lines` must carry
    /// one IPA string per flattened line.
    pub fn add_poem(
        &mut self,
        poem: &Poem,
        transcriber: &dyn Transcriber,
        settings: &Settings,
        ipa_lines: Option<&[String]>,
    ) -> Result<()> {
        let poem_id = self.next_poem_id;
        let flat = poem.flatten();

        let fp_settings = FingerprintSettings {
            stress: settings.stress,
            vowel_length: settings.vowel_length,
            syll_max: settings.syll_max,
        };

        let normalized_lines: Vec<String> = flat
            .iter()
            .map(|(l, _)| strip_trailing_punctuation(&l.nfc().collect::<String>()))
            .collect();

        let line_ipas: Vec<String> = if settings.transcribed {
            ipa_lines
                .map(|v| v.to_vec())
                .unwrap_or_else(|| vec![String::new(); normalized_lines.len()])
        } else {
            let lang = settings.lang.as_deref().unwrap_or("");
            transcribe_poem(transcriber, &normalized_lines, lang)?
        };

        // Radif stripping runs on a raw, case-preserving, unmerged
        // tokenization (mirroring `_delete_radif`'s own tokenize-then-filter
        // pass); only once the radif is stripped are the surviving tokens
        // rejoined and re-tokenized (lowercased, possessives merged) to
        // derive each line's rhyme word.
        let mut raw_token_lists: Vec<Vec<String>> = normalized_lines
            .iter()
            .map(|l| tokenizer::raw_tokens(l))
            .collect();
        tokenizer::strip_radif(&mut raw_token_lists, settings.radif);

        let stripped_lines: Vec<String> =
            raw_token_lists.iter().map(|toks| toks.join(" ")).collect();

        let rhyme_words: Vec<Option<String>> =
            stripped_lines.iter().map(|l| tokenizer::rhyme_word(l)).collect();

        let new_words: Vec<String> = rhyme_words
            .iter()
            .flatten()
            .filter(|w| !self.vocabulary.contains(w))
            .cloned()
            .collect();
        let mut seen = std::collections::HashSet::new();
        let unique_new_words: Vec<String> = new_words
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();

        let word_ipas: Vec<String> = if settings.transcribed {
            vec![String::new(); unique_new_words.len()]
        } else if unique_new_words.is_empty() {
            Vec::new()
        } else {
            let lang = settings.lang.as_deref().unwrap_or("");
            transcribe_poem(transcriber, &unique_new_words, lang)?
        };

        for (i, (line, (_, stanza_id))) in normalized_lines.iter().zip(flat.iter()).enumerate() {
            let _ = line;
            let rhyme_word = rhyme_words[i].clone();
            let ipa_line = &line_ipas[i];
            let (components, reduplicant_length) = extract_fingerprint(ipa_line, fp_settings);

            self.data.push(LineRecord {
                rhyme_word: rhyme_word.clone(),
                poem_id,
                stanza_id: *stanza_id,
                components,
                reduplicant_length,
            });

            if let Some(word) = rhyme_word {
                if !self.vocabulary.contains(&word) {
                    if let Some(pos) = unique_new_words.iter().position(|w| w == &word) {
                        let word_ipa = &word_ipas[pos];
                        let (word_components, _) = extract_fingerprint(word_ipa, fp_settings);
                        let ngram = final_ngram(&word, settings.ngram_length);
                        self.vocabulary.insert(word, word_components, ngram);
                    }
                }
            }
        }

        self.next_poem_id += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcriber::test_support::StubTranscriber;

    fn settings() -> Settings {
        Settings::for_lang("en")
    }

    #[test]
    fn final_ngram_truncates_to_last_n_chars() {
        assert_eq!(final_ngram("singing", 3), "ing");
        assert_eq!(final_ngram("go", 3), "go");
    }

    #[test]
    fn add_poem_populates_data_and_vocabulary() {
        let t = StubTranscriber::new([("cat", "kæt"), ("hat", "hæt")]);
        let mut corpus = Corpus::new();
        let poem = Poem::Lines(vec!["a cat".to_string(), "a hat".to_string()]);
        corpus.add_poem(&poem, &t, &settings(), None).unwrap();

        assert_eq!(corpus.data.len(), 2);
        assert_eq!(corpus.data[0].rhyme_word, Some("cat".to_string()));
        assert_eq!(corpus.data[1].rhyme_word, Some("hat".to_string()));
        assert!(corpus.vocabulary.contains("cat"));
        assert!(corpus.vocabulary.contains("hat"));
    }

    #[test]
    fn add_poem_assigns_increasing_poem_ids() {
        let t = StubTranscriber::new([("cat", "kæt")]);
        let mut corpus = Corpus::new();
        let poem = Poem::Lines(vec!["a cat".to_string()]);
        corpus.add_poem(&poem, &t, &settings(), None).unwrap();
        corpus.add_poem(&poem, &t, &settings(), None).unwrap();
        assert_eq!(corpus.data[0].poem_id, 0);
        assert_eq!(corpus.data[1].poem_id, 1);
    }

    #[test]
    fn stanzas_assign_stanza_ids_within_a_poem() {
        let t = StubTranscriber::new([("cat", "kæt"), ("hat", "hæt")]);
        let mut corpus = Corpus::new();
        let poem = Poem::Stanzas(vec![
            vec!["a cat".to_string()],
            vec!["a hat".to_string()],
        ]);
        corpus.add_poem(&poem, &t, &settings(), None).unwrap();
        assert_eq!(corpus.data[0].stanza_id, 0);
        assert_eq!(corpus.data[1].stanza_id, 1);
    }
}
