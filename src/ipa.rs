//! Phonetic Fingerprint Extractor (SPEC_FULL.md §4.A).
//!
//! Turns an IPA transcription of a line (or a single word) into a reversed
//! list of syllable-peak / consonant-cluster "components", plus the
//! reduplicant length used by the scorer's length-parity penalty.

use regex::Regex;
use std::sync::OnceLock;

const VOWEL_LENGTH_MARKS: [char; 2] = ['ː', 'ˑ'];
const PRIMARY_STRESS: char = 'ˈ';
const SECONDARY_STRESS: char = 'ˌ';
const SYLLABIC_MARK: char = '\u{0329}';
const TIE_CHARS: [char; 2] = ['\u{0361}', '_'];

fn syllable_peak_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let vowel = "[iyɨʉɯuɪʏʊeøɤoəɘɵɛœʌɔæɐaăɶɑɒɜ][ːˑ]?";
        let tie = "[\u{0361}_]";
        let pattern = format!(
            "(?:{vowel}{tie}{vowel})|(?:{vowel})|(?:.{syllabic})",
            vowel = vowel,
            tie = tie,
            syllabic = SYLLABIC_MARK
        );
        Regex::new(&pattern).expect("syllable peak pattern is valid")
    })
}

/// Settings relevant to fingerprint extraction, decoupled from the rest of
/// `Settings` so this module can be unit-tested without building a whole
/// engine.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintSettings {
    pub stress: bool,
    pub vowel_length: bool,
    pub syll_max: u32,
}

/// Split `ipa` into alternating (cluster, peak, cluster, peak, ...) pieces,
/// mirroring Python's capturing `re.split`.
fn split_on_peaks(ipa: &str) -> Vec<String> {
    let re = syllable_peak_regex();
    let mut pieces = Vec::new();
    let mut last_end = 0;
    for m in re.find_iter(ipa) {
        pieces.push(ipa[last_end..m.start()].to_string());
        pieces.push(m.as_str().to_string());
        last_end = m.end();
    }
    pieces.push(ipa[last_end..].to_string());
    pieces
}

/// Extract `(components, reduplicant_length)` from an IPA string.
pub fn extract_fingerprint(ipa: &str, settings: FingerprintSettings) -> (Vec<String>, f32) {
    let mut ipa = ipa.to_string();

    // 1. Drop vowel-length marks if not wanted.
    if !settings.vowel_length {
        ipa.retain(|c| !VOWEL_LENGTH_MARKS.contains(&c));
    }

    // 2. Drop primary stress if not wanted; secondary stress always dropped.
    if !settings.stress {
        ipa.retain(|c| c != PRIMARY_STRESS);
    }
    ipa.retain(|c| c != SECONDARY_STRESS);

    // 3. Drop spaces.
    ipa.retain(|c| c != ' ');

    // 4. Keep only the suffix after the last primary stress mark.
    if settings.stress {
        if let Some(tail) = ipa.rsplit(PRIMARY_STRESS).next() {
            ipa = tail.to_string();
        }
    }

    // 5. Split into alternating clusters/peaks.
    let mut components = split_on_peaks(&ipa);

    // 6. Drop a leading empty cluster (i.e. the word starts on a peak).
    if components.first().map(String::is_empty).unwrap_or(false) {
        components.remove(0);
    }

    // 7. Reduplicant length before truncation.
    let reduplicant_length = components.len() as f32 / 2.0;

    // 8. Truncate to the last syll_max*2 components.
    let keep = (settings.syll_max as usize) * 2;
    if components.len() > keep {
        let start = components.len() - keep;
        components.drain(0..start);
    }

    // 9. Reverse so position 0 is the rhyme-carrying tail.
    components.reverse();

    (components, reduplicant_length)
}

/// Whether two reduplicant lengths have matching parity, i.e. `l1 % 2 == l2
/// % 2` the way the reference scorer compares them directly on the
/// half-integer reduplicant length (not on the underlying component count).
pub fn same_parity(l1: f32, l2: f32) -> bool {
    l1.rem_euclid(2.0) == l2.rem_euclid(2.0)
}

pub fn is_tie_char(c: char) -> bool {
    TIE_CHARS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(stress: bool, vowel_length: bool, syll_max: u32) -> FingerprintSettings {
        FingerprintSettings {
            stress,
            vowel_length,
            syll_max,
        }
    }

    #[test]
    fn simple_cvc_splits_into_three_components() {
        // "kæt" -> cluster "k", peak "æ", cluster "t"
        let (components, redup) = extract_fingerprint("kæt", settings(true, true, 2));
        // reversed: [t, æ, k]
        assert_eq!(components, vec!["t", "æ", "k"]);
        assert_eq!(redup, 1.5);
    }

    #[test]
    fn leading_peak_drops_empty_cluster() {
        // "æt" -> split gives ["", "æ", "t"] -> drop leading "" -> ["æ","t"]
        let (components, _) = extract_fingerprint("æt", settings(true, true, 2));
        assert_eq!(components, vec!["t", "æ"]);
    }

    #[test]
    fn vowel_length_flag_collapses_long_and_short_vowels() {
        let (beat, _) = extract_fingerprint("biːt", settings(true, false, 2));
        let (bit, _) = extract_fingerprint("bɪt", settings(true, false, 2));
        assert_eq!(beat, vec!["t", "i", "b"]);
        assert_ne!(beat, bit); // different vowel quality still differs
    }

    #[test]
    fn vowel_length_kept_when_enabled() {
        let (with_length, _) = extract_fingerprint("biːt", settings(true, true, 2));
        assert_eq!(with_length, vec!["t", "iː", "b"]);
    }

    #[test]
    fn stress_true_keeps_only_suffix_after_last_primary_stress() {
        let (components, _) = extract_fingerprint("ˌɪntərˈɛstɪŋ", settings(true, true, 3));
        // secondary stress always dropped, then we keep the tail after the
        // last primary stress mark: "ɛstɪŋ"
        let joined: String = components.iter().rev().cloned().collect();
        assert!(!joined.contains('ˌ'));
        assert!(!joined.contains('ˈ'));
    }

    #[test]
    fn syllable_cap_truncates_to_last_n_components() {
        let (components, redup) = extract_fingerprint("stræntʃgəltʃ", settings(true, true, 1));
        assert_eq!(components.len(), 2);
        assert!(redup > 1.0);
    }

    #[test]
    fn same_parity_checks_pre_truncation_count() {
        assert!(same_parity(1.5, 3.5));
        assert!(!same_parity(1.5, 2.0));
        assert!(same_parity(2.0, 4.0));
    }

    #[test]
    fn tied_vowel_sequence_is_one_peak() {
        let tie = '\u{0361}';
        let ipa = format!("a{tie}ʊt");
        let (components, _) = extract_fingerprint(&ipa, settings(true, true, 2));
        // "t" then the tied diphthong "aʊ" (via tie) as a single peak
        assert_eq!(components.len(), 2);
    }
}
