//! Positional choice between strong and weak forms, "the" allophony and
//! RP linking-r.
//!
//! Decisions are made on the original line's token sequence, so the
//! context never depends on what another word was transcribed as.

use crate::ipa::forms;
use crate::types::{Accent, Token};

/// Tokens inspected after a word when looking for sentence-final punctuation.
pub const SENTENCE_END_WINDOW: usize = 2;

/// Tokens inspected on either side of a be-verb for a negation.
pub const NEGATION_WINDOW: usize = 2;

pub const THE_BEFORE_VOWEL: &str = "ði";
pub const THE_BEFORE_CONSONANT: &str = "ðə";

const NEGATIVE_CONTRACTIONS: &[&str] = &[
    "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "won't", "wouldn't",
    "can't", "couldn't", "shouldn't", "mustn't", "haven't", "hasn't", "hadn't",
];

const BE_VERBS: &[&str] = &["am", "is", "are", "was", "were", "be", "been", "being"];

const NEGATORS: &[&str] = &["not"];

/// Stay weak even as the first word of a sequence.
const WEAK_STARTERS: &[&str] = &["a", "an", "in", "on", "at", "to", "for"];

/// Spelled with a consonant, pronounced with a vowel.
const SILENT_H: &[&str] = &["hour", "honest", "honor", "honour", "heir", "herb"];

/// Spelled with a vowel, pronounced with /j/.
const YOD_INITIAL: &[&str] = &[
    "university", "uniform", "unique", "united", "union", "unit", "european", "euphoria",
    "eucalyptus", "useful", "usual", "use", "user",
];

/// Word endings after which RP inserts a linking /r/.
const LINKING_R_ENDINGS: &[&str] = &["aʊə", "ɑː", "ɔː", "eə", "ɪə", "ʊə", "ə"];

/// Transcription onsets that count as a vowel for linking-r.
const VOWEL_ONSETS: &[&str] = &[
    "ə", "ɑ", "æ", "e", "ɪ", "ɒ", "ʌ", "ʊ", "iː", "uː", "ɜː", "ɔː", "ɑː", "eɪ", "aɪ", "ɔɪ", "aʊ",
    "əʊ", "ɪə", "eə", "ʊə",
];

/// Whether an orthographic word starts with a vowel *sound*.
pub fn starts_with_vowel_sound(word: &str) -> bool {
    let word = word.trim().to_lowercase();
    let Some(first) = word.chars().next() else {
        return false;
    };
    if YOD_INITIAL.iter().any(|exc| word.starts_with(exc)) {
        return false;
    }
    if SILENT_H.iter().any(|exc| word.starts_with(exc)) {
        return true;
    }
    matches!(first, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Allophone of "the" given the word that follows it.
pub fn the_form(next_word: Option<&str>) -> &'static str {
    match next_word {
        Some(w) if starts_with_vowel_sound(w) => THE_BEFORE_VOWEL,
        _ => THE_BEFORE_CONSONANT,
    }
}

fn next_word(sequence: &[Token], position: usize) -> Option<&str> {
    sequence.iter().skip(position.saturating_add(1)).find_map(Token::as_word)
}

fn is_sentence_final(sequence: &[Token], position: usize) -> bool {
    if next_word(sequence, position).is_none() {
        return true;
    }
    sequence
        .iter()
        .skip(position.saturating_add(1))
        .take(SENTENCE_END_WINDOW)
        .any(Token::is_sentence_end)
}

fn is_negative_contraction(word: &str) -> bool {
    NEGATIVE_CONTRACTIONS.contains(&word)
}

fn is_negated_be_verb(word: &str, sequence: &[Token], position: usize) -> bool {
    if !BE_VERBS.contains(&word) {
        return false;
    }
    let end = position
        .saturating_add(NEGATION_WINDOW + 1)
        .min(sequence.len());
    let start = position.saturating_sub(NEGATION_WINDOW).min(end);
    sequence[start..end]
        .iter()
        .filter_map(Token::as_word)
        .any(|w| NEGATORS.contains(&w))
}

fn is_first_word(sequence: &[Token], position: usize) -> bool {
    sequence.iter().position(|t| t.as_word().is_some()) == Some(position)
}

/// Choose the pronunciation of the function word at `position`.
///
/// Returns `None` when the word is not a function word and must be left
/// as resolved. Rules, first match wins: weak forms disabled → strong;
/// "the" → allophone; sentence-final → strong; negative contraction →
/// strong; negated be-verb → strong; first word (bar a few articles and
/// prepositions) → strong; otherwise weak.
pub fn resolve_form(
    word: &str,
    position: usize,
    sequence: &[Token],
    accent: Accent,
    use_weak_forms: bool,
) -> Option<String> {
    let word = word.trim().to_lowercase();
    let entry = forms::word_forms(&word, accent);

    if !use_weak_forms {
        return entry.map(|f| f.strong.to_string());
    }

    if word == "the" {
        return Some(the_form(next_word(sequence, position)).to_string());
    }

    let entry = entry?;

    let strong = is_sentence_final(sequence, position)
        || is_negative_contraction(&word)
        || is_negated_be_verb(&word, sequence, position)
        || (is_first_word(sequence, position) && !WEAK_STARTERS.contains(&word.as_str()));

    Some(if strong { entry.strong } else { entry.weak }.to_string())
}

/// Rewrite `draft` (one transcription per token) in place with the chosen
/// strong/weak forms. `draft` and `sequence` must be the same length;
/// punctuation slots are ignored. Returns which slots were rewritten.
pub fn apply_forms(
    sequence: &[Token],
    draft: &mut [String],
    accent: Accent,
    use_weak_forms: bool,
) -> Vec<bool> {
    let mut rewritten = vec![false; sequence.len()];
    for (position, token) in sequence.iter().enumerate() {
        let Some(word) = token.as_word() else {
            continue;
        };
        if let Some(form) = resolve_form(word, position, sequence, accent, use_weak_forms) {
            if let Some(slot) = draft.get_mut(position) {
                *slot = form;
                rewritten[position] = true;
            }
        }
    }
    rewritten
}

fn strip_stress(ipa: &str) -> &str {
    ipa.trim_start_matches(['ˈ', 'ˌ'])
}

/// Whether `current` should take a linking /r/ before `next`.
pub fn needs_linking_r(current: &str, next: &str) -> bool {
    if current.ends_with('r') {
        return false;
    }
    let next = strip_stress(next);
    LINKING_R_ENDINGS.iter().any(|e| current.ends_with(e))
        && VOWEL_ONSETS.iter().any(|v| next.starts_with(v))
}

/// Append linking /r/ to words in `draft` that are directly followed by a
/// vowel-initial word. `linkable[i]` marks slots that hold real IPA words.
pub fn apply_linking_r(sequence: &[Token], draft: &mut [String], linkable: &[bool]) {
    for i in 0..sequence.len().saturating_sub(1) {
        let both_words = sequence[i].as_word().is_some() && sequence[i + 1].as_word().is_some();
        let both_ipa = linkable.get(i).copied().unwrap_or(false)
            && linkable.get(i + 1).copied().unwrap_or(false);
        if both_words && both_ipa && needs_linking_r(&draft[i], &draft[i + 1]) {
            draft[i].push('r');
        }
    }
}
