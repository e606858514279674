//! Strong and weak forms of English function words.
//!
//! The strong form is the stressed citation pronunciation, the weak form
//! the reduced one used in unstressed connected speech. Where RP and
//! General American differ, a per-accent override wins over the generic
//! entry.

use std::collections::HashMap;

use crate::types::Accent;

/// Strong and weak pronunciation of one function word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordForms {
    pub strong: &'static str,
    pub weak: &'static str,
}

const GENERIC_FORMS: &[(&str, &str, &str)] = &[
    // articles ("the" is resolved by allophony, kept for completeness)
    ("the", "ði", "ðə"),
    ("a", "eɪ", "ə"),
    ("an", "æn", "ən"),
    // personal pronouns
    ("i", "aɪ", "aɪ"),
    ("you", "juː", "jə"),
    ("he", "hiː", "hi"),
    ("she", "ʃiː", "ʃi"),
    ("it", "ɪt", "ɪt"),
    ("we", "wiː", "wi"),
    ("they", "ðeɪ", "ðeɪ"),
    ("me", "miː", "mi"),
    ("him", "hɪm", "ɪm"),
    ("her", "hɜː", "hə"),
    ("us", "ʌs", "əs"),
    ("them", "ðem", "ðəm"),
    // possessives
    ("my", "maɪ", "maɪ"),
    ("your", "jɔː", "jə"),
    ("his", "hɪz", "ɪz"),
    ("its", "ɪts", "ɪts"),
    ("our", "aʊə", "aʊə"),
    ("their", "ðeə", "ðə"),
    // be
    ("am", "æm", "əm"),
    ("is", "ɪz", "s"),
    ("are", "ɑː", "ə"),
    ("was", "wɒz", "wəz"),
    ("were", "wɜː", "wə"),
    ("be", "biː", "bi"),
    ("being", "biːɪŋ", "biːɪŋ"),
    ("been", "biːn", "bɪn"),
    // have
    ("have", "hæv", "əv"),
    ("has", "hæz", "əz"),
    ("had", "hæd", "əd"),
    ("having", "hævɪŋ", "hævɪŋ"),
    // do
    ("do", "duː", "də"),
    ("does", "dʌz", "dəz"),
    ("did", "dɪd", "dəd"),
    ("done", "dʌn", "dən"),
    // will, would, shall, should
    ("will", "wɪl", "əl"),
    ("would", "wʊd", "əd"),
    ("shall", "ʃæl", "ʃəl"),
    ("should", "ʃʊd", "ʃəd"),
    // modals
    ("can", "kæn", "kən"),
    ("could", "kʊd", "kəd"),
    ("may", "meɪ", "meɪ"),
    ("might", "maɪt", "maɪt"),
    ("must", "mʌst", "məst"),
    ("ought", "ɔːt", "ɔːt"),
    // prepositions
    ("of", "ɒv", "əv"),
    ("to", "tuː", "tə"),
    ("for", "fɔː", "fə"),
    ("from", "frɒm", "frəm"),
    ("at", "æt", "ət"),
    ("in", "ɪn", "ɪn"),
    ("on", "ɒn", "ən"),
    ("with", "wɪð", "wɪð"),
    ("by", "baɪ", "baɪ"),
    ("about", "əbaʊt", "əbət"),
    ("into", "ɪntuː", "ɪntə"),
    ("onto", "ɒntuː", "ɒntə"),
    ("upon", "əpɒn", "əpən"),
    ("before", "bɪfɔː", "bɪfə"),
    ("after", "ɑːftə", "ɑːftə"),
    // conjunctions
    ("and", "ænd", "ən"),
    ("or", "ɔː", "ə"),
    ("but", "bʌt", "bət"),
    ("that", "ðæt", "ðət"),
    ("than", "ðæn", "ðən"),
    ("as", "æz", "əz"),
    ("if", "ɪf", "ɪf"),
    ("when", "wen", "wən"),
    ("where", "weə", "wə"),
    ("while", "waɪl", "waɪl"),
    ("because", "bɪkɒz", "bɪkəz"),
    // adverbs and quantifiers
    ("there", "ðeə", "ðə"),
    ("some", "sʌm", "səm"),
    ("any", "enɪ", "ənɪ"),
    ("not", "nɒt", "nət"),
    ("so", "səʊ", "səʊ"),
    ("just", "dʒʌst", "dʒəst"),
    ("only", "əʊnlɪ", "əʊnlɪ"),
    // contractions
    ("i'm", "aɪm", "aɪm"),
    ("you're", "jʊə", "jə"),
    ("he's", "hiːz", "hiːz"),
    ("she's", "ʃiːz", "ʃiːz"),
    ("it's", "ɪts", "ɪts"),
    ("we're", "wɪə", "wɪə"),
    ("they're", "ðeə", "ðeə"),
    ("i've", "aɪv", "aɪv"),
    ("you've", "juːv", "jəv"),
    ("we've", "wiːv", "wɪv"),
    ("they've", "ðeɪv", "ðeɪv"),
    ("i'll", "aɪl", "aɪl"),
    ("you'll", "juːl", "jəl"),
    ("he'll", "hiːl", "hiːl"),
    ("she'll", "ʃiːl", "ʃiːl"),
    ("it'll", "ɪtəl", "ɪtəl"),
    ("we'll", "wiːl", "wɪl"),
    ("they'll", "ðeɪl", "ðeɪl"),
    ("won't", "wəʊnt", "wəʊnt"),
    ("can't", "kɑːnt", "kænt"),
    ("couldn't", "kʊdənt", "kʊdənt"),
    ("shouldn't", "ʃʊdənt", "ʃʊdənt"),
    ("wouldn't", "wʊdənt", "wʊdənt"),
    ("don't", "dəʊnt", "dəʊnt"),
    ("doesn't", "dʌzənt", "dʌzənt"),
    ("didn't", "dɪdənt", "dɪdənt"),
    ("haven't", "hævənt", "hævənt"),
    ("hasn't", "hæzənt", "hæzənt"),
    ("hadn't", "hædənt", "hædənt"),
    ("isn't", "ɪzənt", "ɪzənt"),
    ("aren't", "ɑːnt", "ɑːnt"),
    ("wasn't", "wɒzənt", "wɒzənt"),
    ("weren't", "wɜːnt", "wɜːnt"),
];

const RP_OVERRIDES: &[(&str, &str, &str)] = &[
    ("our", "aʊə", "aʊə"),
    ("are", "ɑː", "ə"),
    ("were", "wɜː", "wə"),
    ("can't", "kɑːnt", "kɑːnt"),
    ("after", "ɑːftə", "ɑːftə"),
];

const AMERICAN_OVERRIDES: &[(&str, &str, &str)] = &[
    ("our", "aʊr", "aʊr"),
    ("are", "ɑr", "ər"),
    ("were", "wɜr", "wər"),
    ("can't", "kænt", "kænt"),
    ("after", "æftər", "æftər"),
    ("her", "hɜr", "hər"),
    ("your", "jɔr", "jər"),
    ("their", "ðɛr", "ðər"),
    ("there", "ðɛr", "ðər"),
    ("where", "wɛr", "wər"),
    ("for", "fɔr", "fər"),
    ("or", "ɔr", "ər"),
    ("before", "bɪfɔr", "bɪfər"),
    ("of", "ʌv", "əv"),
    ("from", "frʌm", "frəm"),
    ("on", "ɑn", "ən"),
    ("not", "nɑt", "nət"),
    ("was", "wʌz", "wəz"),
    ("because", "bɪkʌz", "bɪkəz"),
    ("don't", "doʊnt", "doʊnt"),
    ("won't", "woʊnt", "woʊnt"),
    ("so", "soʊ", "soʊ"),
    ("only", "oʊnli", "oʊnli"),
    ("you're", "jʊr", "jər"),
    ("we're", "wɪr", "wɪr"),
    ("they're", "ðɛr", "ðɛr"),
    ("aren't", "ɑrnt", "ɑrnt"),
    ("weren't", "wɜrnt", "wɜrnt"),
];

fn build(entries: &[(&'static str, &'static str, &'static str)]) -> HashMap<&'static str, WordForms> {
    entries
        .iter()
        .map(|&(word, strong, weak)| (word, WordForms { strong, weak }))
        .collect()
}

lazy_static::lazy_static! {
    static ref GENERIC: HashMap<&'static str, WordForms> = build(GENERIC_FORMS);
    static ref RP: HashMap<&'static str, WordForms> = build(RP_OVERRIDES);
    static ref AMERICAN: HashMap<&'static str, WordForms> = build(AMERICAN_OVERRIDES);
}

/// Strong/weak forms of `word` for `accent`, override first.
pub fn word_forms(word: &str, accent: Accent) -> Option<WordForms> {
    let key = word.trim().to_lowercase();
    let overrides = match accent {
        Accent::Rp => &*RP,
        Accent::American => &*AMERICAN,
    };
    overrides
        .get(key.as_str())
        .or_else(|| GENERIC.get(key.as_str()))
        .copied()
}

/// Whether `word` has any strong/weak entry.
pub fn has_forms(word: &str) -> bool {
    GENERIC.contains_key(word.trim().to_lowercase().as_str())
}

pub fn strong_form(word: &str, accent: Accent) -> Option<&'static str> {
    word_forms(word, accent).map(|f| f.strong)
}

pub fn weak_form(word: &str, accent: Accent) -> Option<&'static str> {
    word_forms(word, accent).map(|f| f.weak)
}

/// All function words with an entry.
pub fn function_words() -> impl Iterator<Item = &'static str> {
    GENERIC_FORMS.iter().map(|&(word, _, _)| word)
}
