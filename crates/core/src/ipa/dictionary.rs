//! Compiled-in pronunciations for common words.
//!
//! These entries always win over the phonemizer: they are known-correct
//! forms for words the GA → RP rules get wrong or that carry the lexical
//! sets the converter cannot infer (BATH, LOT, GOAT, non-rhotic r).

use std::collections::HashMap;

use crate::types::Accent;

const RP_ENTRIES: &[(&str, &str)] = &[
    // basic
    ("hello", "həˈləʊ"),
    ("world", "wɜːld"),
    ("the", "ðə"),
    ("and", "ænd"),
    ("or", "ɔː"),
    ("this", "ðɪs"),
    ("that", "ðæt"),
    ("is", "ɪz"),
    ("are", "ɑː"),
    ("was", "wɒz"),
    ("were", "wɜː"),
    ("have", "hæv"),
    ("has", "hæz"),
    ("had", "hæd"),
    ("will", "wɪl"),
    ("would", "wʊd"),
    ("could", "kʊd"),
    ("should", "ʃʊd"),
    ("can", "kæn"),
    ("cannot", "ˈkænɒt"),
    ("can't", "kɑːnt"),
    ("i", "aɪ"),
    // academic
    ("university", "ˌjuːnɪˈvɜːsəti"),
    ("pronunciation", "prəˌnʌnsɪˈeɪʃən"),
    ("phonetic", "fəˈnetɪk"),
    ("phonetics", "fəˈnetɪks"),
    ("received", "rɪˈsiːvd"),
    ("british", "ˈbrɪtɪʃ"),
    ("english", "ˈɪŋglɪʃ"),
    ("standard", "ˈstændəd"),
    ("dictionary", "ˈdɪkʃənri"),
    ("language", "ˈlæŋgwɪdʒ"),
    ("linguistics", "lɪŋˈgwɪstɪks"),
    ("transcription", "trænˈskrɪpʃən"),
    ("international", "ˌɪntəˈnæʃənəl"),
    ("alphabet", "ˈælfəbet"),
    // START and BATH
    ("car", "kɑː"),
    ("park", "pɑːk"),
    ("start", "stɑːt"),
    ("dance", "dɑːns"),
    ("path", "pɑːθ"),
    ("ask", "ɑːsk"),
    ("answer", "ˈɑːnsə"),
    ("after", "ˈɑːftə"),
    ("class", "klɑːs"),
    ("glass", "glɑːs"),
    ("last", "lɑːst"),
    ("fast", "fɑːst"),
    ("past", "pɑːst"),
    ("castle", "ˈkɑːsəl"),
    ("laugh", "lɑːf"),
    ("aunt", "ɑːnt"),
    // LOT
    ("hot", "hɒt"),
    ("got", "gɒt"),
    ("lot", "lɒt"),
    ("not", "nɒt"),
    ("top", "tɒp"),
    ("stop", "stɒp"),
    ("shop", "ʃɒp"),
    ("dog", "dɒg"),
    ("long", "lɒŋ"),
    ("song", "sɒŋ"),
    ("wrong", "rɒŋ"),
    // GOAT
    ("go", "gəʊ"),
    ("no", "nəʊ"),
    ("so", "səʊ"),
    ("show", "ʃəʊ"),
    ("know", "nəʊ"),
    ("home", "həʊm"),
    ("phone", "fəʊn"),
    ("close", "kləʊs"),
    ("most", "məʊst"),
    ("post", "pəʊst"),
    // NEAR, SQUARE, CURE
    ("here", "hɪə"),
    ("there", "ðeə"),
    ("where", "weə"),
    ("care", "keə"),
    ("fair", "feə"),
    ("hair", "heə"),
    ("chair", "tʃeə"),
    ("sure", "ʃʊə"),
    ("poor", "pʊə"),
    ("tour", "tʊə"),
    ("year", "jɪə"),
    ("near", "nɪə"),
    ("clear", "klɪə"),
    ("dear", "dɪə"),
    ("beer", "bɪə"),
    ("fear", "fɪə"),
    // family, school
    ("water", "ˈwɔːtə"),
    ("father", "ˈfɑːðə"),
    ("mother", "ˈmʌðə"),
    ("brother", "ˈbrʌðə"),
    ("sister", "ˈsɪstə"),
    ("teacher", "ˈtiːtʃə"),
    ("student", "ˈstjuːdənt"),
    ("school", "skuːl"),
    ("learn", "lɜːn"),
    ("study", "ˈstʌdi"),
    ("test", "test"),
    ("exam", "ɪgˈzæm"),
    ("book", "bʊk"),
    ("read", "riːd"),
    ("write", "raɪt"),
    ("speak", "spiːk"),
    ("listen", "ˈlɪsən"),
    ("understand", "ˌʌndəˈstænd"),
];

const AMERICAN_ENTRIES: &[(&str, &str)] = &[
    ("hello", "həˈloʊ"),
    ("world", "wɜrld"),
    ("the", "ðə"),
    ("and", "ænd"),
    ("or", "ɔr"),
    ("this", "ðɪs"),
    ("that", "ðæt"),
    ("is", "ɪz"),
    ("are", "ɑr"),
    ("was", "wʌz"),
    ("were", "wɜr"),
    ("have", "hæv"),
    ("has", "hæz"),
    ("had", "hæd"),
    ("will", "wɪl"),
    ("would", "wʊd"),
    ("could", "kʊd"),
    ("should", "ʃʊd"),
    ("can", "kæn"),
    ("cannot", "ˈkænɑt"),
    ("can't", "kænt"),
    ("i", "aɪ"),
    ("university", "ˌjunɪˈvɜrsəti"),
    ("pronunciation", "prəˌnʌnsiˈeɪʃən"),
    ("phonetic", "fəˈnɛtɪk"),
    ("phonetics", "fəˈnɛtɪks"),
    ("american", "əˈmɛrɪkən"),
    ("english", "ˈɪŋglɪʃ"),
    ("standard", "ˈstændərd"),
    ("dictionary", "ˈdɪkʃəˌnɛri"),
    ("language", "ˈlæŋgwɪdʒ"),
    ("transcription", "trænˈskrɪpʃən"),
    ("car", "kɑr"),
    ("park", "pɑrk"),
    ("start", "stɑrt"),
    ("dance", "dæns"),
    ("path", "pæθ"),
    ("ask", "æsk"),
    ("answer", "ˈænsər"),
    ("after", "ˈæftər"),
    ("class", "klæs"),
    ("last", "læst"),
    ("fast", "fæst"),
    ("laugh", "læf"),
    ("aunt", "ænt"),
    ("hot", "hɑt"),
    ("got", "gɑt"),
    ("lot", "lɑt"),
    ("not", "nɑt"),
    ("stop", "stɑp"),
    ("dog", "dɔg"),
    ("long", "lɔŋ"),
    ("go", "goʊ"),
    ("no", "noʊ"),
    ("so", "soʊ"),
    ("know", "noʊ"),
    ("home", "hoʊm"),
    ("phone", "foʊn"),
    ("here", "hɪr"),
    ("there", "ðɛr"),
    ("where", "wɛr"),
    ("care", "kɛr"),
    ("hair", "hɛr"),
    ("sure", "ʃʊr"),
    ("year", "jɪr"),
    ("near", "nɪr"),
    ("water", "ˈwɔtər"),
    ("father", "ˈfɑðər"),
    ("mother", "ˈmʌðər"),
    ("brother", "ˈbrʌðər"),
    ("sister", "ˈsɪstər"),
    ("teacher", "ˈtitʃər"),
    ("student", "ˈstudənt"),
    ("school", "skul"),
    ("learn", "lɜrn"),
    ("study", "ˈstʌdi"),
    ("test", "tɛst"),
    ("book", "bʊk"),
    ("read", "rid"),
    ("write", "raɪt"),
    ("speak", "spik"),
    ("understand", "ˌʌndərˈstænd"),
];

lazy_static::lazy_static! {
    static ref RP_DICTIONARY: HashMap<&'static str, &'static str> =
        RP_ENTRIES.iter().copied().collect();

    static ref AMERICAN_DICTIONARY: HashMap<&'static str, &'static str> =
        AMERICAN_ENTRIES.iter().copied().collect();
}

/// Normalize a word to a dictionary key: lower-case, keep only
/// alphanumerics and apostrophes.
pub fn normalize_key(word: &str) -> String {
    word.trim()
        .chars()
        .map(|c| if c == '’' || c == '‘' { '\'' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '\'')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up the known pronunciation of `word` for `accent`.
pub fn lookup(word: &str, accent: Accent) -> Option<&'static str> {
    let key = normalize_key(word);
    if key.is_empty() {
        return None;
    }
    let table = match accent {
        Accent::Rp => &*RP_DICTIONARY,
        Accent::American => &*AMERICAN_DICTIONARY,
    };
    table.get(key.as_str()).copied()
}

/// Number of entries for `accent`.
pub fn len(accent: Accent) -> usize {
    match accent {
        Accent::Rp => RP_DICTIONARY.len(),
        Accent::American => AMERICAN_DICTIONARY.len(),
    }
}
