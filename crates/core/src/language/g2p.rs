//! Grapheme-to-phoneme engines producing General American IPA.
//!
//! Two backends implement [`Phonemizer`]:
//! - [`RulePhonemizer`]: embedded CMU dictionary subset converted from
//!   ARPABET, with a letter-rule fallback for unknown words
//! - [`EspeakPhonemizer`]: the `espeak-ng` binary run as a subprocess
//!
//! Their output is raw GA and still has to go through the accent rules.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::process::Command;
use std::sync::OnceLock;

use anyhow::{Result, bail};
use regex::Regex;

use crate::config::TranscriptionConfig;
use crate::error::PhonemizeError;

/// Grapheme-to-phoneme backend.
pub trait Phonemizer: Send + Sync {
    /// Backend name for logging and display.
    fn name(&self) -> &str;

    /// Raw (GA-flavoured) IPA for a single word.
    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError>;
}

/// The embedded CMU Pronouncing Dictionary subset.
///
/// Format: one word per line, "WORD PH1 PH2 PH3 ..."
/// Lines starting with ";;;" are comments.
const CMU_DICT_DATA: &str = include_str!("cmudict.txt");

static CMU_DICT: OnceLock<HashMap<String, Vec<Vec<String>>>> = OnceLock::new();

fn get_dict() -> &'static HashMap<String, Vec<Vec<String>>> {
    CMU_DICT.get_or_init(|| {
        let mut dict: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for line in CMU_DICT_DATA.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let Some((word_raw, phonemes_str)) = line.split_once(' ') else {
                continue;
            };
            // WORD(2) -> WORD
            let word = word_raw
                .split('(')
                .next()
                .unwrap_or(word_raw)
                .to_uppercase();
            let phonemes: Vec<String> = phonemes_str
                .split_whitespace()
                .map(|s| s.to_string())
                .collect();
            if !phonemes.is_empty() {
                dict.entry(word).or_default().push(phonemes);
            }
        }
        dict
    })
}

/// First ARPABET pronunciation of `word`, if the embedded dictionary has it.
pub fn lookup(word: &str) -> Option<Vec<String>> {
    get_dict()
        .get(&word.to_uppercase())
        .and_then(|variants| variants.first().cloned())
}

/// ARPABET phonemes for a word: dictionary first, letter rules otherwise.
pub fn word_to_phonemes(word: &str) -> Vec<String> {
    lookup(word).unwrap_or_else(|| simple_g2p(word))
}

/// Letter-rule approximation for out-of-vocabulary words.
///
/// Only ASCII letters are considered; everything else is skipped.
fn simple_g2p(word: &str) -> Vec<String> {
    let chars: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let mut phonemes: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(&next) = chars.get(i + 1) {
            let digraph = match (chars[i], next) {
                ('t', 'h') => Some("TH"),
                ('s', 'h') => Some("SH"),
                ('c', 'h') => Some("CH"),
                ('n', 'g') => Some("NG"),
                ('p', 'h') => Some("F"),
                ('w', 'h') => Some("W"),
                ('c', 'k') => Some("K"),
                ('e', 'e') | ('e', 'a') => Some("IY1"),
                ('o', 'o') => Some("UW1"),
                ('o', 'u') => Some("AW1"),
                ('o', 'w') => Some("OW1"),
                ('a', 'i') | ('a', 'y') => Some("EY1"),
                ('o', 'i') | ('o', 'y') => Some("OY1"),
                _ => None,
            };
            if let Some(ph) = digraph {
                phonemes.push(ph);
                i += 2;
                continue;
            }
        }

        match chars[i] {
            'a' => phonemes.push("AE1"),
            'b' => phonemes.push("B"),
            'c' => {
                if chars.get(i + 1).is_some_and(|c| matches!(c, 'e' | 'i' | 'y')) {
                    phonemes.push("S");
                } else {
                    phonemes.push("K");
                }
            }
            'd' => phonemes.push("D"),
            // final e is silent
            'e' if i + 1 == chars.len() && !phonemes.is_empty() => {}
            'e' => phonemes.push("EH1"),
            'f' => phonemes.push("F"),
            'g' => phonemes.push("G"),
            'h' => phonemes.push("HH"),
            'i' => phonemes.push("IH1"),
            'j' => phonemes.push("JH"),
            'k' | 'q' => phonemes.push("K"),
            'l' => phonemes.push("L"),
            'm' => phonemes.push("M"),
            'n' => phonemes.push("N"),
            'o' => phonemes.push("AA1"),
            'p' => phonemes.push("P"),
            'r' => phonemes.push("R"),
            's' => phonemes.push("S"),
            't' => phonemes.push("T"),
            'u' => phonemes.push("AH1"),
            'v' => phonemes.push("V"),
            'w' => phonemes.push("W"),
            'x' => phonemes.extend(["K", "S"]),
            'y' if phonemes.is_empty() => phonemes.push("Y"),
            'y' => phonemes.push("IY0"),
            'z' => phonemes.push("Z"),
            _ => {}
        }
        i += 1;
    }

    if phonemes.is_empty() {
        phonemes.push("AH0");
    }
    phonemes.into_iter().map(String::from).collect()
}

/// Check if a phoneme is a vowel.
pub fn is_vowel(phoneme: &str) -> bool {
    matches!(
        strip_stress(phoneme),
        "AA" | "AE" | "AH" | "AO" | "AW" | "AY" | "EH" | "ER" | "EY" | "IH" | "IY" | "OW"
            | "OY" | "UH" | "UW"
    )
}

/// Strip stress markers from an ARPABET phoneme.
pub fn strip_stress(phoneme: &str) -> &str {
    phoneme.trim_end_matches(|c: char| c.is_ascii_digit())
}

lazy_static::lazy_static! {
    /// Licit 2-consonant onsets.
    static ref ONSET2: HashSet<(&'static str, &'static str)> = [
        ("P", "R"), ("T", "R"), ("K", "R"), ("B", "R"), ("D", "R"),
        ("G", "R"), ("F", "R"), ("TH", "R"), ("SH", "R"),
        ("P", "L"), ("K", "L"), ("B", "L"), ("G", "L"), ("F", "L"), ("S", "L"),
        ("K", "W"), ("G", "W"), ("S", "W"), ("T", "W"),
        ("S", "P"), ("S", "T"), ("S", "K"), ("S", "M"), ("S", "N"),
        ("M", "Y"), ("P", "Y"), ("K", "Y"), ("HH", "Y"),
    ]
    .into_iter()
    .collect();

    /// Licit 3-consonant onsets.
    static ref ONSET3: HashSet<(&'static str, &'static str, &'static str)> = [
        ("S", "T", "R"), ("S", "P", "R"), ("S", "K", "R"),
        ("S", "P", "L"), ("S", "K", "L"), ("S", "K", "W"),
    ]
    .into_iter()
    .collect();
}

/// Index where the onset of the syllable whose nucleus is at `vowel`
/// begins (maximum licit onset).
fn onset_start(phonemes: &[String], vowel: usize) -> usize {
    let mut first = vowel;
    while first > 0 && !is_vowel(&phonemes[first - 1]) {
        first -= 1;
    }
    let cluster: Vec<&str> = phonemes[first..vowel].iter().map(|p| strip_stress(p)).collect();
    match cluster.as_slice() {
        [.., a, b, c] if ONSET3.contains(&(*a, *b, *c)) => vowel - 3,
        [.., a, b] if ONSET2.contains(&(*a, *b)) => vowel - 2,
        [.., _] => vowel - 1,
        [] => vowel,
    }
}

fn stress_of(phoneme: &str) -> Option<char> {
    phoneme.chars().last().filter(|c| c.is_ascii_digit())
}

/// IPA for one ARPABET phoneme. Unknown symbols map to "".
pub fn arpabet_symbol(phoneme: &str) -> &'static str {
    let stressed = matches!(stress_of(phoneme), Some('1' | '2'));
    match strip_stress(phoneme) {
        "AA" => "ɑ",
        "AE" => "æ",
        "AH" if stressed => "ʌ",
        "AH" => "ə",
        "AO" => "ɔː",
        "AW" => "aʊ",
        "AY" => "aɪ",
        "EH" => "ɛ",
        "ER" if stressed => "ɜr",
        "ER" => "ər",
        "EY" => "eɪ",
        "IH" => "ɪ",
        "IY" if stressed => "iː",
        "IY" => "i",
        "OW" => "oʊ",
        "OY" => "ɔɪ",
        "UH" => "ʊ",
        "UW" if stressed => "uː",
        "UW" => "u",
        "B" => "b",
        "CH" => "tʃ",
        "D" => "d",
        "DH" => "ð",
        "F" => "f",
        "G" => "g",
        "HH" => "h",
        "JH" => "dʒ",
        "K" => "k",
        "L" => "l",
        "M" => "m",
        "N" => "n",
        "NG" => "ŋ",
        "P" => "p",
        "R" => "r",
        "S" => "s",
        "SH" => "ʃ",
        "T" => "t",
        "TH" => "θ",
        "V" => "v",
        "W" => "w",
        "Y" => "j",
        "Z" => "z",
        "ZH" => "ʒ",
        _ => "",
    }
}

/// Convert an ARPABET sequence to IPA with stress marks.
///
/// Monosyllables carry no mark. In longer words the first primary stress
/// gets `ˈ` and secondary stresses get `ˌ`, placed before the onset of
/// the stressed syllable.
pub fn arpabet_to_ipa(phonemes: &[String]) -> String {
    let vowel_count = phonemes.iter().filter(|p| is_vowel(p)).count();
    let mut marks: Vec<Option<char>> = vec![None; phonemes.len()];

    if vowel_count > 1 {
        let mut primary_seen = false;
        for (i, ph) in phonemes.iter().enumerate() {
            if !is_vowel(ph) {
                continue;
            }
            let mark = match stress_of(ph) {
                Some('1') if !primary_seen => {
                    primary_seen = true;
                    'ˈ'
                }
                Some('2') => 'ˌ',
                _ => continue,
            };
            marks[onset_start(phonemes, i)] = Some(mark);
        }
    }

    let mut ipa = String::new();
    for (ph, mark) in phonemes.iter().zip(marks) {
        if let Some(m) = mark {
            ipa.push(m);
        }
        ipa.push_str(arpabet_symbol(ph));
    }
    ipa
}

/// Built-in dictionary + letter-rule phonemizer. Always available.
#[derive(Debug, Default, Clone)]
pub struct RulePhonemizer;

impl RulePhonemizer {
    pub fn new() -> Self {
        Self
    }
}

impl Phonemizer for RulePhonemizer {
    fn name(&self) -> &str {
        "rules"
    }

    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
        let word = word.trim().to_lowercase();
        if !word.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(PhonemizeError::UnsupportedCharacter(word));
        }
        let ipa = arpabet_to_ipa(&word_to_phonemes(&word));
        if ipa.is_empty() {
            return Err(PhonemizeError::EmptyOutput(self.name().to_string()));
        }
        Ok(ipa)
    }
}

lazy_static::lazy_static! {
    /// Language-switch flags such as "(en)" or "(fr)".
    static ref LANGUAGE_FLAG: Regex = Regex::new(r"\([a-z-]+\)").unwrap();
}

/// espeak-ng's en-us voice writes LOT as `ɑː`. Keep the length mark only
/// before r, where it marks the START vowel.
fn shorten_lot(ipa: &str) -> String {
    let chars: Vec<char> = ipa.chars().collect();
    let mut out = String::with_capacity(ipa.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == 'ɑ'
            && chars.get(i + 1) == Some(&'ː')
            && !matches!(chars.get(i + 2), Some('ɹ' | 'r'))
        {
            out.push('ɑ');
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Bring espeak-ng's IPA into the alphabet the accent rules expect.
pub fn normalize_espeak(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = LANGUAGE_FLAG
        .replace_all(&joined, "")
        .replace('_', "")
        .replace('ɚ', "ər")
        .replace('ɝ', "ɜr")
        .replace('ɾ', "t")
        .replace('ᵻ', "ɪ");
    shorten_lot(cleaned.trim())
}

/// `espeak-ng` subprocess phonemizer (American voice).
#[derive(Debug, Clone)]
pub struct EspeakPhonemizer {
    pub program: String,
    pub voice: String,
}

impl EspeakPhonemizer {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            voice: "en-us".to_string(),
        }
    }
}

impl Default for EspeakPhonemizer {
    fn default() -> Self {
        Self::new("espeak-ng")
    }
}

impl Phonemizer for EspeakPhonemizer {
    fn name(&self) -> &str {
        "espeak"
    }

    fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
        let output = Command::new(&self.program)
            .args(["-q", "--ipa", "-v", &self.voice])
            .arg(word)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PhonemizeError::Unavailable(self.program.clone()),
                _ => PhonemizeError::Engine {
                    engine: self.name().to_string(),
                    message: e.to_string(),
                },
            })?;

        if !output.status.success() {
            return Err(PhonemizeError::Engine {
                engine: self.name().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let ipa = normalize_espeak(&String::from_utf8_lossy(&output.stdout));
        if ipa.is_empty() {
            return Err(PhonemizeError::EmptyOutput(self.name().to_string()));
        }
        Ok(ipa)
    }
}

/// Check if the espeak-ng binary can be run.
pub fn espeak_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get a phonemizer backend by name.
///
/// Modes:
/// - "rules": embedded dictionary + letter rules.
/// - "espeak": espeak-ng subprocess.
/// - "auto": espeak-ng when installed, rules otherwise.
pub fn get_phonemizer(name: &str, config: &TranscriptionConfig) -> Result<Box<dyn Phonemizer>> {
    let program = config.espeak_program();
    match name {
        "auto" => {
            if espeak_available(&program) {
                log::info!("Auto-detected espeak-ng, using espeak phonemizer");
                Ok(Box::new(EspeakPhonemizer::new(&program)))
            } else {
                log::info!("espeak-ng not available, using rule phonemizer");
                Ok(Box::new(RulePhonemizer::new()))
            }
        }
        "espeak" => Ok(Box::new(EspeakPhonemizer::new(&program))),
        "rules" => Ok(Box::new(RulePhonemizer::new())),
        _ => bail!("Unknown phonemizer: '{}'. Available: auto, espeak, rules", name),
    }
}

/// Primary engine per the config, plus the other engine as secondary.
pub fn phonemizer_pair(
    config: &TranscriptionConfig,
) -> Result<(Box<dyn Phonemizer>, Box<dyn Phonemizer>)> {
    let primary = get_phonemizer(&config.engine, config)?;
    let secondary: Box<dyn Phonemizer> = if primary.name() == "espeak" {
        Box::new(RulePhonemizer::new())
    } else {
        Box::new(EspeakPhonemizer::new(&config.espeak_program()))
    };
    Ok((primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(word: &str) -> String {
        RulePhonemizer::new().phonemize(word).unwrap()
    }

    #[test]
    fn test_lookup_common_words() {
        assert!(lookup("the").is_some());
        assert!(lookup("hello").is_some());
        assert_eq!(lookup("Cat"), lookup("CAT"));
        assert!(lookup("xyzzyplugh").is_none());
    }

    #[test]
    fn test_variants_keep_first() {
        assert_eq!(lookup("the").unwrap(), vec!["DH", "AH0"]);
        assert_eq!(lookup("for").unwrap(), vec!["F", "AO1", "R"]);
    }

    #[test]
    fn test_is_vowel() {
        assert!(is_vowel("AE1"));
        assert!(is_vowel("ER"));
        assert!(!is_vowel("K"));
        assert!(!is_vowel("TH"));
    }

    #[test]
    fn test_arpabet_monosyllable_unmarked() {
        assert_eq!(rules("cat"), "kæt");
        assert_eq!(rules("I"), "aɪ");
        assert_eq!(rules("hot"), "hɑt");
        assert_eq!(rules("see"), "siː");
    }

    #[test]
    fn test_arpabet_stress_placement() {
        assert_eq!(rules("hello"), "həˈloʊ");
        assert_eq!(rules("water"), "ˈwɔːtər");
        assert_eq!(rules("understand"), "ˌʌndərˈstænd");
        assert_eq!(rules("apple"), "ˈæpəl");
        assert_eq!(rules("yesterday"), "ˈjɛstərˌdeɪ");
    }

    #[test]
    fn test_onset_start_maximal() {
        let pron = lookup("absolutely").unwrap();
        assert_eq!(onset_start(&pron, 5), 4);
        let pron = lookup("understand").unwrap();
        assert_eq!(onset_start(&pron, 6), 4);
        assert_eq!(onset_start(&pron, 0), 0);
    }

    #[test]
    fn test_oov_uses_letter_rules() {
        let ipa = rules("blick");
        assert_eq!(ipa, "blɪk");
        assert!(!rules("xyzzyplugh").is_empty());
    }

    #[test]
    fn test_rules_reject_non_letters() {
        let err = RulePhonemizer::new().phonemize("1234").unwrap_err();
        assert!(matches!(err, PhonemizeError::UnsupportedCharacter(_)));
    }

    #[test]
    fn test_normalize_espeak() {
        assert_eq!(normalize_espeak(" wˈɔːɾɚ\n"), "wˈɔːtər");
        assert_eq!(normalize_espeak("bˈɝd"), "bˈɜrd");
        assert_eq!(normalize_espeak("(en)hˈɛloʊ(fr)"), "hˈɛloʊ");
        assert_eq!(normalize_espeak("ɹˈiːsᵻnt_"), "ɹˈiːsɪnt");
    }

    #[test]
    fn test_normalize_espeak_lot_vowel() {
        assert_eq!(normalize_espeak("hˈɑːt"), "hˈɑt");
        assert_eq!(
            crate::ipa::rules::convert_ga_to_rp(&normalize_espeak("hˈɑːt")),
            "hˈɒt"
        );
        assert_eq!(normalize_espeak("stˈɑːp"), "stˈɑp");
        // START keeps its length before r
        assert_eq!(normalize_espeak("kˈɑːɹ"), "kˈɑːɹ");
        assert_eq!(crate::ipa::rules::convert_ga_to_rp(&normalize_espeak("kˈɑːɹ")), "kˈɑː");
        assert_eq!(normalize_espeak("ɑː"), "ɑ");
    }

    #[test]
    fn test_espeak_missing_binary() {
        let p = EspeakPhonemizer::new("ipascribe-no-such-espeak");
        assert!(matches!(p.phonemize("cat"), Err(PhonemizeError::Unavailable(_))));
        assert!(!espeak_available("ipascribe-no-such-espeak"));
    }

    #[test]
    fn test_get_phonemizer() {
        let config = TranscriptionConfig::default();
        assert_eq!(get_phonemizer("rules", &config).unwrap().name(), "rules");
        assert_eq!(get_phonemizer("espeak", &config).unwrap().name(), "espeak");
        let auto = get_phonemizer("auto", &config).unwrap();
        assert!(auto.name() == "rules" || auto.name() == "espeak");
        assert!(get_phonemizer("neural", &config).is_err());
    }

    #[test]
    fn test_phonemizer_pair_differs() {
        let config = TranscriptionConfig {
            engine: "rules".to_string(),
            ..Default::default()
        };
        let (primary, secondary) = phonemizer_pair(&config).unwrap();
        assert_eq!(primary.name(), "rules");
        assert_eq!(secondary.name(), "espeak");
    }
}
