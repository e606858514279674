//! Ordered pattern rewrite chains for accent conversion and cleanup.
//!
//! The `regex` crate has no look-around, so each rule carries optional
//! character guards that are checked against the *input* text around a
//! match. A rejected match does not consume input: scanning resumes one
//! character after its start.

use std::collections::HashMap;

use regex::Regex;

use crate::types::Accent;

/// A single pattern → replacement rewrite.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Human-readable label, used to assert chain order in tests
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
    not_preceded_by: Option<&'static str>,
    followed_by: Option<&'static str>,
    not_followed_by: Option<&'static str>,
}

impl RewriteRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            // Patterns are compile-time constants in this module.
            pattern: Regex::new(pattern).expect("invalid rewrite pattern"),
            replacement,
            not_preceded_by: None,
            followed_by: None,
            not_followed_by: None,
        }
    }

    fn not_preceded_by(mut self, chars: &'static str) -> Self {
        self.not_preceded_by = Some(chars);
        self
    }

    fn followed_by(mut self, chars: &'static str) -> Self {
        self.followed_by = Some(chars);
        self
    }

    fn not_followed_by(mut self, chars: &'static str) -> Self {
        self.not_followed_by = Some(chars);
        self
    }

    fn context_allows(&self, text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        if let (Some(set), Some(c)) = (self.not_preceded_by, before) {
            if set.contains(c) {
                return false;
            }
        }
        if let Some(set) = self.followed_by {
            match after {
                Some(c) if set.contains(c) => {}
                _ => return false,
            }
        }
        if let (Some(set), Some(c)) = (self.not_followed_by, after) {
            if set.contains(c) {
                return false;
            }
        }
        true
    }

    /// Apply this rule to every admissible, non-overlapping match.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 8);
        let mut copied = 0;
        let mut pos = 0;

        while pos <= text.len() {
            let Some(m) = self.pattern.find_at(text, pos) else {
                break;
            };
            if m.end() > m.start() && self.context_allows(text, m.start(), m.end()) {
                out.push_str(&text[copied..m.start()]);
                out.push_str(self.replacement);
                copied = m.end();
                pos = m.end();
            } else {
                pos = next_boundary(text, m.start());
            }
        }

        out.push_str(&text[copied..]);
        out
    }
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map(|c| at + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// An explicitly ordered list of rewrite rules.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<RewriteRule>,
}

impl RuleChain {
    fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

const CONSONANTS: &str = "bcdfghjklmnpqstvwxyzθðʃʒŋɡʔɫ";

lazy_static::lazy_static! {
    /// GA → RP conversion applied to raw phonemizer output.
    static ref GA_TO_RP: RuleChain = RuleChain::new(vec![
        RewriteRule::new("rhotic glyph", "ɹ", "r"),
        RewriteRule::new("open schwa", "ɐ", "ə"),
        // R-coloured vowels become long vowels / centring diphthongs
        RewriteRule::new("ɑr", "ɑr", "ɑː"),
        RewriteRule::new("ɔr", "ɔr", "ɔː"),
        RewriteRule::new("ɜr", "ɜr", "ɜː"),
        RewriteRule::new("ər", "ər", "ə"),
        RewriteRule::new("ɪr", "ɪr", "ɪə"),
        RewriteRule::new("ɛr", "ɛr", "eə"),
        RewriteRule::new("ʊr", "ʊr", "ʊə"),
        // Non-rhotic r
        RewriteRule::new("r before consonant", "r", "").followed_by(CONSONANTS),
        RewriteRule::new("r before space", r"r\s", " "),
        RewriteRule::new("final r", "r$", ""),
        // LOT
        RewriteRule::new("lot", "ɑ", "ɒ")
            .not_preceded_by("ɑː")
            .not_followed_by("ːr"),
        // GOAT
        RewriteRule::new("goat", "oʊ", "əʊ"),
        // BATH, longest patterns first
        RewriteRule::new("bath æf", "æf", "ɑːf").not_followed_by("ɪei"),
        RewriteRule::new("bath æθ", "æθ", "ɑːθ"),
        RewriteRule::new("bath æsk", "æsk", "ɑːsk"),
        RewriteRule::new("bath ænt", "ænt", "ɑːnt"),
        RewriteRule::new("bath æns", "æns", "ɑːns"),
        RewriteRule::new("bath æst", "æst", "ɑːst"),
        RewriteRule::new("bath æs", "æs", "ɑːs").followed_by("st"),
        RewriteRule::new("whitespace", r"\s+", " "),
    ]);

    /// Post-resolution cleanup for RP words.
    static ref RP_CLEANUP: RuleChain = RuleChain::new(vec![
        RewriteRule::new("rhotic glyph", "ɹ", "r"),
        RewriteRule::new("dress vowel", "ɛ", "e"),
        RewriteRule::new("open schwa", "ɐ", "ə"),
        RewriteRule::new("double stress", "ˈˈ+", "ˈ"),
    ]);

    /// Post-resolution cleanup for American words.
    static ref AMERICAN_CLEANUP: RuleChain = RuleChain::new(vec![
        RewriteRule::new("long father vowel", "ɑː", "ɑ"),
        RewriteRule::new("lot vowel", "ɒ", "ɑ"),
        RewriteRule::new("rhotic glyph", "ɹ", "r"),
        RewriteRule::new("double stress", "ˈˈ+", "ˈ"),
    ]);

    /// American phonemizer output only needs glyph normalization.
    static ref AMERICAN_CONVERSION: RuleChain = RuleChain::new(vec![
        RewriteRule::new("rhotic glyph", "ɹ", "r"),
        RewriteRule::new("whitespace", r"\s+", " "),
    ]);

    /// Whole-word fixes for systematic RP phonemizer mistakes.
    /// Keys are stress-mark-free.
    static ref RP_WORD_CORRECTIONS: HashMap<&'static str, &'static str> = [
        ("hapi", "ˈhæpi"),
        ("hæpi", "ˈhæpi"),
        ("evrɪ", "ˈevri"),
        ("əmeɪzɪŋ", "əˈmeɪzɪŋ"),
        ("əbsəluːtli", "ˈæbsəluːtli"),
        ("əbaʊt", "əˈbaʊt"),
        ("əgriː", "əˈɡriː"),
        ("ənʌðər", "əˈnʌðə"),
        ("ənʌðə", "əˈnʌðə"),
    ]
    .into_iter()
    .collect();
}

/// Rewrite a GA-leaning IPA string into RP.
pub fn convert_ga_to_rp(ipa: &str) -> String {
    GA_TO_RP.apply(ipa).trim().to_string()
}

/// The chain that turns raw phonemizer output into `accent` IPA.
pub fn conversion_chain(accent: Accent) -> &'static RuleChain {
    match accent {
        Accent::Rp => &GA_TO_RP,
        Accent::American => &AMERICAN_CONVERSION,
    }
}

/// Convert raw phonemizer output for `accent`.
pub fn convert_for_accent(raw: &str, accent: Accent) -> String {
    conversion_chain(accent).apply(raw).trim().to_string()
}

/// Accent-specific cleanup applied to a resolved word.
pub fn cleanup_word(ipa: &str, accent: Accent) -> String {
    match accent {
        Accent::Rp => {
            let cleaned = RP_CLEANUP.apply(ipa);
            let key: String = cleaned.chars().filter(|c| !matches!(c, 'ˈ' | 'ˌ')).collect();
            match RP_WORD_CORRECTIONS.get(key.as_str()) {
                Some(fixed) => fixed.to_string(),
                None => cleaned,
            }
        }
        Accent::American => AMERICAN_CLEANUP.apply(ipa),
    }
}
