//! Longman Dictionary of Contemporary English (LDOCE) online lookup.
//!
//! Pronunciations are scraped from the search result page. Extraction is
//! best-effort: a `PRON`/`pron`/`phon` span first, then any `/.../` text
//! that looks like IPA. Only British (RP) forms are returned.

use regex::Regex;

#[cfg(feature = "remote")]
use crate::config::RemoteConfig;
#[cfg(feature = "remote")]
use crate::error::RemoteLookupError;
#[cfg(feature = "remote")]
use super::remote::{CachedRemote, RateLimiter, RemoteDictionary};
#[cfg(feature = "remote")]
use crate::cache::PronunciationCache;
#[cfg(feature = "remote")]
use std::sync::Arc;
#[cfg(feature = "remote")]
use std::time::Duration;

/// Characters counted as IPA when judging extracted text.
const IPA_CHARS: &str = "ɑɒɔɜɛɪʊʌæəeiuːθðʃʒŋʤʧɹjwlmnpbtdkgfvszhaoˈˌ";

lazy_static::lazy_static! {
    static ref PRON_SPAN: Regex = Regex::new(
        r#"(?is)<span[^>]*class="[^"]*\b(?:PRON|pron|phon)\b[^"]*"[^>]*>(.*?)</span>"#
    ).unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]+>").unwrap();
    static ref SLASHED: Regex = Regex::new(r"/([^/\n]+)/").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lower-case and drop everything except word characters, `'` and `-`.
pub fn clean_word(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '-')
        .collect()
}

fn strip_tags(html: &str, separator: &str) -> String {
    TAG.replace_all(html, separator)
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Whether `text` plausibly is an IPA transcription: more than 30 % IPA
/// characters and at least one symbol outside plain ASCII.
pub fn looks_like_ipa(text: &str) -> bool {
    if text.chars().count() < 2 {
        return false;
    }
    let lower = text.to_lowercase();
    let ipa_count = lower.chars().filter(|c| IPA_CHARS.contains(*c)).count();
    let total = lower
        .chars()
        .filter(|c| c.is_alphabetic() || IPA_CHARS.contains(*c))
        .count();
    if total == 0 || lower.is_ascii() {
        return false;
    }
    ipa_count as f64 / total as f64 > 0.3
}

/// Normalize a raw transcription: first (British) variant only, slashes
/// and stray symbols removed, whitespace collapsed.
pub fn clean_transcription(raw: &str) -> Option<String> {
    // "ˈwɔːtə $ ˈwɒːtər, ˈwɑː-": `$` introduces the American form
    let first = raw.split(['$', ',', ';']).next().unwrap_or(raw);
    let kept: String = first
        .trim_matches(|c: char| c.is_whitespace() || c == '/')
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || IPA_CHARS.contains(*c) || matches!(c, '-' | '\'')
        })
        .collect();
    let cleaned = WHITESPACE.replace_all(kept.trim(), " ").to_string();
    (cleaned.chars().count() >= 2).then_some(cleaned)
}

/// Pull the first plausible pronunciation out of a result page.
pub fn extract_pronunciation(html: &str) -> Option<String> {
    for caps in PRON_SPAN.captures_iter(html) {
        let text = strip_tags(&caps[1], "");
        let text = text.trim();
        if looks_like_ipa(text) {
            if let Some(cleaned) = clean_transcription(text) {
                return Some(cleaned);
            }
        }
    }

    let text = strip_tags(html, " ");
    SLASHED
        .captures_iter(&text)
        .map(|caps| caps[1].to_string())
        .filter(|m| looks_like_ipa(m))
        .find_map(|m| clean_transcription(&m))
}

/// Blocking HTTP client for ldoceonline.com.
#[cfg(feature = "remote")]
pub struct LongmanDictionary {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[cfg(feature = "remote")]
impl LongmanDictionary {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteLookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RemoteLookupError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client wrapped with `cache` and the configured request spacing.
    pub fn cached(
        config: &RemoteConfig,
        cache: PronunciationCache,
    ) -> Result<Arc<CachedRemote<Self>>, RemoteLookupError> {
        let limiter = RateLimiter::new(Duration::from_millis(config.cooldown_ms));
        Ok(Arc::new(CachedRemote::with_cache(Self::new(config)?, limiter, cache)))
    }

    fn search_url(&self) -> String {
        format!("{}/search/", self.base_url)
    }
}

#[cfg(feature = "remote")]
impl RemoteDictionary for LongmanDictionary {
    fn name(&self) -> &str {
        "longman"
    }

    fn lookup(&self, word: &str) -> Result<Option<String>, RemoteLookupError> {
        let cleaned = clean_word(word);
        if cleaned.is_empty() {
            return Ok(None);
        }

        let http_err = |e: reqwest::Error| RemoteLookupError::Http {
            word: cleaned.clone(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.search_url())
            .query(&[("q", cleaned.as_str())])
            .send()
            .map_err(http_err)?;

        if !response.status().is_success() {
            return Err(RemoteLookupError::Status {
                word: cleaned.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().map_err(http_err)?;
        let pronunciation = extract_pronunciation(&body);
        log::debug!("Longman '{}' -> {:?}", cleaned, pronunciation);
        Ok(pronunciation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_PAGE: &str = r#"
        <html><body>
        <span class="HWD">water</span>
        <span class="PronCodes"><span class="PRON">ˈwɔːtə $ ˈwɒːtər, ˈwɑː-</span></span>
        <span class="POS">noun</span>
        </body></html>"#;

    const SLASHED_PAGE: &str = r#"
        <html><body><p>Visit <a href="/dictionary/car">car</a>.</p>
        <div>pronounced /kɑː/ in British English</div></body></html>"#;

    const EMPTY_PAGE: &str = r#"<html><body><p>Sorry, no results for qwxz.</p></body></html>"#;

    #[test]
    fn test_extract_from_pron_span() {
        assert_eq!(extract_pronunciation(WATER_PAGE), Some("ˈwɔːtə".to_string()));
    }

    #[test]
    fn test_extract_nested_markup() {
        let html = r#"<span class="pron"><i>ˈfɑː</i><b>ðə</b></span>"#;
        assert_eq!(extract_pronunciation(html), Some("ˈfɑːðə".to_string()));
    }

    #[test]
    fn test_extract_from_slashes() {
        assert_eq!(extract_pronunciation(SLASHED_PAGE), Some("kɑː".to_string()));
    }

    #[test]
    fn test_extract_nothing() {
        assert_eq!(extract_pronunciation(EMPTY_PAGE), None);
        assert_eq!(extract_pronunciation(""), None);
    }

    #[test]
    fn test_looks_like_ipa() {
        assert!(looks_like_ipa("ˈwɔːtə"));
        assert!(looks_like_ipa("kɑː"));
        assert!(!looks_like_ipa("dictionary"));
        assert!(!looks_like_ipa("ə"));
        assert!(!looks_like_ipa("2024-01-01"));
    }

    #[test]
    fn test_clean_transcription() {
        assert_eq!(clean_transcription(" /həˈləʊ/ "), Some("həˈləʊ".to_string()));
        assert_eq!(clean_transcription("ˈwɔːtə $ ˈwɒːtər"), Some("ˈwɔːtə".to_string()));
        assert_eq!(clean_transcription("/ə/"), None);
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word(" Don't! "), "don't");
        assert_eq!(clean_word("well-known"), "well-known");
        assert_eq!(clean_word("?!"), "");
    }

    #[cfg(feature = "remote")]
    #[test]
    fn test_client_builds() {
        let dict = LongmanDictionary::new(&RemoteConfig::default()).unwrap();
        assert_eq!(dict.name(), "longman");
        assert_eq!(dict.search_url(), "https://www.ldoceonline.com/search/");
    }

    #[cfg(feature = "remote")]
    #[test]
    fn test_cached_serves_from_cache() {
        let cache = PronunciationCache::new();
        cache.insert("car", Some("kɑː".to_string()));
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let remote = LongmanDictionary::cached(&config, cache).unwrap();
        assert_eq!(remote.lookup("car").unwrap(), Some("kɑː".to_string()));
        assert_eq!(remote.cache_size(), 1);
    }

    #[cfg(feature = "remote")]
    #[test]
    fn test_blank_word_skips_request() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let dict = LongmanDictionary::new(&config).unwrap();
        assert_eq!(dict.lookup("...").unwrap(), None);
    }
}
