//! Prioritized multi-source pronunciation lookup.
//!
//! A word is resolved by the first source that answers:
//! 1. remote dictionary (RP only, when attached and enabled)
//! 2. compiled-in dictionary
//! 3. primary phonemizer + accent conversion
//! 4. secondary phonemizer + accent conversion
//!
//! [`ResolutionMode::Direct`] skips the first two.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use serde::Serialize;

use crate::config::TranscriptionConfig;
use crate::ipa::{dictionary, rules, symbols};
use crate::language::g2p::{self, Phonemizer};
use crate::language::tokenize;
use crate::types::{Accent, ResolutionMode, Resolution, Source, Token};

use super::remote::RemoteDictionary;

/// Per-source hit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStatistics {
    pub remote_hits: u64,
    pub dictionary_hits: u64,
    /// Primary phonemizer + conversion
    pub conversion_hits: u64,
    /// Secondary phonemizer + conversion
    pub fallback_hits: u64,
    pub total_requests: u64,
}

impl ResolutionStatistics {
    pub fn successful(&self) -> u64 {
        self.remote_hits + self.dictionary_hits + self.conversion_hits + self.fallback_hits
    }

    /// Fraction of requests that produced a pronunciation (0 when idle).
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.successful() as f64 / self.total_requests as f64
    }

    fn record(&mut self, source: Source) {
        match source {
            Source::Remote => self.remote_hits += 1,
            Source::Dictionary => self.dictionary_hits += 1,
            Source::Conversion => self.conversion_hits += 1,
            Source::Fallback => self.fallback_hits += 1,
            Source::Passthrough => {}
        }
    }
}

impl fmt::Display for ResolutionStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution statistics:")?;
        writeln!(f, "  Total requests:  {}", self.total_requests)?;
        writeln!(f, "  Remote hits:     {}", self.remote_hits)?;
        writeln!(f, "  Dictionary hits: {}", self.dictionary_hits)?;
        writeln!(f, "  Conversion hits: {}", self.conversion_hits)?;
        writeln!(f, "  Fallback hits:   {}", self.fallback_hits)?;
        write!(f, "  Success rate:    {:.1}%", self.success_rate() * 100.0)
    }
}

/// Resolves single words to IPA for an accent.
pub struct HybridResolver {
    primary: Box<dyn Phonemizer>,
    secondary: Box<dyn Phonemizer>,
    remote: Option<Arc<dyn RemoteDictionary>>,
    remote_enabled: AtomicBool,
    mode: ResolutionMode,
    stats: Mutex<ResolutionStatistics>,
}

impl HybridResolver {
    pub fn new(primary: Box<dyn Phonemizer>, secondary: Box<dyn Phonemizer>) -> Self {
        Self {
            primary,
            secondary,
            remote: None,
            remote_enabled: AtomicBool::new(false),
            mode: ResolutionMode::Hybrid,
            stats: Mutex::new(ResolutionStatistics::default()),
        }
    }

    /// Attach a remote dictionary and enable it.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteDictionary>) -> Self {
        self.remote = Some(remote);
        self.remote_enabled = AtomicBool::new(true);
        self
    }

    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Offline resolver for a config: phonemizers per `engine`, no remote.
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self> {
        let (primary, secondary) = g2p::phonemizer_pair(config)?;
        log::info!(
            "Resolver: mode={:?}, primary={}, secondary={}",
            config.mode,
            primary.name(),
            secondary.name()
        );
        Ok(Self::new(primary, secondary).with_mode(config.mode))
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Turn the remote source on or off. No effect without an attached remote.
    pub fn enable_remote_source(&self, enabled: bool) {
        self.remote_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some() && self.remote_enabled.load(Ordering::Relaxed)
    }

    fn with_stats<T>(&self, f: impl FnOnce(&mut ResolutionStatistics) -> T) -> T {
        let mut stats = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut stats)
    }

    pub fn statistics(&self) -> ResolutionStatistics {
        self.with_stats(|s| *s)
    }

    pub fn reset_statistics(&self) {
        self.with_stats(|s| *s = ResolutionStatistics::default());
    }

    fn hit(&self, word: &str, ipa: String, source: Source) -> Option<Resolution> {
        self.with_stats(|s| s.record(source));
        log::debug!("'{}' -> {} ({})", word, ipa, source);
        Some(Resolution::new(ipa, source))
    }

    fn lookup_remote(&self, word: &str) -> Option<String> {
        let remote = self.remote.as_ref()?;
        match remote.lookup(word) {
            Ok(found) => found.filter(|ipa| !ipa.trim().is_empty()),
            Err(e) => {
                log::warn!("Remote lookup via {} failed: {}", remote.name(), e);
                None
            }
        }
    }

    fn phonemize_with(&self, engine: &dyn Phonemizer, word: &str, accent: Accent) -> Option<String> {
        match engine.phonemize(word) {
            Ok(raw) => {
                let raw = raw.trim();
                if raw.is_empty() || raw == word {
                    return None;
                }
                let ipa = rules::convert_for_accent(raw, accent);
                (!ipa.is_empty()).then_some(ipa)
            }
            Err(e) => {
                log::debug!("Phonemizer {} failed for '{}': {}", engine.name(), word, e);
                None
            }
        }
    }

    /// Pronunciation of `word` for `accent`, or `None` when every source
    /// fails. Blank words return `None` without being counted.
    pub fn get_pronunciation(&self, word: &str, accent: Accent) -> Option<Resolution> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return None;
        }
        self.with_stats(|s| s.total_requests += 1);

        if self.mode == ResolutionMode::Hybrid {
            if accent == Accent::Rp && self.remote_enabled() {
                if let Some(ipa) = self.lookup_remote(&word) {
                    return self.hit(&word, ipa, Source::Remote);
                }
            }
            if let Some(ipa) = dictionary::lookup(&word, accent) {
                return self.hit(&word, ipa.to_string(), Source::Dictionary);
            }
        }

        if let Some(ipa) = self.phonemize_with(self.primary.as_ref(), &word, accent) {
            return self.hit(&word, ipa, Source::Conversion);
        }
        if let Some(ipa) = self.phonemize_with(self.secondary.as_ref(), &word, accent) {
            return self.hit(&word, ipa, Source::Fallback);
        }

        log::debug!("No pronunciation for '{}'", word);
        None
    }

    /// Resolve many words in parallel; results keep the input order.
    pub fn resolve_all(&self, words: &[String], accent: Accent) -> Vec<Option<Resolution>> {
        if words.is_empty() {
            return Vec::new();
        }
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(words.len());
        let chunk_size = words.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = words
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|w| self.get_pronunciation(w, accent))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Word-by-word transcription without function-word processing.
    ///
    /// Unresolved words are kept in lower-case; punctuation becomes the
    /// usual prosodic markers.
    pub fn transcribe_text(&self, text: &str, accent: Accent) -> String {
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| {
                tokenize::tokenize(line.trim_end_matches('\r'))
                    .into_iter()
                    .map(|token| match token {
                        Token::Word(w) => self
                            .get_pronunciation(&w, accent)
                            .map(|r| r.ipa)
                            .unwrap_or(w),
                        Token::Punct(p) => p.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        symbols::transform_symbols(&lines.join("\n"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{PhonemizeError, RemoteLookupError};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Phonemizer answering from a fixed table.
    pub(crate) struct TablePhonemizer {
        pub name: &'static str,
        pub table: HashMap<&'static str, &'static str>,
    }

    impl TablePhonemizer {
        pub fn new(name: &'static str, entries: &[(&'static str, &'static str)]) -> Self {
            Self {
                name,
                table: entries.iter().copied().collect(),
            }
        }
    }

    impl Phonemizer for TablePhonemizer {
        fn name(&self) -> &str {
            self.name
        }

        fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
            self.table
                .get(word)
                .map(|s| s.to_string())
                .ok_or_else(|| PhonemizeError::EmptyOutput(self.name.to_string()))
        }
    }

    /// Phonemizer that always fails.
    pub(crate) struct BrokenPhonemizer;

    impl Phonemizer for BrokenPhonemizer {
        fn name(&self) -> &str {
            "broken"
        }

        fn phonemize(&self, _word: &str) -> Result<String, PhonemizeError> {
            Err(PhonemizeError::Unavailable("broken".to_string()))
        }
    }

    /// Phonemizer echoing the word back unchanged.
    struct EchoPhonemizer;

    impl Phonemizer for EchoPhonemizer {
        fn name(&self) -> &str {
            "echo"
        }

        fn phonemize(&self, word: &str) -> Result<String, PhonemizeError> {
            Ok(word.to_string())
        }
    }

    struct FakeRemote {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RemoteDictionary for FakeRemote {
        fn name(&self) -> &str {
            "fake"
        }

        fn lookup(&self, word: &str) -> Result<Option<String>, RemoteLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RemoteLookupError::Http {
                    word: word.to_string(),
                    message: "timed out".to_string(),
                });
            }
            Ok((word == "tomato").then(|| "təˈmɑːtəʊ".to_string()))
        }
    }

    fn resolver() -> HybridResolver {
        HybridResolver::new(
            Box::new(TablePhonemizer::new("primary", &[("zebra", "ˈzibɹə"), ("hot", "hɑt")])),
            Box::new(TablePhonemizer::new("secondary", &[("quark", "kwɔrk")])),
        )
    }

    #[test]
    fn test_dictionary_first() {
        let r = resolver();
        let res = r.get_pronunciation("Hello", Accent::Rp).unwrap();
        assert_eq!(res, Resolution::new("həˈləʊ", Source::Dictionary));
        let res = r.get_pronunciation("hello", Accent::American).unwrap();
        assert_eq!(res.ipa, "həˈloʊ");
    }

    #[test]
    fn test_primary_conversion() {
        let r = resolver();
        let res = r.get_pronunciation("zebra", Accent::Rp).unwrap();
        assert_eq!(res, Resolution::new("ˈzibrə", Source::Conversion));
        let res = r.get_pronunciation("zebra", Accent::American).unwrap();
        assert_eq!(res.ipa, "ˈzibrə");
    }

    #[test]
    fn test_secondary_fallback() {
        let r = resolver();
        let res = r.get_pronunciation("quark", Accent::Rp).unwrap();
        assert_eq!(res, Resolution::new("kwɔːk", Source::Fallback));
        let res = r.get_pronunciation("quark", Accent::American).unwrap();
        assert_eq!(res.ipa, "kwɔrk");
    }

    #[test]
    fn test_unresolvable_and_blank() {
        let r = resolver();
        assert!(r.get_pronunciation("xylophone", Accent::Rp).is_none());
        assert!(r.get_pronunciation("   ", Accent::Rp).is_none());
        let stats = r.statistics();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.successful(), 0);
    }

    #[test]
    fn test_echo_output_rejected() {
        let r = HybridResolver::new(Box::new(EchoPhonemizer), Box::new(BrokenPhonemizer));
        assert!(r.get_pronunciation("blorp", Accent::Rp).is_none());
    }

    #[test]
    fn test_statistics_consistent() {
        let r = resolver();
        for w in ["hello", "zebra", "quark", "xylophone", "car"] {
            r.get_pronunciation(w, Accent::Rp);
        }
        let stats = r.statistics();
        assert_eq!(stats.total_requests, 5);
        assert_eq!(stats.dictionary_hits, 2);
        assert_eq!(stats.conversion_hits, 1);
        assert_eq!(stats.fallback_hits, 1);
        assert_eq!(stats.remote_hits, 0);
        assert!(stats.successful() <= stats.total_requests);
        assert!((stats.success_rate() - 0.8).abs() < 1e-9);

        r.reset_statistics();
        assert_eq!(r.statistics(), ResolutionStatistics::default());
        assert_eq!(r.statistics().success_rate(), 0.0);
    }

    #[test]
    fn test_direct_mode_skips_dictionary() {
        let r = HybridResolver::new(
            Box::new(TablePhonemizer::new("primary", &[("car", "kɑɹ")])),
            Box::new(BrokenPhonemizer),
        )
        .with_mode(ResolutionMode::Direct);
        let res = r.get_pronunciation("car", Accent::Rp).unwrap();
        assert_eq!(res.source, Source::Conversion);
        assert_eq!(res.ipa, "kɑː");
    }

    #[test]
    fn test_remote_rp_only() {
        let remote = Arc::new(FakeRemote {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let r = resolver().with_remote(remote.clone());
        let res = r.get_pronunciation("tomato", Accent::Rp).unwrap();
        assert_eq!(res, Resolution::new("təˈmɑːtəʊ", Source::Remote));
        assert!(r.get_pronunciation("tomato", Accent::American).is_none());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
        assert_eq!(r.statistics().remote_hits, 1);
    }

    #[test]
    fn test_remote_miss_falls_through() {
        let remote = Arc::new(FakeRemote {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let r = resolver().with_remote(remote);
        let res = r.get_pronunciation("hello", Accent::Rp).unwrap();
        assert_eq!(res.source, Source::Dictionary);
    }

    #[test]
    fn test_remote_failure_is_a_miss() {
        let remote = Arc::new(FakeRemote {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let r = resolver().with_remote(remote.clone());
        let res = r.get_pronunciation("hello", Accent::Rp).unwrap();
        assert_eq!(res.source, Source::Dictionary);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_enable_remote_source() {
        let remote = Arc::new(FakeRemote {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let r = resolver().with_remote(remote.clone());
        assert!(r.remote_enabled());
        r.enable_remote_source(false);
        assert!(!r.remote_enabled());
        assert!(r.get_pronunciation("tomato", Accent::Rp).is_none());
        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);

        let bare = resolver();
        bare.enable_remote_source(true);
        assert!(!bare.remote_enabled());
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let r = resolver();
        let words: Vec<String> = ["zebra", "xylophone", "hello", "quark", "car", "hot"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = r.resolve_all(&words, Accent::Rp);
        assert_eq!(results.len(), words.len());
        for (word, result) in words.iter().zip(&results) {
            assert_eq!(*result, r.get_pronunciation(word, Accent::Rp));
        }
        assert!(results[1].is_none());
        assert_eq!(results[5].as_ref().unwrap().ipa, "hɒt");
        assert!(r.resolve_all(&[], Accent::Rp).is_empty());
    }

    #[test]
    fn test_transcribe_text() {
        let r = resolver();
        assert_eq!(r.transcribe_text("Hello, zebra!", Accent::Rp), "həˈləʊ/ ˈzibrə(!)");
        assert_eq!(r.transcribe_text("xylophone\n\ncar.", Accent::Rp), "xylophone\n\nkɑː//");
    }

    #[test]
    fn test_statistics_display() {
        let r = resolver();
        r.get_pronunciation("hello", Accent::Rp);
        let report = r.statistics().to_string();
        assert!(report.contains("Dictionary hits: 1"));
        assert!(report.contains("Success rate:    100.0%"));
    }

    #[test]
    fn test_from_config_rules_engine() {
        let config = TranscriptionConfig {
            engine: "rules".to_string(),
            mode: ResolutionMode::Direct,
            ..Default::default()
        };
        let r = HybridResolver::from_config(&config).unwrap();
        assert_eq!(r.mode(), ResolutionMode::Direct);
        let res = r.get_pronunciation("cat", Accent::Rp).unwrap();
        assert_eq!(res, Resolution::new("kæt", Source::Conversion));
    }
}
