//! Text → IPA transcription for an accent.
//!
//! [`PhoneticTranscription`] is the public entry point: it validates the
//! request and hands each accent to a [`Transcriber`], which runs the line
//! pipeline (tokenize, resolve, strong/weak forms, cleanup, linking-r,
//! prosodic symbols).

use std::sync::Arc;

use anyhow::Result;

use crate::config::TranscriptionConfig;
use crate::error::TranscribeError;
use crate::ipa::{rules, symbols, weak_forms};
use crate::language::tokenize;
use crate::resolve::{HybridResolver, ResolutionStatistics};
use crate::types::{self, Accent, Token};

/// Minimum share of ASCII letters among all letters for text to count
/// as English.
pub const ENGLISH_LETTER_RATIO: f64 = 0.8;

/// Cheap script check: at least one letter, and mostly ASCII letters.
pub fn looks_like_english(text: &str) -> bool {
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    if letters == 0 {
        return false;
    }
    let ascii = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    ascii as f64 / letters as f64 >= ENGLISH_LETTER_RATIO
}

/// Line-preserving transcriber for one accent.
#[derive(Clone)]
pub struct Transcriber {
    accent: Accent,
    resolver: Arc<HybridResolver>,
}

impl Transcriber {
    pub fn new(accent: Accent, resolver: Arc<HybridResolver>) -> Self {
        Self { accent, resolver }
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    /// Transcribe `text`, one output line per input line.
    pub fn transcribe(&self, text: &str, use_weak_forms: bool) -> String {
        text.split('\n')
            .map(|line| self.transcribe_line(line.trim_end_matches('\r'), use_weak_forms))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn transcribe_line(&self, line: &str, use_weak_forms: bool) -> String {
        let tokens = tokenize::tokenize(line);
        if tokens.is_empty() {
            return String::new();
        }

        let mut draft = Vec::with_capacity(tokens.len());
        let mut resolved = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match token {
                Token::Word(word) => match self.resolver.get_pronunciation(word, self.accent) {
                    Some(resolution) => {
                        draft.push(resolution.ipa);
                        resolved.push(true);
                    }
                    None => {
                        log::warn!("No pronunciation for '{}', keeping spelling", word);
                        draft.push(word.clone());
                        resolved.push(false);
                    }
                },
                Token::Punct(p) => {
                    draft.push(p.to_string());
                    resolved.push(false);
                }
            }
        }

        let rewritten = weak_forms::apply_forms(&tokens, &mut draft, self.accent, use_weak_forms);
        for (ok, form) in resolved.iter_mut().zip(rewritten) {
            *ok |= form;
        }

        for (ipa, _) in draft.iter_mut().zip(&resolved).filter(|(_, ok)| **ok) {
            *ipa = rules::cleanup_word(ipa.as_str(), self.accent);
        }

        if self.accent.uses_linking_r() {
            weak_forms::apply_linking_r(&tokens, &mut draft, &resolved);
        }

        symbols::transform_symbols(&draft.join(" "))
    }
}

#[cfg(feature = "remote")]
fn attach_remote(resolver: HybridResolver, config: &TranscriptionConfig) -> Result<HybridResolver> {
    if !config.remote.enabled {
        return Ok(resolver);
    }
    let remote = crate::resolve::longman::LongmanDictionary::cached(
        &config.remote,
        crate::cache::PronunciationCache::new(),
    )?;
    Ok(resolver.with_remote(remote))
}

#[cfg(not(feature = "remote"))]
fn attach_remote(resolver: HybridResolver, config: &TranscriptionConfig) -> Result<HybridResolver> {
    if config.remote.enabled {
        log::warn!("Remote dictionary requested but built without the `remote` feature");
    }
    Ok(resolver)
}

/// Public transcription service shared by all accents.
pub struct PhoneticTranscription {
    resolver: Arc<HybridResolver>,
}

impl PhoneticTranscription {
    pub fn new(resolver: HybridResolver) -> Self {
        Self::from_shared(Arc::new(resolver))
    }

    pub fn from_shared(resolver: Arc<HybridResolver>) -> Self {
        Self { resolver }
    }

    /// Build the service described by `config`, attaching the Longman
    /// dictionary when the remote source is enabled.
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self> {
        let resolver = attach_remote(HybridResolver::from_config(config)?, config)?;
        Ok(Self::new(resolver))
    }

    pub fn resolver(&self) -> &Arc<HybridResolver> {
        &self.resolver
    }

    pub fn transcriber(&self, accent: Accent) -> Transcriber {
        Transcriber::new(accent, self.resolver.clone())
    }

    /// Transcribe `text` into IPA for the accent named by `accent_code`.
    ///
    /// Word-level failures never surface here: unresolvable words are
    /// emitted as written.
    pub fn transcribe_to_ipa(
        &self,
        text: &str,
        accent_code: &str,
        use_weak_forms: bool,
    ) -> Result<String, TranscribeError> {
        if text.trim().is_empty() {
            return Err(TranscribeError::EmptyInput);
        }
        let accent: Accent = accent_code.parse()?;
        if !looks_like_english(text) {
            return Err(TranscribeError::NotEnglish);
        }
        log::debug!(
            "Transcribing {} chars ({}, weak forms: {})",
            text.len(),
            accent,
            use_weak_forms
        );
        Ok(self.transcriber(accent).transcribe(text, use_weak_forms))
    }

    pub fn supported_accents(&self) -> Vec<&'static str> {
        types::supported_accents()
    }

    pub fn accent_description(&self, accent_code: &str) -> Result<&'static str, TranscribeError> {
        Ok(accent_code.parse::<Accent>()?.description())
    }

    pub fn statistics(&self) -> ResolutionStatistics {
        self.resolver.statistics()
    }
}
