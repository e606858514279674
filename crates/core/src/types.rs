use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranscribeError;

/// Accent variant a transcription is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    /// Received Pronunciation (non-rhotic British standard)
    Rp,
    /// General American (rhotic)
    American,
}

impl Accent {
    /// Every accent the engine can transcribe into.
    pub const ALL: [Accent; 2] = [Accent::Rp, Accent::American];

    /// Canonical accent code ("rp" / "american").
    pub fn code(&self) -> &'static str {
        match self {
            Accent::Rp => "rp",
            Accent::American => "american",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Accent::Rp => "Received Pronunciation (British Standard)",
            Accent::American => "General American (American Standard)",
        }
    }

    /// Whether linking-r is inserted between vowel-final and vowel-initial words.
    pub fn uses_linking_r(&self) -> bool {
        matches!(self, Accent::Rp)
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Accent {
    type Err = TranscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rp" | "gb" | "en-gb" | "british" => Ok(Accent::Rp),
            "american" | "ga" | "us" | "en-us" => Ok(Accent::American),
            _ => Err(TranscribeError::UnsupportedAccent {
                code: s.to_string(),
                available: supported_accents().join(", "),
            }),
        }
    }
}

/// Accent codes accepted by the public transcription entry point.
pub fn supported_accents() -> Vec<&'static str> {
    Accent::ALL.iter().map(|a| a.code()).collect()
}

/// How the resolver looks a word up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Remote dictionary, local dictionary, then phonemizers
    #[default]
    Hybrid,
    /// Phonemizers only
    Direct,
}

impl FromStr for ResolutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hybrid" => Ok(ResolutionMode::Hybrid),
            "direct" => Ok(ResolutionMode::Direct),
            other => Err(format!("Unknown mode: '{}'. Available: hybrid, direct", other)),
        }
    }
}

/// A unit of tokenized input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Lower-cased orthographic word (letters, digits, internal apostrophes)
    Word(String),
    /// Retained punctuation mark
    Punct(char),
}

impl Token {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::Punct(_) => None,
        }
    }

    pub fn is_sentence_end(&self) -> bool {
        matches!(self, Token::Punct('.' | '!' | '?'))
    }
}

/// Where a pronunciation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Remote dictionary service
    Remote,
    /// Local compiled-in dictionary
    Dictionary,
    /// Primary phonemizer + accent rule conversion
    Conversion,
    /// Secondary phonemizer + accent rule conversion
    Fallback,
    /// Nothing resolved; the orthographic word is emitted as-is
    Passthrough,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Remote => "remote",
            Source::Dictionary => "dictionary",
            Source::Conversion => "conversion",
            Source::Fallback => "fallback",
            Source::Passthrough => "passthrough",
        };
        f.write_str(name)
    }
}

/// A pronunciation together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub ipa: String,
    pub source: Source,
}

impl Resolution {
    pub fn new(ipa: impl Into<String>, source: Source) -> Self {
        Self {
            ipa: ipa.into(),
            source,
        }
    }
}
