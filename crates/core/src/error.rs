//! Error taxonomy for the transcription engine.
//!
//! Only [`TranscribeError`] ever reaches callers of the public entry point.
//! Phonemizer and remote failures are recovered inside the resolver.

use thiserror::Error;

/// Request-level failures surfaced by `transcribe_to_ipa`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscribeError {
    #[error("unsupported accent '{code}' (available: {available})")]
    UnsupportedAccent { code: String, available: String },

    #[error("input text is empty")]
    EmptyInput,

    #[error("input text does not look like English")]
    NotEnglish,
}

/// A grapheme-to-phoneme engine could not produce IPA for a word.
#[derive(Debug, Error)]
pub enum PhonemizeError {
    #[error("phonemizer '{0}' is not available")]
    Unavailable(String),

    #[error("phonemizer '{engine}' failed: {message}")]
    Engine { engine: String, message: String },

    #[error("unsupported characters in '{0}'")]
    UnsupportedCharacter(String),

    #[error("phonemizer '{0}' returned no output")]
    EmptyOutput(String),
}

/// The remote dictionary could not be queried.
#[derive(Debug, Error)]
pub enum RemoteLookupError {
    #[error("request for '{word}' failed: {message}")]
    Http { word: String, message: String },

    #[error("remote dictionary answered HTTP {status} for '{word}'")]
    Status { word: String, status: u16 },

    #[error("could not build HTTP client: {0}")]
    Client(String),
}
