//! English → IPA transcription for Received Pronunciation and General
//! American.

pub mod cache;
pub mod config;
pub mod error;
pub mod ipa;
pub mod language;
pub mod resolve;
pub mod transcribe;
pub mod types;

pub use config::TranscriptionConfig;
pub use error::TranscribeError;
pub use resolve::{HybridResolver, ResolutionStatistics};
pub use transcribe::{PhoneticTranscription, Transcriber};
pub use types::{Accent, ResolutionMode, supported_accents};
