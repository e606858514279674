//! Word → IPA resolution across local and remote sources.

pub mod longman;
pub mod remote;
pub mod resolver;

pub use remote::{CachedRemote, RateLimiter, RemoteDictionary};
pub use resolver::{HybridResolver, ResolutionStatistics};
