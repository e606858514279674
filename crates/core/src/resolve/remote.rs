//! Remote dictionary abstraction with caching and request spacing.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crate::cache::PronunciationCache;
use crate::error::RemoteLookupError;

/// An online pronunciation dictionary.
pub trait RemoteDictionary: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when the service has no pronunciation for the word.
    fn lookup(&self, word: &str) -> Result<Option<String>, RemoteLookupError>;
}

/// Enforces a minimum interval between consecutive requests.
#[derive(Debug)]
pub struct RateLimiter {
    cooldown: Duration,
    /// Earliest instant the next request may be sent
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            next_slot: Mutex::new(None),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Block until a request may be sent.
    ///
    /// Each caller reserves its slot under the lock and sleeps after
    /// releasing it, so concurrent callers never wait on the mutex itself.
    pub fn wait(&self) {
        let delay = {
            let mut next = self.next_slot.lock().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();
            let slot = match *next {
                Some(t) if t > now => t,
                _ => now,
            };
            *next = Some(slot + self.cooldown);
            slot.saturating_duration_since(now)
        };
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Wraps a [`RemoteDictionary`] with a cache and a rate limiter.
///
/// Cached words (hits and misses) never reach the inner dictionary.
/// Failed requests are not cached.
pub struct CachedRemote<R> {
    inner: R,
    cache: PronunciationCache,
    limiter: RateLimiter,
}

impl<R: RemoteDictionary> CachedRemote<R> {
    pub fn new(inner: R, limiter: RateLimiter) -> Self {
        Self::with_cache(inner, limiter, PronunciationCache::new())
    }

    pub fn with_cache(inner: R, limiter: RateLimiter, cache: PronunciationCache) -> Self {
        Self {
            inner,
            cache,
            limiter,
        }
    }

    pub fn cache(&self) -> &PronunciationCache {
        &self.cache
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl<R: RemoteDictionary> RemoteDictionary for CachedRemote<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lookup(&self, word: &str) -> Result<Option<String>, RemoteLookupError> {
        if let Some(cached) = self.cache.get(word) {
            log::debug!("Cache hit: '{}' ({})", word, self.inner.name());
            return Ok(cached);
        }
        self.limiter.wait();
        let result = self.inner.lookup(word)?;
        Ok(self.cache.insert(word, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingRemote {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl RemoteDictionary for CountingRemote {
        fn name(&self) -> &str {
            "counting"
        }

        fn lookup(&self, word: &str) -> Result<Option<String>, RemoteLookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RemoteLookupError::Status {
                    word: word.to_string(),
                    status: 503,
                });
            }
            Ok(match word {
                "car" => Some("kɑː".to_string()),
                _ => None,
            })
        }
    }

    fn remote(fail: bool) -> (CachedRemote<CountingRemote>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingRemote {
            calls: calls.clone(),
            fail,
        };
        (CachedRemote::new(inner, RateLimiter::new(Duration::ZERO)), calls)
    }

    #[test]
    fn test_hits_and_misses_cached() {
        let (remote, calls) = remote(false);
        assert_eq!(remote.lookup("car").unwrap(), Some("kɑː".to_string()));
        assert_eq!(remote.lookup("car").unwrap(), Some("kɑː".to_string()));
        assert_eq!(remote.lookup("qwxz").unwrap(), None);
        assert_eq!(remote.lookup("qwxz").unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(remote.cache_size(), 2);
    }

    #[test]
    fn test_errors_not_cached() {
        let (remote, calls) = remote(true);
        assert!(remote.lookup("car").is_err());
        assert!(remote.lookup("car").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(remote.cache_size(), 0);
    }

    #[test]
    fn test_clear_cache_refetches() {
        let (remote, calls) = remote(false);
        remote.lookup("car").unwrap();
        remote.clear_cache();
        remote.lookup("car").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rate_limiter_spacing() {
        let limiter = RateLimiter::new(Duration::from_millis(40));
        let start = Instant::now();
        limiter.wait();
        limiter.wait();
        limiter.wait();
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_rate_limiter_concurrent_callers_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(30));
        let start = Instant::now();
        let mut woke: Vec<Instant> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        limiter.wait();
                        Instant::now()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        woke.sort();
        for (k, t) in woke.iter().enumerate() {
            assert!(t.duration_since(start) >= Duration::from_millis(30) * k as u32);
        }
    }

    #[test]
    fn test_rate_limiter_lock_free_while_sleeping() {
        let limiter = RateLimiter::new(Duration::from_millis(200));
        limiter.wait();
        thread::scope(|scope| {
            let sleeper = scope.spawn(|| limiter.wait());
            thread::sleep(Duration::from_millis(50));
            assert!(limiter.next_slot.try_lock().is_ok());
            sleeper.join().unwrap();
        });
    }

    #[test]
    fn test_rate_limiter_first_request_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.cooldown(), Duration::from_secs(5));
    }
}
