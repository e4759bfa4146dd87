//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value paired with its absolute expiration time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written
    pub created_at: Instant,
    /// Expiration instant, None = the TTL overflowed the clock and the
    /// entry never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// A zero TTL yields an entry that is already expired on the next read.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal
    /// to its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, zero once expired, or None if the entry
    /// never expires.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60));

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Duration::from_millis(1));

        sleep(Duration::from_millis(2));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(1u32, Duration::ZERO);
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let entry = CacheEntry::new(1u32, Duration::MAX);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("v", Duration::from_secs(10));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", Duration::from_secs(5));
        let expires = entry.expires_at.unwrap();

        assert!(!entry.is_expired_at(expires - Duration::from_millis(1)));
        assert!(entry.is_expired_at(expires), "Entry should be expired at boundary");
    }
}
