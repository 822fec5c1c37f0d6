//! The registry itself: add, remove, list, evict.
//!
//! # Concurrency note
//!
//! `TargetRegistry` is NOT thread-safe by itself: it is a plain `Vec`
//! behind ordinary methods. This is intentional: the registry is owned by
//! a single task (the session actor) and every external caller reaches it
//! through that actor's channel. Keeping it simple here avoids hidden
//! locking overhead and makes the eviction-before-everything rule easy
//! to see.

use std::time::{Duration, SystemTime};

use gcwarden_protocol::AccountId;
use serde::{Deserialize, Serialize};

use crate::RegistryError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Bounds for the target registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Maximum number of live targets held at once. Adds beyond this
    /// fail with [`RegistryError::CapacityExceeded`].
    pub max_targets: usize,

    /// Longest TTL (seconds) a single add may request.
    pub max_ttl_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_targets: 10,
            max_ttl_secs: 3600,
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One registered block target.
///
/// `expires_at` is wall-clock time, not a monotonic instant, because the
/// control API reports it to callers as an absolute epoch timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// The account to keep blocked.
    pub account: AccountId,
    /// When this entry stops being dispatched and gets evicted.
    pub expires_at: SystemTime,
}

/// The result of an [`TargetRegistry::add`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddOutcome {
    /// `true` if a new entry was inserted; `false` if the account was
    /// already present (in which case `expires_at` echoes the existing
    /// entry's expiry).
    pub created: bool,
    /// The entry's expiry, new or pre-existing.
    pub expires_at: SystemTime,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A bounded set of block targets with per-entry expiry.
///
/// Entries are kept in insertion order; iteration order is stable but
/// carries no meaning beyond that. At most one entry exists per account.
///
/// Expiry is *lazy*: nothing fires when an entry's deadline passes.
/// Instead every operation starts with an eviction sweep, so no caller,
/// including the dispatch loop, ever observes an expired entry.
#[derive(Debug)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    config: RegistryConfig,
}

impl TargetRegistry {
    /// Creates an empty registry with the given bounds.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            targets: Vec::new(),
            config,
        }
    }

    /// Adds a target with a TTL in seconds.
    ///
    /// Idempotent on conflict: if the account is already registered the
    /// existing entry is left untouched and its expiry is returned with
    /// `created: false`. That is an answer, not an error.
    ///
    /// # Errors
    /// - [`RegistryError::InvalidTtl`] if `ttl_secs` is zero or above the
    ///   configured maximum.
    /// - [`RegistryError::CapacityExceeded`] if the registry is full. The
    ///   capacity check runs before the duplicate lookup, so a full list
    ///   rejects even a re-add of a known account.
    pub fn add(
        &mut self,
        account: AccountId,
        ttl_secs: u64,
    ) -> Result<AddOutcome, RegistryError> {
        self.evict(SystemTime::now());

        if ttl_secs == 0 || ttl_secs > self.config.max_ttl_secs {
            return Err(RegistryError::InvalidTtl {
                given: ttl_secs,
                max: self.config.max_ttl_secs,
            });
        }
        if self.targets.len() >= self.config.max_targets {
            return Err(RegistryError::CapacityExceeded {
                max: self.config.max_targets,
            });
        }

        if let Some(existing) =
            self.targets.iter().find(|t| t.account == account)
        {
            return Ok(AddOutcome {
                created: false,
                expires_at: existing.expires_at,
            });
        }

        let expires_at = SystemTime::now() + Duration::from_secs(ttl_secs);
        self.targets.push(Target {
            account,
            expires_at,
        });

        tracing::info!(%account, ttl_secs, "target added");

        Ok(AddOutcome {
            created: true,
            expires_at,
        })
    }

    /// Removes a target. Returns whether anything was removed. Never fails.
    pub fn remove(&mut self, account: AccountId) -> bool {
        self.evict(SystemTime::now());

        let Some(index) =
            self.targets.iter().position(|t| t.account == account)
        else {
            return false;
        };
        self.targets.remove(index);

        tracing::info!(%account, "target removed");
        true
    }

    /// Returns the live entries, in insertion order, after an eviction
    /// sweep.
    pub fn list(&mut self) -> &[Target] {
        self.evict(SystemTime::now());
        &self.targets
    }

    /// Drops every entry whose expiry is at or before `now`.
    ///
    /// Called implicitly at the start of every other operation and by the
    /// dispatch loop before each cycle; callable directly for tests.
    pub fn evict(&mut self, now: SystemTime) {
        let before = self.targets.len();
        self.targets.retain(|t| t.expires_at > now);
        let evicted = before - self.targets.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.targets.len(), "expired targets evicted");
        }
    }

    /// Number of entries currently held (without an eviction sweep).
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The configured bounds.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(raw: u64) -> AccountId {
        AccountId::from_individual(raw).unwrap()
    }

    fn registry() -> TargetRegistry {
        TargetRegistry::new(RegistryConfig {
            max_targets: 3,
            max_ttl_secs: 600,
        })
    }

    #[test]
    fn test_add_rejects_zero_ttl() {
        let mut r = registry();
        let err = r.add(acct(1), 0).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTtl { given: 0, .. }));
        assert!(r.is_empty());
    }

    #[test]
    fn test_add_rejects_ttl_above_max() {
        let mut r = registry();
        let err = r.add(acct(1), 601).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTtl { given: 601, max: 600 }));
    }

    #[test]
    fn test_add_accepts_max_ttl() {
        let mut r = registry();
        assert!(r.add(acct(1), 600).unwrap().created);
    }

    #[test]
    fn test_capacity_check_runs_before_duplicate_lookup() {
        let mut r = registry();
        for i in 1..=3 {
            r.add(acct(i), 60).unwrap();
        }
        // Even a re-add of a present account is rejected at capacity.
        let err = r.add(acct(1), 60).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityExceeded { max: 3 }));
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_remove_is_infallible() {
        let mut r = registry();
        assert!(!r.remove(acct(9)));
        r.add(acct(9), 60).unwrap();
        assert!(r.remove(acct(9)));
        assert!(!r.remove(acct(9)));
    }

    #[test]
    fn test_evict_drops_deadline_exactly_at_now() {
        let mut r = registry();
        r.add(acct(1), 60).unwrap();
        let expires_at = r.list()[0].expires_at;
        // An entry expiring exactly "now" must already be gone.
        r.evict(expires_at);
        assert!(r.is_empty());
    }
}
