//! Integration tests for the target registry: expiry math, idempotent
//! adds, lazy eviction, and capacity behavior.

use std::time::{Duration, SystemTime};

use gcwarden_protocol::AccountId;
use gcwarden_registry::{RegistryConfig, RegistryError, TargetRegistry};

// =========================================================================
// Helpers
// =========================================================================

fn acct(raw: u64) -> AccountId {
    AccountId::from_individual(raw).unwrap()
}

fn registry(max_targets: usize) -> TargetRegistry {
    TargetRegistry::new(RegistryConfig {
        max_targets,
        max_ttl_secs: 3600,
    })
}

/// Scheduling tolerance for expiry math against the real clock.
const TOLERANCE: Duration = Duration::from_secs(2);

// =========================================================================
// Add + list
// =========================================================================

#[test]
fn test_add_then_list_shows_one_entry_with_expected_expiry() {
    let mut r = registry(10);
    let before = SystemTime::now();

    let outcome = r.add(acct(111_111_111), 60).unwrap();
    assert!(outcome.created);

    let entries = r.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].account, acct(111_111_111));

    let expected = before + Duration::from_secs(60);
    let drift = entries[0]
        .expires_at
        .duration_since(expected)
        .unwrap_or_else(|e| e.duration());
    assert!(drift < TOLERANCE, "expiry drifted by {drift:?}");
}

#[test]
fn test_readd_is_idempotent_and_echoes_original_expiry() {
    let mut r = registry(10);
    let first = r.add(acct(111_111_111), 60).unwrap();

    // Second add with a different length: no-op, original expiry returned.
    let second = r.add(acct(111_111_111), 500).unwrap();
    assert!(!second.created);
    assert_eq!(second.expires_at, first.expires_at);
    assert_eq!(r.len(), 1);
}

#[test]
fn test_entries_are_listed_in_insertion_order() {
    let mut r = registry(10);
    for raw in [5u64, 3, 9, 1] {
        r.add(acct(raw), 60).unwrap();
    }
    let order: Vec<_> = r.list().iter().map(|t| t.account).collect();
    assert_eq!(order, vec![acct(5), acct(3), acct(9), acct(1)]);
}

// =========================================================================
// Eviction
// =========================================================================

#[test]
fn test_expired_entry_is_absent_from_subsequent_lists() {
    let mut r = registry(10);
    r.add(acct(1), 60).unwrap();
    r.add(acct(2), 120).unwrap();

    // Push the clock past the first entry's deadline.
    let now = SystemTime::now() + Duration::from_secs(61);
    r.evict(now);

    let remaining: Vec<_> = r.list().iter().map(|t| t.account).collect();
    assert_eq!(remaining, vec![acct(2)]);
}

#[test]
fn test_eviction_frees_capacity_for_new_adds() {
    let mut r = registry(1);
    r.add(acct(1), 30).unwrap();
    assert!(matches!(
        r.add(acct(2), 30),
        Err(RegistryError::CapacityExceeded { .. })
    ));

    r.evict(SystemTime::now() + Duration::from_secs(31));
    assert!(r.add(acct(2), 30).unwrap().created);
}

// =========================================================================
// Capacity and validation
// =========================================================================

#[test]
fn test_add_beyond_capacity_fails_without_mutation() {
    let mut r = registry(10);
    for raw in 1..=10u64 {
        r.add(acct(raw), 60).unwrap();
    }

    let err = r.add(acct(999), 60).unwrap_err();
    assert!(matches!(err, RegistryError::CapacityExceeded { max: 10 }));
    assert_eq!(r.len(), 10);
    assert!(r.list().iter().all(|t| t.account != acct(999)));
}

#[test]
fn test_zero_ttl_is_invalid_input() {
    let mut r = registry(10);
    let err = r.add(acct(1), 0).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidTtl { .. }));
    assert!(r.is_empty());
}

#[test]
fn test_remove_never_added_returns_false() {
    let mut r = registry(10);
    assert!(!r.remove(acct(424242)));
}
