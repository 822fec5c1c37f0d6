//! Error types for the registry layer.

/// Errors that can occur when mutating the target registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The requested TTL is outside the accepted range.
    ///
    /// Valid TTLs are between 1 and `max_ttl_secs` seconds inclusive.
    #[error("ttl of {given}s is invalid, it must be between 1 and {max}s inclusive")]
    InvalidTtl { given: u64, max: u64 },

    /// The registry already holds the configured maximum of live targets.
    ///
    /// The caller must wait for entries to expire or remove some first.
    #[error("too many targets are on the list, maximum {max}")]
    CapacityExceeded { max: usize },
}
