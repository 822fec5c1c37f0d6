//! Error types for the link boundary.

/// Errors surfaced by a coordinator link implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LinkError {
    /// An outbound send failed. Retryable on the next cycle.
    #[error("send failed: {0}")]
    Send(String),

    /// The link is not currently connected or authenticated.
    #[error("link unavailable: {0}")]
    Unavailable(String),

    /// License acquisition was refused. Non-fatal by contract.
    #[error("license request refused: {0}")]
    LicenseRefused(String),

    /// An unrecoverable transport error. The process must terminate;
    /// restart is the recovery mechanism.
    #[error("fatal link error: {0}")]
    Fatal(String),
}
