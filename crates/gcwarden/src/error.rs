//! Unified error type for the Gcwarden meta-crate.

use gcwarden_session::SessionError;

/// Top-level error for running the bot.
///
/// Callers of the `gcwarden` meta-crate deal with this single type; the
/// `#[from]` attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// Reading the config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON or misses required fields.
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    /// The session actor ended, either a fatal link error or a panic.
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcwarden_link::LinkError;

    #[test]
    fn test_from_session_error() {
        let err = SessionError::LinkFatal(LinkError::Fatal("gone".into()));
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Session(_)));
        assert!(warden_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no file");
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Io(_)));
    }
}
