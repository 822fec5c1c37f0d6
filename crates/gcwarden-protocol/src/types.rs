//! Identity and tag newtypes shared across the workspace.
//!
//! Everything the coordinator addresses is ultimately a number: accounts,
//! applications, message tags. Wrapping each in a newtype keeps them from
//! being mixed up in signatures: you cannot hand an [`AppId`] to something
//! expecting an [`AccountId`], even though both are integers underneath.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// The 32-bit account number of an *individual* account on the remote
/// service.
///
/// Group, clan, and service accounts live in other ranges of the full
/// 64-bit identity space; this type only ever holds the low account number
/// of an individual, which is what the coordinator's matchmaking messages
/// carry. Construct one through [`AccountId::from_individual`] (or
/// `FromStr`), which enforces the valid range.
///
/// `#[serde(transparent)]` serializes this as the bare number, so an
/// `AccountId(42)` is `42` on the wire, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u32);

impl AccountId {
    /// Validates a raw number as an individual account identity.
    ///
    /// Valid individual account numbers are non-zero and fit in 32 bits.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidAccount`] if `raw` is zero or
    /// exceeds the individual account range.
    pub fn from_individual(raw: u64) -> Result<Self, ProtocolError> {
        if raw == 0 || raw > u64::from(u32::MAX) {
            return Err(ProtocolError::InvalidAccount(raw));
        }
        Ok(Self(raw as u32))
    }

    /// Returns the raw account number.
    pub fn into_inner(self) -> u32 {
        self.0
    }
}

impl FromStr for AccountId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .parse()
            .map_err(|_| ProtocolError::InvalidAccount(0))?;
        Self::from_individual(raw)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AppId
// ---------------------------------------------------------------------------

/// Identifies an application on the remote service.
///
/// Every coordinator message is addressed to exactly one application;
/// messages for foreign applications are dropped at the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub u32);

impl AppId {
    /// The application this bot ships against by default.
    pub const DEFAULT: AppId = AppId(730);
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// MsgType
// ---------------------------------------------------------------------------

/// The numeric tag identifying a coordinator message's payload type.
///
/// Tags are stable protocol constants (see the `MSG_*` consts in the
/// crate root); the payload bytes behind a tag decode to the matching
/// typed struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgType(pub u32);

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_rejects_zero() {
        assert!(AccountId::from_individual(0).is_err());
    }

    #[test]
    fn test_account_id_rejects_out_of_range() {
        assert!(AccountId::from_individual(u64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_account_id_accepts_valid_range() {
        let id = AccountId::from_individual(111_111_111).unwrap();
        assert_eq!(id.into_inner(), 111_111_111);
        let max = AccountId::from_individual(u64::from(u32::MAX)).unwrap();
        assert_eq!(max.into_inner(), u32::MAX);
    }

    #[test]
    fn test_account_id_from_str() {
        let id: AccountId = "4242".parse().unwrap();
        assert_eq!(id.into_inner(), 4242);
        assert!("".parse::<AccountId>().is_err());
        assert!("abc".parse::<AccountId>().is_err());
        assert!("-5".parse::<AccountId>().is_err());
        assert!("0".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(AccountId::from_individual(7).unwrap().to_string(), "acct-7");
        assert_eq!(AppId(730).to_string(), "app-730");
        assert_eq!(MsgType(4006).to_string(), "msg-4006");
    }
}
