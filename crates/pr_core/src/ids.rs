//! crates/pr_core/src/ids.rs
//! Party identifiers. Free-form labels chosen by the caller, with a small set of
//! shape rules and one reserved token for the disputed-seat sink.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reserved id under which disputed seats are reported.
pub const DISPUTED_PARTY_ID: &str = "DISPUTED";

const MAX_ID_LEN: usize = 256;

/// Errors returned when validating or parsing party ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    ControlChar,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => write!(f, "party id is empty"),
            IdError::TooLong => write!(f, "party id longer than {MAX_ID_LEN} bytes"),
            IdError::ControlChar => write!(f, "party id contains control characters"),
        }
    }
}

impl std::error::Error for IdError {}

#[inline]
fn check_shape(s: &str) -> Result<(), IdError> {
    if s.trim().is_empty() {
        return Err(IdError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    if s.chars().any(char::is_control) {
        return Err(IdError::ControlChar);
    }
    Ok(())
}

/// Party token as supplied by the caller (`partyId` on the wire).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PartyId(String);

impl PartyId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The sink id that absorbs seats under the `disputed` tie-break rule.
    #[inline]
    pub fn disputed() -> Self {
        PartyId(DISPUTED_PARTY_ID.to_owned())
    }

    #[inline]
    pub fn is_disputed(&self) -> bool {
        self.0 == DISPUTED_PARTY_ID
    }
}

impl fmt::Display for PartyId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for PartyId {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_shape(s)?;
        Ok(PartyId(s.to_owned()))
    }
}

impl TryFrom<&str> for PartyId {
    type Error = IdError;
    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PartyId {
    type Error = IdError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        check_shape(&value)?;
        Ok(PartyId(value))
    }
}

impl From<PartyId> for String {
    #[inline]
    fn from(id: PartyId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_free_form_labels() {
        let id: PartyId = "Social Democrats".parse().unwrap();
        assert_eq!(id.as_str(), "Social Democrats");
        assert!(!id.is_disputed());
    }

    #[test]
    fn display_honours_width() {
        let id: PartyId = "A".parse().unwrap();
        assert_eq!(format!("[{id:<4}]"), "[A   ]");
        assert_eq!(format!("[{id:>3}]"), "[  A]");
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!("".parse::<PartyId>(), Err(IdError::Empty));
        assert_eq!("   ".parse::<PartyId>(), Err(IdError::Empty));
        assert_eq!("a\nb".parse::<PartyId>(), Err(IdError::ControlChar));
        let long = "x".repeat(MAX_ID_LEN + 1);
        assert_eq!(long.parse::<PartyId>(), Err(IdError::TooLong));
    }

    #[test]
    fn disputed_sink_id_is_stable() {
        assert_eq!(PartyId::disputed().as_str(), "DISPUTED");
        assert!(PartyId::disputed().is_disputed());
    }
}
