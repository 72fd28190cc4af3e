//! Stop-area identifier type.

use std::fmt;

/// Error returned when parsing an invalid stop-area id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop area id: {reason}")]
pub struct InvalidStopAreaId {
    reason: &'static str,
}

/// A validated Navitia stop-area identifier.
///
/// Navitia identifies stations by opaque ids such as
/// `stop_area:SNCF:87686006`. This type guarantees that any `StopAreaId`
/// carries the `stop_area:` prefix and contains no whitespace, so it can be
/// passed straight through as a query parameter.
///
/// # Examples
///
/// ```
/// use journey_monitor::domain::StopAreaId;
///
/// let id = StopAreaId::parse("stop_area:SNCF:87686006").unwrap();
/// assert_eq!(id.as_str(), "stop_area:SNCF:87686006");
///
/// // Bare UIC codes get the standard prefix
/// let id = StopAreaId::from_uic("87686006").unwrap();
/// assert_eq!(id.as_str(), "stop_area:SNCF:87686006");
///
/// // Missing prefix is rejected
/// assert!(StopAreaId::parse("87686006").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StopAreaId(String);

impl StopAreaId {
    /// Parse a full stop-area id.
    ///
    /// The input must start with `stop_area:`, be longer than the bare
    /// prefix, and contain no whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStopAreaId> {
        const PREFIX: &str = "stop_area:";

        if !s.starts_with(PREFIX) {
            return Err(InvalidStopAreaId {
                reason: "must start with 'stop_area:'",
            });
        }
        if s.len() == PREFIX.len() {
            return Err(InvalidStopAreaId {
                reason: "missing id after prefix",
            });
        }
        if s.chars().any(|c| c.is_whitespace()) {
            return Err(InvalidStopAreaId {
                reason: "must not contain whitespace",
            });
        }

        Ok(StopAreaId(s.to_string()))
    }

    /// Build a stop-area id from a bare UIC station code.
    ///
    /// UIC codes are numeric; anything else is rejected.
    pub fn from_uic(code: &str) -> Result<Self, InvalidStopAreaId> {
        if code.is_empty() {
            return Err(InvalidStopAreaId {
                reason: "empty UIC code",
            });
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStopAreaId {
                reason: "UIC code must be numeric",
            });
        }

        Ok(StopAreaId(format!("stop_area:SNCF:{code}")))
    }

    /// Returns the full id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopAreaId({})", self.0)
    }
}

impl fmt::Display for StopAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
