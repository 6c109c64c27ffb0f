use crate::error::{ReleaseCutError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Version of record, always exactly `MAJOR.MINOR.PATCH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// The `MAJOR.MINOR` line a release branch is named after
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleasePrefix {
    pub major: u64,
    pub minor: u64,
}

/// Parse one dotted component. Digits only, no sign and no leading zeros.
fn parse_component(input: &str, name: &str, raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Err(ReleaseCutError::malformed(
            input,
            format!("{} component is empty", name),
        ));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseCutError::malformed(
            input,
            format!("{} component '{}' is not a non-negative integer", name, raw),
        ));
    }
    if raw.len() > 1 && raw.starts_with('0') {
        let canonical = match raw.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        };
        return Err(ReleaseCutError::malformed(
            input,
            format!(
                "{} component '{}' has a leading zero, which is not allowed (write '{}')",
                name, raw, canonical
            ),
        ));
    }
    raw.parse::<u64>().map_err(|_| {
        ReleaseCutError::malformed(input, format!("{} component '{}' is too large", name, raw))
    })
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string such as `"2.3.0"`.
    ///
    /// Surrounding whitespace is ignored so the raw contents of a version
    /// file can be passed straight in. Anything other than three dot-separated
    /// non-negative integers is a [`ReleaseCutError::MalformedVersion`].
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseCutError::malformed(
                trimmed,
                format!("expected MAJOR.MINOR.PATCH, found {} component(s)", parts.len()),
            ));
        }

        Ok(Version {
            major: parse_component(trimmed, "major", parts[0])?,
            minor: parse_component(trimmed, "minor", parts[1])?,
            patch: parse_component(trimmed, "patch", parts[2])?,
        })
    }

    /// The `MAJOR.MINOR` prefix used for release branches and docs
    pub fn release_prefix(&self) -> ReleasePrefix {
        ReleasePrefix {
            major: self.major,
            minor: self.minor,
        }
    }

    /// Next unstable version: minor + 1, major and patch carried through as-is.
    ///
    /// The patch component is deliberately not reset, so `2.3.5` becomes
    /// `2.4.5`.
    pub fn next_unstable(&self) -> Result<Self> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            ReleaseCutError::malformed(self.to_string(), "minor component would overflow")
        })?;

        Ok(Version {
            major: self.major,
            minor,
            patch: self.patch,
        })
    }
}

impl FromStr for Version {
    type Err = ReleaseCutError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl ReleasePrefix {
    pub fn new(major: u64, minor: u64) -> Self {
        ReleasePrefix { major, minor }
    }

    /// Parse a `MAJOR.MINOR` prefix such as `"2.3"`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 2 {
            return Err(ReleaseCutError::malformed(
                trimmed,
                format!("expected MAJOR.MINOR, found {} component(s)", parts.len()),
            ));
        }

        Ok(ReleasePrefix {
            major: parse_component(trimmed, "major", parts[0])?,
            minor: parse_component(trimmed, "minor", parts[1])?,
        })
    }
}

impl FromStr for ReleasePrefix {
    type Err = ReleaseCutError;

    fn from_str(s: &str) -> Result<Self> {
        ReleasePrefix::parse(s)
    }
}

impl fmt::Display for ReleasePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Serialize for ReleasePrefix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
