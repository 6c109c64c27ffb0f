//! Version transition calculator.
//!
//! Pure derivation of everything a minor release cut needs from the current
//! version of record. The string-level functions take and return the raw text
//! that flows to collaborators; [`ReleasePlan`] bundles the typed results.

use crate::domain::naming::NamePattern;
use crate::domain::version::{ReleasePrefix, Version};
use crate::error::Result;
use serde::Serialize;

/// `"2.3.0"` -> `"2.3"`
pub fn compute_release_prefix(version: &str) -> Result<String> {
    Ok(Version::parse(version)?.release_prefix().to_string())
}

/// `"2.3.0"` -> `"2.4.0"`; applying it twice moves two minors ahead
pub fn compute_next_unstable_version(version: &str) -> Result<String> {
    Ok(Version::parse(version)?.next_unstable()?.to_string())
}

/// `"2.3"` -> `"v2.3.x"`
pub fn compute_release_branch_name(prefix: &str) -> Result<String> {
    let prefix = ReleasePrefix::parse(prefix)?;
    Ok(NamePattern::default_branch().branch_name(&prefix))
}

/// `"2.3.0"` -> `"v2.3.0"`
pub fn compute_release_tag(version: &str) -> Result<String> {
    let version = Version::parse(version)?;
    Ok(NamePattern::default_tag().tag_name(&version))
}

/// Every identifier needed to cut one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    pub version: Version,
    pub release_prefix: ReleasePrefix,
    pub release_branch: String,
    pub release_tag: String,
    pub next_version: Version,
}

impl ReleasePlan {
    /// Plan with the default `v{prefix}.x` / `v{version}` naming
    pub fn new(version: Version) -> Result<Self> {
        Self::with_patterns(
            version,
            &NamePattern::default_branch(),
            &NamePattern::default_tag(),
        )
    }

    pub fn with_patterns(
        version: Version,
        branch_pattern: &NamePattern,
        tag_pattern: &NamePattern,
    ) -> Result<Self> {
        let release_prefix = version.release_prefix();
        let next_version = version.next_unstable()?;

        Ok(ReleasePlan {
            version,
            release_prefix,
            release_branch: branch_pattern.branch_name(&release_prefix),
            release_tag: tag_pattern.tag_name(&version),
            next_version,
        })
    }

    /// `KEY=value` lines for a CI step output file
    pub fn to_env_lines(&self) -> Vec<String> {
        vec![
            format!("version={}", self.version),
            format!("release_prefix={}", self.release_prefix),
            format!("release_branch={}", self.release_branch),
            format!("release_tag={}", self.release_tag),
            format!("next_version={}", self.next_version),
        ]
    }
}
