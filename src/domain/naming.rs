use crate::domain::version::{ReleasePrefix, Version};
use crate::error::{ReleaseCutError, Result};
use regex::Regex;

pub const PREFIX_PLACEHOLDER: &str = "{prefix}";
pub const VERSION_PLACEHOLDER: &str = "{version}";

pub const DEFAULT_BRANCH_PATTERN: &str = "v{prefix}.x";
pub const DEFAULT_TAG_PATTERN: &str = "v{version}";

/// Which placeholder a pattern is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Release branches, keyed by `{prefix}`
    Branch,
    /// Release tags, keyed by `{version}`
    Tag,
}

impl PatternKind {
    fn placeholder(&self) -> &'static str {
        match self {
            PatternKind::Branch => PREFIX_PLACEHOLDER,
            PatternKind::Tag => VERSION_PLACEHOLDER,
        }
    }

    fn capture(&self) -> &'static str {
        match self {
            PatternKind::Branch => r"(\d+\.\d+)",
            PatternKind::Tag => r"(\d+\.\d+\.\d+)",
        }
    }
}

/// Ref naming pattern (e.g. "v{prefix}.x", "release-{version}")
#[derive(Debug, Clone)]
pub struct NamePattern {
    kind: PatternKind,
    pattern: String,
    matcher: Regex,
}

impl NamePattern {
    /// Create a validated pattern. The kind's placeholder must appear exactly once.
    pub fn new(kind: PatternKind, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let placeholder = kind.placeholder();

        if pattern.matches(placeholder).count() != 1 {
            return Err(ReleaseCutError::config(format!(
                "Pattern '{}' must contain the {} placeholder exactly once",
                pattern, placeholder
            )));
        }

        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(&regex::escape(placeholder), kind.capture());
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| ReleaseCutError::config(format!("Invalid pattern '{}': {}", pattern, e)))?;

        Ok(NamePattern {
            kind,
            pattern,
            matcher,
        })
    }

    pub fn default_branch() -> Self {
        Self::new(PatternKind::Branch, DEFAULT_BRANCH_PATTERN)
            .expect("default branch pattern is valid")
    }

    pub fn default_tag() -> Self {
        Self::new(PatternKind::Tag, DEFAULT_TAG_PATTERN).expect("default tag pattern is valid")
    }

    /// Substitute the placeholder with a raw value
    pub fn format(&self, value: &str) -> String {
        self.pattern.replace(self.kind.placeholder(), value)
    }

    /// Release branch name for a prefix
    pub fn branch_name(&self, prefix: &ReleasePrefix) -> String {
        self.format(&prefix.to_string())
    }

    /// Release tag name for a version
    pub fn tag_name(&self, version: &Version) -> String {
        self.format(&version.to_string())
    }

    /// Whether an existing ref name was produced by this pattern
    pub fn matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }

    /// The prefix or version substituted into a matching ref name
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.matcher
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_branch_pattern() {
        let pattern = NamePattern::default_branch();
        assert_eq!(pattern.branch_name(&ReleasePrefix::new(2, 3)), "v2.3.x");
    }

    #[test]
    fn test_default_tag_pattern() {
        let pattern = NamePattern::default_tag();
        assert_eq!(pattern.tag_name(&Version::new(2, 3, 0)), "v2.3.0");
    }

    #[test]
    fn test_custom_patterns() {
        let branch = NamePattern::new(PatternKind::Branch, "release/{prefix}").unwrap();
        assert_eq!(branch.branch_name(&ReleasePrefix::new(1, 9)), "release/1.9");

        let tag = NamePattern::new(PatternKind::Tag, "release-{version}").unwrap();
        assert_eq!(tag.tag_name(&Version::new(1, 9, 0)), "release-1.9.0");
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(NamePattern::new(PatternKind::Branch, "v{version}.x").is_err());
        assert!(NamePattern::new(PatternKind::Tag, "latest").is_err());
        assert!(NamePattern::new(PatternKind::Tag, "{version}-{version}").is_err());
    }

    #[test]
    fn test_pattern_matches() {
        let branch = NamePattern::default_branch();
        assert!(branch.matches("v2.3.x"));
        assert!(!branch.matches("v2.3.0"));
        assert!(!branch.matches("v2.3.x-old"));
        assert!(!branch.matches("main"));

        let tag = NamePattern::default_tag();
        assert!(tag.matches("v2.3.0"));
        assert!(!tag.matches("v2.3.x"));
        assert!(!tag.matches("v2.3.0-rc1"));
    }

    #[test]
    fn test_pattern_extract() {
        let branch = NamePattern::default_branch();
        assert_eq!(branch.extract("v12.4.x"), Some("12.4"));
        assert_eq!(branch.extract("feature/x"), None);

        let tag = NamePattern::default_tag();
        assert_eq!(tag.extract("v1.2.3"), Some("1.2.3"));
    }

    #[test]
    fn test_pattern_escapes_regex_metacharacters() {
        let branch = NamePattern::new(PatternKind::Branch, "rel+{prefix}.x").unwrap();
        assert!(branch.matches("rel+2.3.x"));
        assert!(!branch.matches("rell2.3.x"));
        assert!(!branch.matches("rel+2.3Ax"));
    }
}
