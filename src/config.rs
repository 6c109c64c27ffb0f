use crate::domain::naming::{
    NamePattern, PatternKind, DEFAULT_BRANCH_PATTERN, DEFAULT_TAG_PATTERN,
};
use crate::error::{ReleaseCutError, Result};
use crate::hooks::HookType;
use crate::version_file::DEFAULT_VERSION_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "releasecut.toml";

/// Represents the complete configuration for release-cut.
///
/// Contains the version file location, ref naming patterns, git behavior and hook scripts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

fn default_version_file() -> PathBuf {
    PathBuf::from(DEFAULT_VERSION_FILE)
}

fn default_branch_pattern() -> String {
    DEFAULT_BRANCH_PATTERN.to_string()
}

fn default_tag_pattern() -> String {
    DEFAULT_TAG_PATTERN.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_message() -> String {
    "Bump unstable version to {version}".to_string()
}

fn default_true() -> bool {
    true
}

/// Naming patterns for release branches and tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamingConfig {
    #[serde(default = "default_branch_pattern")]
    pub branch_pattern: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            branch_pattern: default_branch_pattern(),
            tag_pattern: default_tag_pattern(),
        }
    }
}

/// Git behavior of the cut workflow.
///
/// `commit_message` supports `{version}` (the next unstable version) and `{prefix}`
/// (the release line being cut).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_true")]
    pub push: bool,

    #[serde(default = "default_true")]
    pub commit: bool,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            push: true,
            commit: true,
            commit_message: default_commit_message(),
        }
    }
}

/// Optional collaborator scripts, one per hook point.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    #[serde(default)]
    pub pre_cut: Option<String>,

    #[serde(default)]
    pub post_tag: Option<String>,

    #[serde(default)]
    pub publish_docs: Option<String>,

    #[serde(default)]
    pub post_push: Option<String>,
}

impl HooksConfig {
    /// Script configured for a hook point, if any
    pub fn script_for(&self, hook_type: HookType) -> Option<&str> {
        match hook_type {
            HookType::PreCut => self.pre_cut.as_deref(),
            HookType::PostTag => self.post_tag.as_deref(),
            HookType::PublishDocs => self.publish_docs.as_deref(),
            HookType::PostPush => self.post_push.as_deref(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_file: default_version_file(),
            naming: NamingConfig::default(),
            git: GitConfig::default(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Validated release branch pattern
    pub fn branch_pattern(&self) -> Result<NamePattern> {
        NamePattern::new(PatternKind::Branch, self.naming.branch_pattern.clone())
    }

    /// Validated release tag pattern
    pub fn tag_pattern(&self) -> Result<NamePattern> {
        NamePattern::new(PatternKind::Tag, self.naming.tag_pattern.clone())
    }

    /// Parse configuration from TOML text, validating the naming patterns
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| ReleaseCutError::config(format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
        config.branch_pattern()?;
        config.tag_pattern()?;
        Ok(config)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasecut.toml` in current directory
/// 3. `~/.config/.releasecut.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let source = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if global.exists() {
            global
        } else {
            tracing::debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let contents = fs::read_to_string(&source).map_err(|e| {
        ReleaseCutError::config(format!("Cannot read {}: {}", source.display(), e))
    })?;
    tracing::debug!(path = %source.display(), "loading configuration");
    Config::from_toml(&contents)
}
