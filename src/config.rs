use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CommitBumpError, Result};
use crate::manifest::DEFAULT_VERSION_KEY;

/// Configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "commitbump.toml";

/// Represents the complete configuration for commit-bump.
///
/// Contains the manifest location, the bump commit settings, push settings and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub push: PushConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("pubspec.yaml")
}

fn default_version_key() -> String {
    DEFAULT_VERSION_KEY.to_string()
}

/// Where the version declaration lives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,

    #[serde(default = "default_version_key")]
    pub key: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
            key: default_version_key(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_commit_message() -> String {
    "chore: bump version to {version} [skip ci]".to_string()
}

fn default_author_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_author_email() -> String {
    "41898282+github-actions[bot]@users.noreply.github.com".to_string()
}

/// Settings for the commit that records the new version.
///
/// `message` supports the `{version}` and `{previous}` placeholders.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_commit_message")]
    pub message: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            enabled: true,
            message: default_commit_message(),
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

impl CommitConfig {
    /// Renders the bump commit message for a version change
    pub fn render_message(&self, previous: &str, version: &str) -> String {
        self.message
            .replace("{previous}", previous)
            .replace("{version}", version)
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Settings for pushing the bump commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch to push; the current branch when unset
    #[serde(default)]
    pub branch: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        PushConfig {
            enabled: false,
            remote: default_remote(),
            branch: None,
        }
    }
}

fn default_skip_markers() -> Vec<String> {
    vec![
        "[skip ci]".to_string(),
        "[ci skip]".to_string(),
        "[no ci]".to_string(),
    ]
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Commits carrying any of these markers never trigger a bump
    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            skip_markers: default_skip_markers(),
        }
    }
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    ///
    /// The bump commit message must carry one of the skip markers, otherwise the
    /// bump commit would trigger the pipeline that produced it.
    pub fn validate(&self) -> Result<()> {
        if self.manifest.key.trim().is_empty() {
            return Err(CommitBumpError::config("manifest.key must not be empty"));
        }

        if self.commit.enabled {
            let message = self.commit.message.to_lowercase();
            let marked = self
                .behavior
                .skip_markers
                .iter()
                .filter(|m| !m.trim().is_empty())
                .any(|m| message.contains(&m.to_lowercase()));
            if !marked {
                return Err(CommitBumpError::config(format!(
                    "commit.message '{}' must contain one of the skip markers {:?}",
                    self.commit.message, self.behavior.skip_markers
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `commitbump.toml` in current directory
/// 3. `.commitbump.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        Some(path.to_path_buf())
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Some(PathBuf::from(CONFIG_FILE_NAME))
    } else {
        dirs::config_dir()
            .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
            .filter(|p| p.exists())
    };

    let Some(path) = path else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path)?;
    parse_config(&config_str)
        .map_err(|e| CommitBumpError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| CommitBumpError::config(e.to_string()))
}
