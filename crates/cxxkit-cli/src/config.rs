//! Tool configuration.
//!
//! An optional `cxxkit.toml` at the project root can override discovery and
//! tool settings; a missing file means the built-in defaults. Command-line
//! flags always win over file values.
//!
//! ```toml
//! jobs = 8
//!
//! [discovery]
//! exclude_dirs = ["build", "vcpkg_installed", ".cache", ".git", "third_party"]
//!
//! [tools]
//! clang_format = "clang-format-19"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "cxxkit.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KitConfig {
    /// Fixed parallelism for build/lint; absent means detected core count.
    pub jobs: Option<usize>,
    pub discovery: DiscoveryConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Extension suffixes formatted by `cxxkit format` (headers + sources).
    pub extensions: Vec<String>,
    /// Extension suffixes linted by `cxxkit lint` (sources only).
    pub source_extensions: Vec<String>,
    /// Directory names pruned from every walk.
    pub exclude_dirs: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: [".h", ".hpp", ".cc", ".cpp", ".cxx"]
                .map(String::from)
                .to_vec(),
            source_extensions: [".cc", ".cpp", ".cxx"].map(String::from).to_vec(),
            exclude_dirs: ["build", "vcpkg_installed", ".cache", ".git"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub cmake: String,
    pub clang_format: String,
    pub clang_tidy: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cmake: "cmake".to_string(),
            clang_format: "clang-format".to_string(),
            clang_tidy: "clang-tidy".to_string(),
        }
    }
}

impl KitConfig {
    /// Load `cxxkit.toml` from the project root, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// The jobs count to use when no `--jobs` flag was given.
    pub fn default_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(detected_parallelism)
    }
}

/// Detected core count, falling back to 4 when detection fails.
pub fn detected_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
