//! # Generator Configuration
//!
//! Resolves the effective configuration of a run from three layers, highest
//! precedence first:
//!
//! 1. command-line flags,
//! 2. the YAML file named by the global `--config` flag,
//! 3. built-in defaults (`tests/Feature`, independent cases, no filter,
//!    PHPUnit output, `\App\Models\User`, `Tests\Feature`).
//!
//! ```yaml
//! output_dir: tests/Feature/Api
//! sync: true
//! filter: /api
//! format: phpunit
//! auth_user_model: \App\Models\Admin
//! namespace: Tests\Feature
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use routegen_emit::{EmitConfig, OutputFormat};

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub output_dir: Option<PathBuf>,
    pub sync: Option<bool>,
    pub filter: Option<String>,
    pub format: Option<OutputFormat>,
    pub auth_user_model: Option<String>,
    pub namespace: Option<String>,
}

impl ConfigFile {
    /// Read and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("parsing config file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` if given, else an empty configuration.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map(Self::load).transpose().map(Option::unwrap_or_default)
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    /// `--sync` can only switch sequential mode on.
    pub sync: bool,
    pub filter: Option<String>,
    pub format: Option<OutputFormat>,
}

/// Effective configuration of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub emit: EmitConfig,
    /// Literal URI prefix filter.
    pub filter: Option<String>,
}

impl GeneratorConfig {
    /// Layer command-line overrides over a config file over defaults.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Self {
        let defaults = EmitConfig::default();
        let emit = EmitConfig {
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            sequential: overrides.sync || file.sync.unwrap_or(defaults.sequential),
            format: overrides.format.or(file.format).unwrap_or(defaults.format),
            namespace: file.namespace.unwrap_or(defaults.namespace),
            auth_user_model: file.auth_user_model.unwrap_or(defaults.auth_user_model),
        };
        let filter = overrides
            .filter
            .or(file.filter)
            .filter(|f| !f.is_empty());
        Self { emit, filter }
    }
}
