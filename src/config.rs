use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://api.datamuse.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Results listed directly in the menu before the "more" entry.
    #[serde(default = "default_editor_menu_max_results")]
    pub editor_menu_max_results: usize,

    /// Results printed by non-interactive listings.
    #[serde(default = "default_suggestions_max_results")]
    pub suggestions_max_results: usize,

    #[serde(default = "default_strict_antonyms")]
    pub strict_antonyms: bool,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_editor_menu_max_results() -> usize {
    15
}

fn default_suggestions_max_results() -> usize {
    10
}

fn default_strict_antonyms() -> bool {
    true
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor_menu_max_results: default_editor_menu_max_results(),
            suggestions_max_results: default_suggestions_max_results(),
            strict_antonyms: default_strict_antonyms(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// One configuration layer. A field left out of the file (or not given on
/// the command line) is `None` and keeps the value from the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Overrides {
    pub editor_menu_max_results: Option<usize>,
    pub suggestions_max_results: Option<usize>,
    pub strict_antonyms: Option<bool>,
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let global_path = Self::global_config_path();
        Self::load_from(global_path.as_deref(), Path::new(".wordswap.toml"), overrides)
    }

    fn load_from(
        global_path: Option<&Path>,
        local_path: &Path,
        overrides: Overrides,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                config = config.apply(Overrides::from_file(global_path)?);
            }
        }

        if local_path.exists() {
            config = config.apply(Overrides::from_file(local_path)?);
        }

        Ok(config.apply(overrides))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::default().apply(Overrides::from_file(path)?))
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(max) = overrides.editor_menu_max_results {
            self.editor_menu_max_results = max;
        }
        if let Some(max) = overrides.suggestions_max_results {
            self.suggestions_max_results = max;
        }
        if let Some(strict) = overrides.strict_antonyms {
            self.strict_antonyms = strict;
        }
        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wordswap").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
