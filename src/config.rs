//! Application configuration, stored as TOML.
//!
//! Every field has a default, so an empty or partial file is valid. With no
//! `[[sources]]` entries the four public HED documentation sites are used.

use std::path::{Path, PathBuf};

use hed_search::{SearchConfig, SearchOptions, SearchSource};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ranking and preview options.
    pub options: SearchOptions,
    /// Index fetch settings.
    pub http: HttpConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Documentation sources, in presentation order.
    pub sources: Vec<SearchSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            options: SearchOptions::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            sources: hed_sources(),
        }
    }
}

/// Index fetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            timeout_seconds: search.timeout_seconds,
            user_agent: search.user_agent,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

/// Default log filter: application info, search core warnings only.
pub const DEFAULT_LOG_FILTER: &str = "hed_docs=info,hed_search=warn";

/// Log filter enabling the search core's per-query diagnostics.
pub const DEBUG_LOG_FILTER: &str = "hed_docs=debug,hed_search=debug";

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load from `path` if given, else from [`AppConfig::default_config_path`]
    /// if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed. An
    /// explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/hed-docs/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("hed-docs")
            .join("config.toml")
    }

    /// The search core configuration described by this file.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            sources: self.sources.clone(),
            options: self.options.clone(),
            timeout_seconds: self.http.timeout_seconds,
            user_agent: self.http.user_agent.clone(),
        }
    }

    /// Log filter to use when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &str {
        match &self.logging.filter {
            Some(filter) => filter.as_str(),
            None if self.options.enable_debug_log => DEBUG_LOG_FILTER,
            None => DEFAULT_LOG_FILTER,
        }
    }
}

/// The public HED documentation sites, highest priority first.
pub fn hed_sources() -> Vec<SearchSource> {
    let source = |name: &str, slug: &str, description: &str, priority: i32, color: &str| {
        let url = format!("https://www.hedtags.org/{slug}");
        SearchSource {
            name: name.to_owned(),
            search_index: format!("{url}/searchindex.js"),
            url,
            description: description.to_owned(),
            priority,
            color: color.to_owned(),
            exclude: Vec::new(),
        }
    };

    let mut resources = source(
        "HED resources",
        "hed-resources",
        "HED tutorials, guides, and documentation",
        1,
        "#0dcaf0",
    );
    // Redirect shims and the INCF submission page.
    resources.exclude = [
        "HedRemodelingQuickstart.html",
        "HedRemodelingTools.html",
        "HedPythonTools.html",
        "HedAnnotationInNWB.html",
        "HedOnlineTools.html",
        "HedJavascriptTools.html",
        "HEDSubmissionToINCF.html",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    vec![
        resources,
        source(
            "HED Python Tools",
            "hed-python",
            "Python library for HED validation and analysis",
            2,
            "#6610f2",
        ),
        source(
            "HED Specification",
            "hed-specification",
            "Official HED specification and standards",
            3,
            "#198754",
        ),
        source(
            "HED Web Tools",
            "hed-web",
            "Web-based HED tools and REST API",
            4,
            "#0d6efd",
        ),
    ]
}
