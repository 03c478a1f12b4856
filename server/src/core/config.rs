use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::filters::alias::{
    AliasGenerator, FiltersConfig, default_alias_generator, operator_alias_generator,
};
use crate::filters::sorting::DEFAULT_SORT_PARAM;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT};

// =============================================================================
// Alias Style Enum
// =============================================================================

/// Naming style for generated filter parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasStyle {
    /// Django-style lookups: `age__gte`, `name__icontains`
    #[default]
    Lookup,
    /// Operator names: `age__ge`, `name__ilike`
    Operator,
}

impl AliasStyle {
    pub fn generator(&self) -> AliasGenerator {
        match self {
            Self::Lookup => default_alias_generator,
            Self::Operator => operator_alias_generator,
        }
    }
}

impl fmt::Display for AliasStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup => write!(f, "lookup"),
            Self::Operator => write!(f, "operator"),
        }
    }
}

// =============================================================================
// File Config Structs (all optional, for merging)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Filters configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FiltersFileConfig {
    pub alias_style: Option<AliasStyle>,
    pub sort_param: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub filters: Option<FiltersFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Top-level keys not recognized by any section
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(|k| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(filters) = other.filters {
            let current = self.filters.get_or_insert_with(FiltersFileConfig::default);
            if filters.alias_style.is_some() {
                tracing::trace!(alias_style = ?filters.alias_style, "Merging filters.alias_style");
                current.alias_style = filters.alias_style;
            }
            if filters.sort_param.is_some() {
                tracing::trace!(sort_param = ?filters.sort_param, "Merging filters.sort_param");
                current.sort_param = filters.sort_param;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Filter compilation settings
#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub alias_style: AliasStyle,
    pub sort_param: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            alias_style: AliasStyle::default(),
            sort_param: DEFAULT_SORT_PARAM.to_string(),
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub filters: FilterSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            filters: FilterSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.filterkit/filterkit.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::layer(file_config, cli);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            alias_style = %config.filters.alias_style,
            sort_param = %config.filters.sort_param,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn layer(file_config: FileConfig, cli: &CliConfig) -> Self {
        let defaults = Self::default();
        let file_server = file_config.server.unwrap_or_default();
        let file_filters = file_config.filters.unwrap_or_default();

        Self {
            server: ServerConfig {
                host: cli
                    .host
                    .clone()
                    .or(file_server.host)
                    .unwrap_or(defaults.server.host),
                port: cli.port.or(file_server.port).unwrap_or(defaults.server.port),
            },
            filters: FilterSettings {
                alias_style: cli
                    .alias_style
                    .or(file_filters.alias_style)
                    .unwrap_or(defaults.filters.alias_style),
                sort_param: cli
                    .sort_param
                    .clone()
                    .or(file_filters.sort_param)
                    .unwrap_or(defaults.filters.sort_param),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        if self.filters.sort_param.trim().is_empty() {
            anyhow::bail!("filters.sort_param cannot be empty");
        }
        Ok(())
    }

    /// Compiler configuration for the selected alias style
    pub fn filters_config(&self) -> FiltersConfig {
        FiltersConfig::new(self.filters.alias_style.generator())
    }
}

/// Get the profile config path (~/.filterkit/filterkit.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_alias_style_serde() {
        let style: AliasStyle = serde_json::from_str(r#""operator""#).unwrap();
        assert_eq!(style, AliasStyle::Operator);
        assert_eq!(AliasStyle::Lookup.to_string(), "lookup");
    }

    #[test]
    fn test_alias_style_generator() {
        use crate::filters::Operator;

        let lookup = AliasStyle::Lookup.generator();
        let operator = AliasStyle::Operator.generator();
        assert_eq!(lookup("age", Operator::Ge, None), "age__gte");
        assert_eq!(operator("age", Operator::Ge, None), "age__ge");
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "filters": { "alias_style": "operator", "sort_param": "order_by" }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));

        let filters = config.filters.as_ref().unwrap();
        assert_eq!(filters.alias_style, Some(AliasStyle::Operator));
        assert_eq!(filters.sort_param.as_deref(), Some("order_by"));
        assert!(config.unknown_fields().is_empty());
    }

    #[test]
    fn test_file_config_unknown_fields() {
        let json = r#"{ "server": { "port": 9000 }, "serverr": {}, "debug": true }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let mut unknown = config.unknown_fields();
        unknown.sort();
        assert_eq!(unknown, vec!["debug", "serverr"]);
    }

    #[test]
    fn test_merge_other_takes_precedence() {
        let mut base: FileConfig =
            serde_json::from_str(r#"{ "server": { "host": "0.0.0.0", "port": 8080 } }"#).unwrap();
        let overlay: FileConfig = serde_json::from_str(
            r#"{ "server": { "port": 9000 }, "filters": { "sort_param": "order" } }"#,
        )
        .unwrap();
        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(9000));
        assert_eq!(
            base.filters.as_ref().unwrap().sort_param.as_deref(),
            Some("order")
        );
    }

    #[test]
    fn test_layer_defaults() {
        let config = AppConfig::layer(FileConfig::default(), &CliConfig::default());
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.filters.alias_style, AliasStyle::Lookup);
        assert_eq!(config.filters.sort_param, "sort");
    }

    #[test]
    fn test_layer_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "server": { "port": 8080 }, "filters": { "alias_style": "operator" } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(9999),
            ..Default::default()
        };

        let config = AppConfig::layer(file, &cli);
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.filters.alias_style, AliasStyle::Operator);
    }

    #[test]
    fn test_load_explicit_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "filters": {{ "alias_style": "operator", "sort_param": "order_by" }} }}"#
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_path_buf()),
            port: Some(7000),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.filters.sort_param, "order_by");
        assert_eq!(
            config.filters_config().alias("age", crate::filters::Operator::Ge, None),
            "age__ge"
        );
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/filterkit.json")),
            ..Default::default()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_validate_rejects_empty_sort_param() {
        let config = AppConfig {
            filters: FilterSettings {
                sort_param: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home(Path::new("/etc/filterkit.json")),
            PathBuf::from("/etc/filterkit.json")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_home(Path::new("~/filterkit.json")),
                home.join("filterkit.json")
            );
        }
    }
}
