use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Search defaults loaded from `~/.config/lsq/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the log-search service (scheme and host; path is ignored).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Fields shown in results when a chain starts from this config.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
    /// Default relative range in minutes (None = no range set).
    #[serde(default)]
    pub default_minutes: Option<i64>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lsq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SearchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SearchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<SearchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SearchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}: {:?}", path.display(), cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_empty() {
        let cfg = SearchConfig::default();
        assert!(cfg.base_url.is_none());
        assert!(cfg.fields.is_none());
        assert!(cfg.default_minutes.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SearchConfig {
            base_url: Some("https://logs.example.com".into()),
            fields: Some(vec!["timestamp".into(), "message".into()]),
            default_minutes: Some(30),
        };
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SearchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial() {
        let toml = r#"
            base_url = "http://graylog.internal:9000"
        "#;
        let cfg: SearchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://graylog.internal:9000"));
        assert!(cfg.fields.is_none());
        assert!(cfg.default_minutes.is_none());
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"
            base_url = "https://logs.example.com"
            fields = ["source", "message"]
            default_minutes = 5
        "#,
        )
        .unwrap();
        f.flush().unwrap();
        let cfg = load_from(f.path()).unwrap();
        assert_eq!(cfg.fields, Some(vec!["source".to_string(), "message".to_string()]));
        assert_eq!(cfg.default_minutes, Some(5));
    }

    #[test]
    fn load_from_invalid_toml_errs() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"base_url = [unterminated").unwrap();
        f.flush().unwrap();
        let err = load_from(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));
    }

    #[test]
    fn load_from_missing_file_errs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from(&dir.path().join("absent.toml")).is_err());
    }
}
