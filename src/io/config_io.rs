use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::model::{AppConfig, Category};

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config: {0}")]
    DocumentError(#[from] toml_edit::TomlError),
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("no config directory on this platform")]
    NoConfigDir,
}

/// `<config dir>/timebar/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join("timebar").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file gives
/// defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    if !path.exists() {
        return Ok((AppConfig::default(), toml_edit::DocumentMut::new()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let mut config: AppConfig = toml::from_str(text)?;
    config.normalize();
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the document back to disk atomically, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let write_err = |e: std::io::Error| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(doc.to_string().as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Update one category default in the document
pub fn set_default_secs(doc: &mut toml_edit::DocumentMut, category: Category, secs: u64) {
    if !doc.contains_key("defaults") {
        doc["defaults"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["defaults"][category.name()] = toml_edit::value(secs as i64);
}

/// Update the bar height in the document
pub fn set_bar_height(doc: &mut toml_edit::DocumentMut, rows: u16) {
    if !doc.contains_key("ui") {
        doc["ui"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["ui"]["bar_height"] = toml_edit::value(rows as i64);
}

/// Copy the settings editable at runtime into the document
pub fn sync_runtime_settings(doc: &mut toml_edit::DocumentMut, config: &AppConfig) {
    for category in Category::ALL {
        set_default_secs(doc, category, config.default_secs(category));
    }
    set_bar_height(doc, config.ui.bar_height);
}

/// The effective config as TOML (for `timebar config`)
pub fn render_config(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# my timers
[timers]
max_concurrent = 4

[defaults]
red = 120   # short ones
blue = 900

[ui]
bar_height = 2
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let (config, doc) = read_config(&path).unwrap();
        assert_eq!(config.timers.max_concurrent, 4);
        assert_eq!(config.default_secs(Category::Red), 120);
        write_config(&path, &doc).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, sample_config());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config.timers.max_concurrent, 10);
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[timers\nmax = ").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_set_default_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_default_secs(&mut doc, Category::Red, 60);
        let result = doc.to_string();
        assert!(result.contains("# my timers"));
        assert!(result.contains("red = 60"));
        let config: AppConfig = toml::from_str(&result).unwrap();
        assert_eq!(config.default_secs(Category::Red), 60);
        assert_eq!(config.default_secs(Category::Blue), 900);
    }

    #[test]
    fn test_sync_into_empty_document() {
        let mut config = AppConfig::default();
        config.set_default_secs(Category::Turquoise, 45);
        config.set_bar_height(5);
        let mut doc = toml_edit::DocumentMut::new();
        sync_runtime_settings(&mut doc, &config);

        let back: AppConfig = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(back.default_secs(Category::Turquoise), 45);
        assert_eq!(back.default_secs(Category::Red), 200);
        assert_eq!(back.ui.bar_height, 5);
    }

    #[test]
    fn write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("timebar").join("config.toml");
        let mut doc = toml_edit::DocumentMut::new();
        set_bar_height(&mut doc, 4);
        write_config(&path, &doc).unwrap();
        let (config, _) = read_config(&path).unwrap();
        assert_eq!(config.ui.bar_height, 4);
    }

    #[test]
    fn out_of_range_file_values_are_clamped() {
        let (config, doc) = parse_config("[ui]\nbar_height = 65535\n\n[defaults]\nred = 0\n").unwrap();
        assert_eq!(config.ui.bar_height, 6);
        assert_eq!(config.default_secs(Category::Red), 1);
        // The document keeps what the user wrote until something is saved
        assert!(doc.to_string().contains("bar_height = 65535"));
    }

    #[test]
    fn rendered_config_lists_every_category() {
        let (config, _) = parse_config("[defaults]\npurple = 45\n").unwrap();
        let text = render_config(&config).unwrap();
        assert!(text.contains("red = 200"));
        assert!(text.contains("blue = 900"));
        assert!(text.contains("purple = 45"));
        assert!(text.contains("turquoise = "));
    }

    #[test]
    fn rendered_config_parses_back() {
        let text = render_config(&AppConfig::default()).unwrap();
        assert!(text.contains("[defaults]"));
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.timers.alarm_ms, 1000);
        assert_eq!(back.default_secs(Category::Purple), 600);
    }
}
