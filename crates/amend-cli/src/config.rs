use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// How annotated text is written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Terminal colors, or bracket markers when color is off
    #[default]
    Text,
    /// Escaped HTML with `<del>`/`<ins>`
    Html,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmendConfig {
    pub corpus_path: PathBuf,
    pub render_style: RenderStyle,
    pub log_level: String,
}

impl Default for AmendConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("paragraphs.json"),
            render_style: RenderStyle::Text,
            log_level: "warn".into(),
        }
    }
}

impl AmendConfig {
    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, else the defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log_level {:?}", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = AmendConfig::default();
        assert_eq!(c.corpus_path, PathBuf::from("paragraphs.json"));
        assert_eq!(c.render_style, RenderStyle::Text);
        assert_eq!(c.level().unwrap(), tracing::Level::WARN);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "render_style = \"html\"").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let c = AmendConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(c.render_style, RenderStyle::Html);
        assert_eq!(c.level().unwrap(), tracing::Level::DEBUG);
        assert_eq!(c.corpus_path, PathBuf::from("paragraphs.json"));
    }

    #[test]
    fn bad_values_are_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "render_style = \"pdf\"").unwrap();
        assert!(AmendConfig::load(file.path()).is_err());

        let c = AmendConfig {
            log_level: "loud".into(),
            ..Default::default()
        };
        assert!(c.level().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AmendConfig::load(&dir.path().join("absent.toml")).is_err());
        assert_eq!(AmendConfig::resolve(None).unwrap(), AmendConfig::default());
    }
}
