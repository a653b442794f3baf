use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::charspec::CharSpec;
use crate::output::{ArtOutput, OutputKind};

/// Startup settings for the interactive shell, read from TOML.
///
/// Every key is optional:
///
/// ```toml
/// resolution = 4
/// chars = ["0-9", "space"]
/// invert = false
/// output = "html"
/// html_file = "out.html"
/// html_font = "Courier New"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub resolution: u32,
    pub chars: Vec<String>,
    pub invert: bool,
    pub output: OutputKind,
    pub html_file: PathBuf,
    pub html_font: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            resolution: 2,
            chars: vec!["0-9".into()],
            invert: false,
            output: OutputKind::Console,
            html_file: PathBuf::from("out.html"),
            html_font: "Courier New".into(),
        }
    }
}

impl ShellConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {:?}", path))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {:?}", path))
    }

    /// Initial character set, in the order the specs list them.
    pub fn char_set(&self) -> Result<Vec<char>> {
        let mut chars = Vec::new();
        for spec in &self.chars {
            let spec: CharSpec = spec.parse().context("invalid `chars` entry in config")?;
            chars.extend(spec.into_chars());
        }
        Ok(chars)
    }

    pub fn art_output(&self, kind: OutputKind) -> ArtOutput {
        match kind {
            OutputKind::Console => ArtOutput::Console,
            OutputKind::Html => {
                ArtOutput::Html { path: self.html_file.clone(), font: self.html_font.clone() }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: ShellConfig = toml::from_str("resolution = 8").unwrap();
        assert_eq!(config, ShellConfig { resolution: 8, ..ShellConfig::default() });
        assert_eq!(config.char_set().unwrap(), ('0'..='9').collect::<Vec<_>>());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chars = [\"a-c\", \"space\"]\noutput = \"html\"\nhtml_font = \"Menlo\"")
            .unwrap();

        let config = ShellConfig::load(file.path()).unwrap();
        assert_eq!(config.char_set().unwrap(), vec!['a', 'b', 'c', ' ']);
        assert_eq!(
            config.art_output(config.output),
            ArtOutput::Html { path: PathBuf::from("out.html"), font: "Menlo".into() }
        );
    }

    #[test]
    fn rejects_unknown_keys_and_bad_specs() {
        assert!(toml::from_str::<ShellConfig>("colour = true").is_err());

        let config = ShellConfig { chars: vec!["abc".into()], ..ShellConfig::default() };
        assert!(config.char_set().is_err());
    }
}
