use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item};

use crate::elements::DEFAULT_INDENT;

pub const CONFIG_FILE: &str = "poshi.toml";

const DEFAULT_EXTENSIONS: [&str; 3] = ["testcase", "macro", "function"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pad unit used when rendering readable syntax.
    pub indent: String,
    /// File extensions picked up when a directory is given.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl Config {
    /// Reads `path`, or `poshi.toml` in the working directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(CONFIG_FILE);
                if !default_path.exists() {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc = content.parse::<DocumentMut>()?;
        let mut config = Self::default();

        if let Some(indent) = doc.get("format").and_then(|format| format.get("indent")) {
            config.indent = parse_indent(indent)?;
        }

        if let Some(extensions) = doc.get("files").and_then(|files| files.get("extensions")) {
            let array = extensions
                .as_array()
                .context("files.extensions must be an array of strings")?;
            config.extensions = array
                .iter()
                .map(|ext| {
                    ext.as_str()
                        .map(|ext| ext.trim_start_matches('.').to_string())
                        .context("files.extensions must be an array of strings")
                })
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(config)
    }
}

fn parse_indent(item: &Item) -> Result<String> {
    if let Some(width) = item.as_integer() {
        let width = usize::try_from(width).context("format.indent must not be negative")?;
        return Ok(" ".repeat(width));
    }

    match item.as_str() {
        Some("tab") => Ok("\t".to_string()),
        Some(other) => anyhow::bail!("format.indent must be \"tab\" or a number, got \"{}\"", other),
        None => anyhow::bail!("format.indent must be \"tab\" or a number"),
    }
}
