use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::cli::Cli;

/// Contents of `filedb.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Root directory of the record tree.
    pub root: Option<PathBuf>,
    /// Definition file, relative paths resolved against the config file.
    pub definition: Option<PathBuf>,
    pub author: Option<String>,
}

/// Settings after merging the config file with command-line flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub definition: Option<PathBuf>,
    pub author: Option<String>,
}

impl Settings {
    /// The definition file, required by every record command.
    pub fn definition(&self) -> anyhow::Result<&Path> {
        self.definition
            .as_deref()
            .context("no definition file: pass --definition or set `definition` in the config")
    }
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid filedb config")
    }

    /// Load `path`, or the empty config if it does not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config = Self::from_toml_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.root = config.root.map(|p| base.join(p));
            config.definition = config.definition.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Apply command-line overrides. Without any root the current directory
    /// is used.
    pub fn merge(self, cli: &Cli) -> Settings {
        let root = cli
            .root
            .clone()
            .or(self.root)
            .unwrap_or_else(|| PathBuf::from("."));
        Settings {
            root,
            definition: cli.definition.clone().or(self.definition),
            author: cli.author.clone().or(self.author),
        }
    }
}
