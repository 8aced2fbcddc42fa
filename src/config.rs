// src/config.rs

//! Formatter configuration
//!
//! The configuration is read once per run and shared read-only by every
//! preamble being formatted. Built-in defaults are embedded from
//! `data/defaults.toml`; a user file is layered on top of them before the
//! result is deserialized into [`FormatterConfig`].
//!
//! # Example specfmt.toml
//!
//! ```toml
//! pkgconfig = true
//! align_column = 16
//!
//! [license_conversions]
//! "GPL-2.0+" = "GPL-2.0-or-later"
//!
//! [conversions.pkgconfig]
//! "libfoo-devel" = ["foo", "foo-utils"]
//! ```

use crate::dependencies::Ecosystem;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Built-in defaults, compiled into the binary
pub const DEFAULT_CONFIG: &str = include_str!("../data/defaults.toml");

/// Name of the user configuration file
pub const CONFIG_FILE_NAME: &str = "specfmt.toml";

/// Options and tables driving the preamble formatter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Only reorder and respace; no advisory comments, no dead code pruning
    pub minimal: bool,

    /// Keep (collapsed) blank lines instead of dropping them
    pub keep_space: bool,

    /// Keep `License:` lines of subpackages and inherit the main license
    pub subpkglicense: bool,

    /// Rewrite bare names through the pkgconfig table
    pub pkgconfig: bool,

    /// Rewrite bare names through the perl table
    pub perl: bool,

    /// Rewrite bare names through the cmake table
    pub cmake: bool,

    /// Rewrite bare names through the tex table
    pub tex: bool,

    /// Column at which declaration values start; None means one space
    pub align_column: Option<usize>,

    /// Package groups accepted without a FIXME comment
    pub allowed_groups: BTreeSet<String>,

    /// Raw license string -> normalized license string
    pub license_conversions: HashMap<String, String>,

    /// Per-ecosystem name conversion tables
    pub conversions: ConversionTables,
}

/// Name conversion tables, one per ecosystem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionTables {
    pub pkgconfig: HashMap<String, Replacement>,
    pub perl: HashMap<String, Replacement>,
    pub cmake: HashMap<String, Replacement>,
    pub tex: HashMap<String, Replacement>,
}

/// Replacement names for one bare package name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replacement {
    /// Whitespace separated list of names
    Names(String),
    /// Explicit list of names
    List(Vec<String>),
}

impl Replacement {
    /// Individual replacement names
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Names(names) => names.split_whitespace().collect(),
            Self::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl ConversionTables {
    /// Table for one ecosystem
    pub fn table(&self, ecosystem: Ecosystem) -> &HashMap<String, Replacement> {
        match ecosystem {
            Ecosystem::PkgConfig => &self.pkgconfig,
            Ecosystem::Perl => &self.perl,
            Ecosystem::CMake => &self.cmake,
            Ecosystem::Tex => &self.tex,
        }
    }

    /// Replacement names for a bare package name, if the table has any
    pub fn lookup(&self, ecosystem: Ecosystem, name: &str) -> Option<Vec<&str>> {
        self.table(ecosystem)
            .get(name)
            .map(Replacement::names)
            .filter(|names| !names.is_empty())
    }
}

impl FormatterConfig {
    /// The built-in configuration
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str("")
    }

    /// Parse a user configuration layered over the built-in defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut merged = parse_table(DEFAULT_CONFIG, "built-in defaults")?;
        merge_tables(&mut merged, parse_table(content, "configuration")?);

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| Error::ConfigError(format!("Invalid configuration: {}", e)))
    }

    /// Load configuration from a file, or from the default user location
    ///
    /// An explicitly given path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => return Self::builtin(),
            },
        };

        tracing::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::IoError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Default user configuration path (`$XDG_CONFIG_HOME/specfmt/specfmt.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("specfmt").join(CONFIG_FILE_NAME))
    }

    /// Whether names are rewritten through the given ecosystem's table
    pub fn rewrites(&self, ecosystem: Ecosystem) -> bool {
        match ecosystem {
            Ecosystem::PkgConfig => self.pkgconfig,
            Ecosystem::Perl => self.perl,
            Ecosystem::CMake => self.cmake,
            Ecosystem::Tex => self.tex,
        }
    }
}

fn parse_table(content: &str, what: &str) -> Result<toml::Table> {
    content
        .parse::<toml::Table>()
        .map_err(|e| Error::ConfigError(format!("Failed to parse {}: {}", what, e)))
}

/// Layer `overlay` onto `base`: tables merge key by key, other values replace
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
