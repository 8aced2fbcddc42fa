// src/lib.rs

//! specfmt - RPM spec file preamble formatter
//!
//! Normalizes the preamble of RPM spec files: one declaration per line,
//! canonical spacing, sorted dependency lists, fixed license expressions,
//! and a fixed category order, while keeping comments attached to the lines
//! they describe and preserving the meaning of nested conditionals.
//!
//! # Architecture
//!
//! - `dependencies`: splits and rewrites dependency list values
//! - `preamble`: line classifier, paragraph model, conditional stack and the
//!   [`Preamble`] orchestrator tying them together
//! - `license`: license expression cleanup
//! - `specfile`: runs one preamble per package over a whole spec file
//! - `config`: TOML configuration with embedded defaults

pub mod config;
pub mod dependencies;
mod error;
pub mod license;
pub mod preamble;
pub mod specfile;

pub use config::FormatterConfig;
pub use error::{Error, Result};
pub use license::fix_license;
pub use preamble::{format_preamble, Category, Preamble, Scope};
pub use specfile::{format_preamble_text, format_spec};
