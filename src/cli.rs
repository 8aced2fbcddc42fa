// src/cli.rs
//! CLI definitions for specfmt
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "specfmt")]
#[command(author = "Conary Project")]
#[command(version)]
#[command(about = "Normalize the preamble of RPM spec files", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Format spec files (stdin when no file is given)
    Format {
        /// Spec files to format
        files: Vec<PathBuf>,

        /// Rewrite files in place
        #[arg(short, long, conflicts_with_all = ["output", "diff"])]
        inplace: bool,

        /// Write the result to this file (single input only)
        #[arg(short, long, conflicts_with = "diff")]
        output: Option<PathBuf>,

        /// Print a unified diff instead of the formatted file
        #[arg(short, long)]
        diff: bool,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Exit non-zero if any file is not already formatted
    Check {
        /// Spec files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by `format` and `check`
#[derive(Args, Debug, Clone, Default)]
pub struct FormatOptions {
    /// Configuration file (default: ~/.config/specfmt/specfmt.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only reorder and respace; no FIXME comments, no dead code removal
    #[arg(short, long)]
    pub minimal: bool,

    /// Keep single blank lines between declarations
    #[arg(long)]
    pub keep_space: bool,

    /// Keep License lines of subpackages
    #[arg(long)]
    pub subpkg_license: bool,

    /// Rewrite -devel names to pkgconfig() capabilities
    #[arg(long)]
    pub pkgconfig: bool,

    /// Rewrite names to perl() capabilities
    #[arg(long)]
    pub perl: bool,

    /// Rewrite names to cmake() capabilities
    #[arg(long)]
    pub cmake: bool,

    /// Rewrite names to tex() capabilities
    #[arg(long)]
    pub tex: bool,

    /// Align values at this column (16 gives the classic layout)
    #[arg(long, value_name = "COL")]
    pub align: Option<usize>,

    /// Treat the whole input as one preamble, without section splitting
    #[arg(long)]
    pub preamble_only: bool,
}
