// src/commands.rs
//! Command implementations for specfmt

use crate::cli::FormatOptions;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use specfmt::FormatterConfig;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Build the run configuration: file (or defaults), then CLI overrides
pub fn load_config(options: &FormatOptions) -> Result<FormatterConfig> {
    let mut config = FormatterConfig::load(options.config.as_deref())
        .context("Failed to load configuration")?;

    config.minimal |= options.minimal;
    config.keep_space |= options.keep_space;
    config.subpkglicense |= options.subpkg_license;
    config.pkgconfig |= options.pkgconfig;
    config.perl |= options.perl;
    config.cmake |= options.cmake;
    config.tex |= options.tex;
    if options.align.is_some() {
        config.align_column = options.align;
    }

    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn format_text(text: &str, config: &FormatterConfig, preamble_only: bool) -> specfmt::Result<String> {
    if preamble_only {
        specfmt::format_preamble_text(text, config)
    } else {
        specfmt::format_spec(text, config)
    }
}

/// Read and format one file
fn format_file(path: &Path, config: &FormatterConfig, preamble_only: bool) -> Result<(String, String)> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Failed to read spec file: {}", path.display()))?;
    let formatted = format_text(&original, config, preamble_only)
        .with_context(|| format!("Failed to format {}", path.display()))?;
    Ok((original, formatted))
}

/// Format all files in parallel, keeping input order
fn format_all(
    files: &[PathBuf],
    config: &FormatterConfig,
    preamble_only: bool,
) -> Vec<(PathBuf, Result<(String, String)>)> {
    files
        .par_iter()
        .map(|path| (path.clone(), format_file(path, config, preamble_only)))
        .collect()
}

fn render_diff(label: &str, original: &str, formatted: &str) -> String {
    let patch = diffy::create_patch(original, formatted);
    format!("--- {label}\n+++ {label}\n{}", strip_patch_header(&patch.to_string()))
}

/// Drop diffy's generic `--- original` / `+++ modified` lines
fn strip_patch_header(patch: &str) -> String {
    patch
        .lines()
        .skip_while(|line| line.starts_with("---") || line.starts_with("+++"))
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Format spec files, or stdin when no file is given
pub fn cmd_format(
    files: &[PathBuf],
    inplace: bool,
    output: Option<&Path>,
    diff: bool,
    options: &FormatOptions,
) -> Result<()> {
    let config = load_config(options)?;

    if files.is_empty() {
        if inplace {
            bail!("--inplace needs at least one file");
        }
        let mut original = String::new();
        io::stdin()
            .read_to_string(&mut original)
            .context("Failed to read standard input")?;
        let formatted = format_text(&original, &config, options.preamble_only)
            .context("Failed to format standard input")?;
        return emit("<stdin>", &original, &formatted, output, diff);
    }

    if output.is_some() && files.len() > 1 {
        bail!("--output can only be used with a single input file");
    }

    info!("Formatting {} file(s)", files.len());
    let mut failed = 0;
    for (path, result) in format_all(files, &config, options.preamble_only) {
        let (original, formatted) = match result {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed += 1;
                continue;
            }
        };

        if inplace {
            if original != formatted {
                fs::write(&path, &formatted)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Formatted {}", path.display());
            }
        } else {
            emit(&path.display().to_string(), &original, &formatted, output, diff)?;
        }
    }

    if failed > 0 {
        bail!("{} file(s) could not be formatted", failed);
    }
    Ok(())
}

fn emit(label: &str, original: &str, formatted: &str, output: Option<&Path>, diff: bool) -> Result<()> {
    if diff {
        if original != formatted {
            print!("{}", render_diff(label, original, formatted));
        }
        return Ok(());
    }

    match output {
        Some(path) => {
            fs::write(path, formatted)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            println!("Formatted spec written to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(formatted.as_bytes())
                .context("Failed to write to standard output")?;
        }
    }
    Ok(())
}

/// Report files that would change; fails if there are any
pub fn cmd_check(files: &[PathBuf], options: &FormatOptions) -> Result<()> {
    let config = load_config(options)?;

    let mut unformatted = 0;
    let mut failed = 0;
    for (path, result) in format_all(files, &config, options.preamble_only) {
        match result {
            Ok((original, formatted)) if original != formatted => {
                println!("Would reformat: {}", path.display());
                unformatted += 1;
            }
            Ok(_) => debug!("{} is already formatted", path.display()),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} file(s) could not be formatted", failed);
    }
    if unformatted > 0 {
        bail!("{} of {} file(s) would be reformatted", unformatted, files.len());
    }
    println!("{} file(s) already formatted", files.len());
    Ok(())
}

/// Print shell completions to stdout
pub fn cmd_completions(shell: clap_complete::Shell) -> Result<()> {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    clap_complete::generate(shell, &mut cmd, "specfmt", &mut io::stdout());
    Ok(())
}
