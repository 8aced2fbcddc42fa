// src/specfile.rs

//! Whole spec file formatting
//!
//! Splits a spec file at section headers. The text before the first header
//! is the main package preamble and the body of every `%package` section is
//! a subpackage preamble; both go through [`Preamble`]. Every other section
//! (`%description`, `%prep`, scriptlets, `%files`, `%changelog`, ...) is
//! copied unchanged.

use crate::config::FormatterConfig;
use crate::error::Result;
use crate::preamble::Preamble;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^%(?:package|description|prep|build|install|check|clean|files|changelog",
        r"|pre|post|preun|postun|pretrans|posttrans|verifyscript",
        r"|(?:trans)?(?:file)?trigger(?:prein|in|un|postun)",
        r"|generate_buildrequires|conf|patchlist|sourcelist)(?:\s|$)"
    ))
    .unwrap()
});

/// One section of a spec file
#[derive(Debug)]
struct Section<'t> {
    /// Header line; None for the leading main preamble
    header: Option<&'t str>,
    body: Vec<&'t str>,
}

impl Section<'_> {
    fn is_subpackage(&self) -> bool {
        self.header.is_some_and(|h| h.starts_with("%package"))
    }
}

fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections = vec![Section { header: None, body: Vec::new() }];
    for line in text.lines() {
        if is_section_header(line) {
            sections.push(Section { header: Some(line), body: Vec::new() });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }
    sections
}

/// Whether a section header line starts a new section
pub fn is_section_header(line: &str) -> bool {
    SECTION_RE.is_match(line)
}

/// Format a complete spec file
pub fn format_spec(text: &str, config: &FormatterConfig) -> Result<String> {
    let sections = split_sections(text);
    let count = sections.len();
    let mut out: Vec<String> = Vec::new();
    let mut main_license: Option<String> = None;

    for (i, section) in sections.into_iter().enumerate() {
        let last = i + 1 == count;

        if let Some(header) = section.header {
            out.push(header.to_string());
        }

        let preamble = match section.header {
            None => Some(Preamble::new(config)),
            Some(_) if section.is_subpackage() => {
                Some(Preamble::subpackage(config, main_license.as_deref()))
            }
            Some(_) => None,
        };

        let Some(mut preamble) = preamble else {
            out.extend(section.body.iter().map(|line| line.to_string()));
            continue;
        };

        debug!(
            "Formatting {} preamble ({} lines)",
            section.header.unwrap_or("main"),
            section.body.len()
        );
        for line in &section.body {
            preamble.add_line(line)?;
        }
        if section.header.is_none() {
            main_license = preamble.license().map(str::to_string);
        }

        let lines = preamble.finish()?;
        let has_lines = !lines.is_empty();
        out.extend(lines);
        if has_lines && !last {
            out.push(String::new());
        }
    }

    Ok(join_lines(out, text.ends_with('\n')))
}

/// Format text that consists of a single main preamble
pub fn format_preamble_text(text: &str, config: &FormatterConfig) -> Result<String> {
    let lines = crate::preamble::format_preamble(text.lines(), config)?;
    Ok(join_lines(lines, text.ends_with('\n')))
}

fn join_lines(lines: Vec<String>, trailing_newline: bool) -> String {
    let mut text = lines.join("\n");
    if trailing_newline && !text.is_empty() {
        text.push('\n');
    }
    text
}
