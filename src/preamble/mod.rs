// src/preamble/mod.rs

//! Preamble normalization
//!
//! A [`Preamble`] receives the lines of one preamble section one at a time,
//! classifies each line and files it into a [`Paragraph`]. Conditionals get
//! their own nested paragraphs through the [`ConditionalStack`]. Once the
//! section ends, [`Preamble::finish`] flattens everything in canonical
//! category order:
//!
//! ```text
//! define, bconds, bcond_conditions, name, version, release, summary,
//! license, group, url, source, patch, build_conditions, buildrequires,
//! requires, ..., provides/obsoletes, buildroot, buildarch, misc, conditions
//! ```
//!
//! Comment lines stay attached to the declaration that follows them.
//!
//! # Example
//!
//! ```ignore
//! use specfmt::{format_preamble, FormatterConfig};
//!
//! let config = FormatterConfig::builtin()?;
//! let lines = format_preamble(["BuildRequires: foo >= 1.0, bar", "Name: foo"], &config)?;
//! assert_eq!(lines, ["Name: foo", "BuildRequires: bar", "BuildRequires: foo >= 1.0"]);
//! ```

mod classifier;
mod conditional;
mod paragraph;

pub use classifier::{classify, LineKind, Relation};
pub use conditional::{ConditionalStack, FrameKind, Hoist};
pub use paragraph::{Category, Group, Paragraph};

use crate::config::FormatterConfig;
use crate::dependencies::{queries_package_manager, DependencyNormalizer, Ecosystem};
use crate::error::Result;
use crate::license::fix_license;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// The only BuildRoot value ever emitted
pub const CANONICAL_BUILDROOT: &str = "%{_tmppath}/%{name}-%{version}-build";

const FIXME_GROUP: &str =
    "# FIXME: use correct group, see \"https://en.opensuse.org/openSUSE:Package_group_guidelines\"";
const FIXME_RPM_QUERY: &str = "# FIXME: Use %requires_eq macro instead";

/// Macro whose definitions must render after every declaration
const KERNEL_MODULE_MARKER: &str = "kernel_module";

static PKGCONFIG_CAPABILITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BuildRequires:\s*pkgconfig\(").unwrap());
static PKGCONFIG_DECLARED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BuildRequires:\s*pkgconfig(?:\s|$)").unwrap());

/// Which package a preamble belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The main package preamble at the top of the file
    Main,
    /// The body of a `%package` section
    Subpackage {
        /// Fixed license of the main package
        inherited_license: Option<String>,
    },
}

/// Line-by-line preamble formatter
pub struct Preamble<'a> {
    config: &'a FormatterConfig,
    normalizer: DependencyNormalizer<'a>,
    scope: Scope,
    paragraph: Paragraph,
    conditions: ConditionalStack,
    /// A `%define` ending in `\` is being continued
    multiline: bool,
    previous_line: Option<String>,
    line_no: usize,
    /// First top-level license, after fixing
    license: Option<String>,
}

impl<'a> Preamble<'a> {
    /// Formatter for the main package preamble
    pub fn new(config: &'a FormatterConfig) -> Self {
        Self::with_scope(config, Scope::Main)
    }

    /// Formatter for a `%package` section body
    pub fn subpackage(config: &'a FormatterConfig, inherited_license: Option<&str>) -> Self {
        Self::with_scope(
            config,
            Scope::Subpackage {
                inherited_license: inherited_license.map(str::to_string),
            },
        )
    }

    pub fn with_scope(config: &'a FormatterConfig, scope: Scope) -> Self {
        Self {
            config,
            normalizer: DependencyNormalizer::new(config),
            scope,
            paragraph: Paragraph::new(),
            conditions: ConditionalStack::new(),
            multiline: false,
            previous_line: None,
            line_no: 0,
            license: None,
        }
    }

    /// The fixed license declared at the top level, if any
    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    /// Feed one input line
    pub fn add_line(&mut self, raw: &str) -> Result<()> {
        self.line_no += 1;
        let line = raw.trim_end();
        let kind = classify(line);
        trace!("Line {}: {:?}", self.line_no, kind);

        if kind == LineKind::Blank && !self.config.keep_space {
            return Ok(());
        }

        if self.multiline {
            self.paragraph.extend_last(Category::Define, line.to_string());
            if !line.ends_with('\\') {
                self.multiline = false;
            }
            self.previous_line = Some(line.to_string());
            return Ok(());
        }

        match kind {
            LineKind::Blank => {
                // Runs of blank lines collapse; leading ones vanish
                if self.previous_line.as_deref().is_some_and(|prev| !prev.is_empty()) {
                    self.paragraph.push_comment("");
                    self.previous_line = Some(String::new());
                }
                return Ok(());
            }
            LineKind::ConditionOpen => {
                self.conditions.open(&mut self.paragraph, line, FrameKind::Directive);
            }
            LineKind::BlockOpen => {
                self.conditions.open(&mut self.paragraph, line, FrameKind::CodeBlock);
            }
            LineKind::ConditionElse | LineKind::ConditionElif => {
                self.conditions.alternate(&mut self.paragraph, line, self.line_no)?;
            }
            LineKind::ConditionClose => self.close_conditional(line)?,
            LineKind::BlockClose => {
                if self.conditions.innermost() == Some(FrameKind::CodeBlock) {
                    self.close_conditional(line)?;
                } else {
                    self.seal(Category::Misc, line.to_string());
                }
            }
            LineKind::Comment => self.paragraph.push_comment(line),
            LineKind::Source { index, value } => {
                let key = format!("Source{}", numbered(index));
                self.add_value(Category::Source, value, Some(&key));
            }
            LineKind::Patch { index, value } => {
                let key = format!("Patch{}", numbered(index));
                self.add_value(Category::Patch, value, Some(&key));
            }
            LineKind::Bcond => self.seal(Category::Bconds, line.to_string()),
            LineKind::Define => {
                self.multiline = line.ends_with('\\');
                if !self.multiline && line.contains(KERNEL_MODULE_MARKER) {
                    self.seal(Category::Misc, line.to_string());
                } else {
                    self.seal(Category::Define, line.to_string());
                }
            }
            LineKind::RequiresEq(value) => self.add_value(Category::RequiresEq, value, None),
            LineKind::Prereq(value) => self.add_value(Category::Prereq, value, None),
            LineKind::RequiresPhase { phase, value } => {
                let key = format!("Requires{}", phase);
                self.add_value(Category::RequiresPhase, value, Some(&key));
            }
            LineKind::Relation { relation, value } => {
                self.add_value(Category::ProvidesObsoletes, value, Some(relation.key()));
            }
            LineKind::BuildRoot => {
                if self.paragraph.count(Category::Buildroot) == 0 {
                    self.add_value(Category::Buildroot, CANONICAL_BUILDROOT, None);
                } else {
                    debug!("Line {}: dropping duplicate BuildRoot", self.line_no);
                    self.paragraph.discard_pending();
                }
            }
            LineKind::License(value) => self.add_license(value),
            LineKind::Release(value) => {
                let keep = value.chars().any(|c| c.is_ascii_alphabetic() || c.is_whitespace());
                self.add_value(Category::Release, if keep { value } else { "0" }, None);
            }
            LineKind::SummaryLocalized { language, value } => {
                let key = format!("Summary{}", language);
                self.add_value(Category::SummaryLocalized, value, Some(&key));
            }
            LineKind::Group(value) => {
                if !self.config.minimal
                    && !self.config.allowed_groups.contains(value)
                    && !self.previous_starts_with("# FIXME")
                {
                    self.paragraph.push_comment(FIXME_GROUP);
                }
                self.add_value(Category::Group, value, None);
            }
            LineKind::Deprecated(tag) => {
                debug!("Line {}: dropping deprecated {} tag", self.line_no, tag);
                self.paragraph.discard_pending();
                return Ok(());
            }
            LineKind::Tag { category, value } => self.add_value(category, value, None),
            LineKind::Misc => self.seal(Category::Misc, line.to_string()),
        }

        self.previous_line = Some(line.to_string());
        Ok(())
    }

    /// Flatten the preamble into output lines
    ///
    /// Fails if a conditional is still open.
    pub fn finish(mut self) -> Result<Vec<String>> {
        self.conditions.finish()?;

        match &self.scope {
            Scope::Main => {
                if self.config.pkgconfig && !self.config.minimal {
                    ensure_pkgconfig_declared(&mut self.paragraph, self.config.align_column);
                }
            }
            Scope::Subpackage { inherited_license } => {
                if self.config.subpkglicense && self.paragraph.count(Category::License) == 0 {
                    if let Some(license) = inherited_license {
                        let line = Category::License.prefix(None, self.config.align_column) + license;
                        self.paragraph.push_block(Category::License, vec![line]);
                    }
                }
            }
        }

        let mut lines = self.paragraph.into_lines();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        // A kept blank line may have moved to the front along with its group
        let leading = lines.iter().take_while(|line| line.is_empty()).count();
        lines.drain(..leading);
        Ok(lines)
    }

    fn close_conditional(&mut self, line: &str) -> Result<()> {
        let hoist = self.conditions.close(
            &mut self.paragraph,
            line,
            self.line_no,
            self.config.minimal,
        )?;
        if let Some(hoist) = hoist {
            trace!("Line {}: top-level conditional closed, {:?}", self.line_no, hoist);
        }
        Ok(())
    }

    fn add_license(&mut self, value: &str) {
        let fixed = fix_license(value, &self.config.license_conversions);

        match self.scope {
            Scope::Main => {
                if self.conditions.depth() == 0 && self.license.is_none() && !fixed.is_empty() {
                    self.license = Some(fixed.clone());
                }
            }
            Scope::Subpackage { .. } if !self.config.subpkglicense => {
                debug!("Line {}: dropping subpackage license", self.line_no);
                self.paragraph.discard_pending();
                return;
            }
            Scope::Subpackage { .. } => {}
        }

        self.add_value(Category::License, &fixed, None);
    }

    /// Render `Key: value` lines for a declaration and seal them
    ///
    /// A dependency value without any atoms is kept as written, so that its
    /// comments stay attached to it.
    fn add_value(&mut self, category: Category, value: &str, key: Option<&str>) {
        let prefix = category.prefix(key, self.config.align_column);

        let mut values = if category.is_token_bearing() {
            if queries_package_manager(value)
                && !self.config.minimal
                && !self.previous_starts_with("#")
            {
                self.paragraph.push_comment(FIXME_RPM_QUERY);
            }
            self.normalizer.normalize(value, category.rewrites_names())
        } else {
            Vec::new()
        };
        if values.is_empty() {
            values.push(value.trim().to_string());
        }

        for value in values {
            let line = if value.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, value)
            };
            self.seal(category, line);
        }
    }

    fn seal(&mut self, category: Category, line: String) {
        self.paragraph.seal(category, line);
    }

    fn previous_starts_with(&self, prefix: &str) -> bool {
        self.previous_line
            .as_deref()
            .is_some_and(|line| line.starts_with(prefix))
    }
}

/// Add `BuildRequires: pkgconfig` when pkgconfig capabilities are used
fn ensure_pkgconfig_declared(paragraph: &mut Paragraph, align_column: Option<usize>) {
    let mut uses_capability = false;
    for line in paragraph.payload_lines() {
        if PKGCONFIG_DECLARED_RE.is_match(line) {
            return;
        }
        uses_capability |= PKGCONFIG_CAPABILITY_RE.is_match(line);
    }

    if uses_capability {
        debug!("Adding missing pkgconfig build dependency");
        let line = Category::Buildrequires.prefix(None, align_column) + Ecosystem::PkgConfig.prefix();
        paragraph.push_block(Category::Buildrequires, vec![line]);
    }
}

/// `Patch:` and `Source:` without a number are number zero
fn numbered(index: &str) -> &str {
    if index.is_empty() { "0" } else { index }
}

/// Format a whole main package preamble in one go
pub fn format_preamble<I, S>(lines: I, config: &FormatterConfig) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut preamble = Preamble::new(config);
    for line in lines {
        preamble.add_line(line.as_ref())?;
    }
    preamble.finish()
}
