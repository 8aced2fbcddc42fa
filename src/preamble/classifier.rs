// src/preamble/classifier.rs

//! Line classification
//!
//! Every preamble line is matched against an ordered rule list; the first
//! matching rule wins. Several patterns overlap on purpose (`Requires(post):`
//! must be seen before plain `Requires:`, `Summary(de):` before `Summary:`),
//! so the order of checks in [`classify`] is significant.

use super::paragraph::Category;
use regex::Regex;
use std::sync::LazyLock;

/// Build a case-insensitive `Tag: value` matcher capturing the value
fn tag_re(tag: &str) -> Regex {
    Regex::new(&format!(r"(?i)^{}\s*:\s*(.*)$", tag)).unwrap()
}

static IF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*%if(?:n?arch|n?os)?(?:[\s(!]|$)").unwrap());
static CODEBLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^%\{lua:[^}]*$").unwrap());
static ELIF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*%elif(?:n?arch|n?os)?(?:[\s(!]|$)").unwrap());
static ELSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*%else(?:\s|$)").unwrap());
static ENDIF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*%endif(?:\s|$)").unwrap());
static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\}\s*$").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#").unwrap());

static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Source(\d*)\s*:\s*(.*)$").unwrap());
static PATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Patch(\d*)\s*:\s*(.*)$").unwrap());

static BCOND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%bcond(?:_with|_without)?\s").unwrap());
static DEFINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%(?:define|global)\s").unwrap());
/// `%{!?foo: %global foo bar}` style guarded definitions
static ONELINECOND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%\{!?\?[^:}]+:\s*%(?:define|global)\s").unwrap());

static REQUIRES_EQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%requires_eq\s+(.*)$").unwrap());
static PREREQ_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("PreReq"));
static REQUIRES_PHASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Requires(\([^)]*\))\s*:\s*(.*)$").unwrap());
static PROVIDES_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("Provides"));
static OBSOLETES_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("Obsoletes"));
static BUILDROOT_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("BuildRoot"));
static LICENSE_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("License"));
static RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("Release"));
static SUMMARY_LOCALIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Summary(\([^)]+\))\s*:\s*(.*)$").unwrap());
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| tag_re("Group"));

/// Tags that are dropped from the output
static DEPRECATED: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("vendor", tag_re("Vendor")),
        ("autoreqprov", tag_re("AutoReqProv")),
        ("epoch", tag_re("Epoch")),
        ("icon", tag_re("Icon")),
        ("copyright", tag_re("Copyright")),
        ("packager", tag_re("Packager")),
        ("debugpkg", Regex::new(r"^%debug_package\s*$").unwrap()),
        ("prefix", tag_re("Prefix")),
    ]
});

/// Tags whose value is sealed unchanged apart from dependency normalization
static SIMPLE_TAGS: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    vec![
        (Category::Name, tag_re("Name")),
        (Category::Version, tag_re("Version")),
        (Category::Summary, tag_re("Summary")),
        (Category::Url, tag_re("Url")),
        (Category::Nosource, tag_re("NoSource")),
        (Category::Buildrequires, tag_re("Build(?:Requires|PreReq)")),
        (Category::Conflicts, tag_re("Conflicts")),
        (Category::Requires, tag_re("Requires")),
        (Category::Recommends, tag_re("Recommends")),
        (Category::Suggests, tag_re("Suggests")),
        (Category::Enhances, tag_re("Enhances")),
        (Category::Supplements, tag_re("Supplements")),
        (Category::Buildarch, tag_re("BuildArch(?:itectures)?")),
        (Category::Excludearch, tag_re("ExcludeArch")),
        (Category::Exclusivearch, tag_re("ExclusiveArch")),
    ]
});

/// Where a dependency list line with a free-form key goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Provides,
    Obsoletes,
}

impl Relation {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Provides => "Provides",
            Self::Obsoletes => "Obsoletes",
        }
    }
}

/// Classified preamble line, borrowing its captures from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `%if`, `%ifarch` and friends
    ConditionOpen,
    /// `%{lua:` without its closing brace
    BlockOpen,
    ConditionElse,
    /// `%elif`, `%elifarch`, `%elifos`
    ConditionElif,
    ConditionClose,
    /// A lone `}` ending a code block
    BlockClose,
    Comment,
    Source { index: &'a str, value: &'a str },
    Patch { index: &'a str, value: &'a str },
    Bcond,
    Define,
    RequiresEq(&'a str),
    Prereq(&'a str),
    RequiresPhase { phase: &'a str, value: &'a str },
    Relation { relation: Relation, value: &'a str },
    BuildRoot,
    License(&'a str),
    Release(&'a str),
    SummaryLocalized { language: &'a str, value: &'a str },
    Group(&'a str),
    Deprecated(&'static str),
    Tag { category: Category, value: &'a str },
    Misc,
}

fn capture<'a>(re: &Regex, line: &'a str, group: usize) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim())
}

fn capture_pair<'a>(re: &Regex, line: &'a str) -> Option<(&'a str, &'a str)> {
    let caps = re.captures(line)?;
    let first = caps.get(1).map_or("", |m| m.as_str());
    let second = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((first, second))
}

/// Classify one line (already stripped of trailing whitespace)
pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if IF_RE.is_match(line) {
        return LineKind::ConditionOpen;
    }
    if CODEBLOCK_RE.is_match(line) {
        return LineKind::BlockOpen;
    }
    if ELIF_RE.is_match(line) {
        return LineKind::ConditionElif;
    }
    if ELSE_RE.is_match(line) {
        return LineKind::ConditionElse;
    }
    if ENDIF_RE.is_match(line) {
        return LineKind::ConditionClose;
    }
    if BLOCK_END_RE.is_match(line) {
        return LineKind::BlockClose;
    }
    if COMMENT_RE.is_match(line) {
        return LineKind::Comment;
    }

    if let Some((index, value)) = capture_pair(&SOURCE_RE, line) {
        return LineKind::Source { index, value };
    }
    if let Some((index, value)) = capture_pair(&PATCH_RE, line) {
        return LineKind::Patch { index, value };
    }

    if BCOND_RE.is_match(line) {
        return LineKind::Bcond;
    }
    if DEFINE_RE.is_match(line) || ONELINECOND_RE.is_match(line) {
        return LineKind::Define;
    }

    if let Some(value) = capture(&REQUIRES_EQ_RE, line, 1) {
        return LineKind::RequiresEq(value);
    }
    if let Some(value) = capture(&PREREQ_RE, line, 1) {
        return LineKind::Prereq(value);
    }
    if let Some((phase, value)) = capture_pair(&REQUIRES_PHASE_RE, line) {
        return LineKind::RequiresPhase { phase, value };
    }
    if let Some(value) = capture(&PROVIDES_RE, line, 1) {
        return LineKind::Relation { relation: Relation::Provides, value };
    }
    if let Some(value) = capture(&OBSOLETES_RE, line, 1) {
        return LineKind::Relation { relation: Relation::Obsoletes, value };
    }
    if BUILDROOT_RE.is_match(line) {
        return LineKind::BuildRoot;
    }
    if let Some(value) = capture(&LICENSE_RE, line, 1) {
        return LineKind::License(value);
    }
    if let Some(value) = capture(&RELEASE_RE, line, 1) {
        return LineKind::Release(value);
    }
    if let Some((language, value)) = capture_pair(&SUMMARY_LOCALIZED_RE, line) {
        return LineKind::SummaryLocalized { language, value };
    }
    if let Some(value) = capture(&GROUP_RE, line, 1) {
        return LineKind::Group(value);
    }

    if let Some((tag, _)) = DEPRECATED.iter().find(|(_, re)| re.is_match(line)) {
        return LineKind::Deprecated(*tag);
    }

    for (category, re) in SIMPLE_TAGS.iter() {
        if let Some(value) = capture(re, line, 1) {
            return LineKind::Tag { category: *category, value };
        }
    }

    LineKind::Misc
}
