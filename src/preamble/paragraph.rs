// src/preamble/paragraph.rs

//! Paragraphs, categories and groups
//!
//! A paragraph holds every line of one nesting level, sorted into
//! categories. A category is a list of groups; a group is zero or more
//! comment lines followed by its payload. Comments therefore travel with the
//! declaration they precede when categories are reordered.

use std::collections::BTreeMap;
use strum_macros::{AsRefStr, EnumIter};

/// Output bucket of a preamble line
///
/// Declaration order is output order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Define,
    Bconds,
    BcondConditions,
    Name,
    Version,
    Release,
    Summary,
    SummaryLocalized,
    License,
    Group,
    Url,
    Source,
    Nosource,
    Patch,
    BuildConditions,
    Buildrequires,
    Requires,
    RequiresEq,
    Prereq,
    RequiresPhase,
    Recommends,
    Suggests,
    Enhances,
    Supplements,
    Conflicts,
    ProvidesObsoletes,
    Buildroot,
    Buildarch,
    Excludearch,
    Exclusivearch,
    Misc,
    Conditions,
}

impl Category {
    /// Default declaration key rendered for this category
    ///
    /// Categories holding raw lines, and `provides_obsoletes` whose key
    /// depends on the line, have none.
    pub fn key(&self) -> Option<&'static str> {
        let key = match self {
            Self::Name => "Name",
            Self::Version => "Version",
            Self::Release => "Release",
            Self::Summary | Self::SummaryLocalized => "Summary",
            Self::License => "License",
            Self::Group => "Group",
            Self::Url => "URL",
            Self::Source => "Source",
            Self::Nosource => "NoSource",
            Self::Patch => "Patch",
            Self::Buildrequires => "BuildRequires",
            Self::Requires | Self::RequiresPhase => "Requires",
            Self::RequiresEq => "%requires_eq",
            Self::Prereq => "Requires(pre)",
            Self::Recommends => "Recommends",
            Self::Suggests => "Suggests",
            Self::Enhances => "Enhances",
            Self::Supplements => "Supplements",
            Self::Conflicts => "Conflicts",
            Self::Buildroot => "BuildRoot",
            Self::Buildarch => "BuildArch",
            Self::Excludearch => "ExcludeArch",
            Self::Exclusivearch => "ExclusiveArch",
            _ => return None,
        };
        Some(key)
    }

    /// Whether values are dependency lists routed through the normalizer
    pub fn is_token_bearing(&self) -> bool {
        matches!(
            self,
            Self::Buildrequires
                | Self::Requires
                | Self::RequiresEq
                | Self::Prereq
                | Self::RequiresPhase
                | Self::Recommends
                | Self::Suggests
                | Self::Enhances
                | Self::Supplements
                | Self::Conflicts
                | Self::ProvidesObsoletes
        )
    }

    /// Whether package names may be rewritten through conversion tables
    ///
    /// Scriptlet requirements keep their names so scripts keep working.
    pub fn rewrites_names(&self) -> bool {
        self.is_token_bearing() && !matches!(self, Self::Prereq | Self::RequiresPhase)
    }

    /// Render the `Key: ` prefix for a value in this category
    ///
    /// `key` overrides the category default. With `align_column`, the
    /// prefix is padded to that width.
    pub fn prefix(&self, key: Option<&str>, align_column: Option<usize>) -> String {
        let key = key.or(self.key()).unwrap_or_default();
        if *self == Self::RequiresEq {
            return format!("{} ", key);
        }

        let mut prefix = format!("{}:", key);
        match align_column {
            Some(width) if prefix.len() < width => {
                let pad = width - prefix.len();
                prefix.extend(std::iter::repeat_n(' ', pad));
            }
            _ => prefix.push(' '),
        }
        prefix
    }
}

/// Comment lines attached to a payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub comments: Vec<String>,
    pub payload: Vec<String>,
}

impl Group {
    /// Lines in output order
    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.comments.iter().chain(self.payload.iter())
    }

    pub fn into_lines(self) -> impl Iterator<Item = String> {
        self.comments.into_iter().chain(self.payload)
    }
}

/// All categories of one nesting level plus the comments not yet attached
#[derive(Debug, Default)]
pub struct Paragraph {
    items: BTreeMap<Category, Vec<Group>>,
    pending: Vec<String>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a comment (or kept blank line) for the next payload
    pub fn push_comment(&mut self, line: impl Into<String>) {
        self.pending.push(line.into());
    }

    /// Drop comments buffered for a line that renders nothing
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Seal a payload line, together with pending comments, into a category
    pub fn seal(&mut self, category: Category, line: String) {
        let group = Group {
            comments: std::mem::take(&mut self.pending),
            payload: vec![line],
        };
        self.items.entry(category).or_default().push(group);
    }

    /// Append a line to the payload of the category's last group
    pub fn extend_last(&mut self, category: Category, line: String) {
        match self.items.get_mut(&category).and_then(|groups| groups.last_mut()) {
            Some(group) => group.payload.push(line),
            None => self.seal(category, line),
        }
    }

    /// Append an already flattened block as one group without comments
    pub fn push_block(&mut self, category: Category, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        self.items.entry(category).or_default().push(Group {
            comments: Vec::new(),
            payload: lines,
        });
    }

    /// Number of groups in a category
    pub fn count(&self, category: Category) -> usize {
        self.items.get(&category).map_or(0, Vec::len)
    }

    /// Remove and return all groups of a category
    pub fn take(&mut self, category: Category) -> Vec<Group> {
        self.items.remove(&category).unwrap_or_default()
    }

    /// Move groups to the end of a category
    pub fn append(&mut self, category: Category, groups: Vec<Group>) {
        if groups.is_empty() {
            return;
        }
        self.items.entry(category).or_default().extend(groups);
    }

    /// Every payload line, across all categories
    pub fn payload_lines(&self) -> impl Iterator<Item = &str> {
        self.items
            .values()
            .flatten()
            .flat_map(|group| group.payload.iter())
            .map(String::as_str)
    }

    /// Flatten into output lines in canonical category order
    ///
    /// Comments never followed by a payload come last.
    pub fn into_lines(self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .items
            .into_values()
            .flatten()
            .flat_map(Group::into_lines)
            .collect();
        lines.extend(self.pending);
        lines
    }
}
