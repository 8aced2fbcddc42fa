// src/dependencies/parser.rs

//! Splitting of dependency declaration values into atoms
//!
//! A value such as `foo >= 1.0, bar pkgconfig(baz)` holds several
//! dependencies. Commas and whitespace separate them, but only outside of
//! brackets: `%{?_isa}`, `pkgconfig(glib-2.0)` and rich dependencies like
//! `(foo or bar)` are kept whole. An operator separated by whitespace binds
//! to the name before it and the version after it.

use super::operator::Operator;
use std::fmt;

/// A package name with an optional version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub operator: Option<Operator>,
    pub version: String,
}

impl Dependency {
    /// A dependency without version constraint
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: None,
            version: String::new(),
        }
    }

    /// Attach a version constraint
    pub fn with_version(mut self, operator: Operator, version: impl Into<String>) -> Self {
        self.operator = Some(operator);
        self.version = version.into();
        self
    }

    /// Same constraint, different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: self.operator,
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Some(op) => write!(f, "{} {} {}", self.name, op, self.version),
            None => f.write_str(&self.name),
        }
    }
}

/// One element of a dependency list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// A decomposed name/operator/version triple
    Dependency(Dependency),
    /// Macro expansions, rich dependencies and anything else that cannot be
    /// safely decomposed; rendered verbatim
    Opaque(String),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Dependency(dep) => write!(f, "{dep}"),
            Atom::Opaque(raw) => f.write_str(raw),
        }
    }
}

/// Parse a dependency list value into atoms
pub fn parse_dependency_list(value: &str) -> Vec<Atom> {
    split_atoms(value).iter().filter_map(|raw| parse_atom(raw)).collect()
}

/// Split a value into raw atom strings, joining operators to their operands
pub fn split_atoms(value: &str) -> Vec<String> {
    let mut atoms: Vec<String> = Vec::new();
    let mut awaiting_version = false;

    for word in split_words(value) {
        if awaiting_version {
            if let Some(last) = atoms.last_mut() {
                last.push(' ');
                last.push_str(&word);
            }
            awaiting_version = false;
            continue;
        }

        let binds_to_previous = word.starts_with(Operator::is_operator_char)
            && atoms
                .last()
                .is_some_and(|last| operator_span(last).is_none());
        if binds_to_previous {
            awaiting_version = word.chars().all(Operator::is_operator_char);
            if let Some(last) = atoms.last_mut() {
                last.push(' ');
                last.push_str(&word);
            }
            continue;
        }

        awaiting_version = operator_span(&word).is_some_and(|(_, end)| end == word.len());
        atoms.push(word);
    }

    atoms
}

/// Decompose one raw atom
///
/// Returns None for atoms that are empty after whitespace removal.
pub fn parse_atom(raw: &str) -> Option<Atom> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('%') || raw.starts_with('(') {
        return Some(Atom::Opaque(Operator::canonicalize_spellings(raw)));
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let Some((start, end)) = operator_span(&compact) else {
        return Some(Atom::Dependency(Dependency::new(compact)));
    };

    let name = &compact[..start];
    let version = &compact[end..];
    match Operator::parse(&compact[start..end]) {
        Some(op) if !name.is_empty() && !version.is_empty() => {
            Some(Atom::Dependency(Dependency::new(name).with_version(op, version)))
        }
        _ => Some(Atom::Opaque(Operator::canonicalize_spellings(raw))),
    }
}

/// Split on commas and whitespace outside of brackets
fn split_words(value: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in value.chars() {
        match c {
            '(' | '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => flush_word(&mut words, &mut current),
            c if c.is_whitespace() && depth == 0 => flush_word(&mut words, &mut current),
            _ => current.push(c),
        }
    }
    flush_word(&mut words, &mut current);

    words
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Byte range of the first run of operator characters outside of brackets
fn operator_span(s: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut start = None;

    for (i, c) in s.char_indices() {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        let is_op = depth == 0 && Operator::is_operator_char(c);
        match (start, is_op) {
            (None, true) => start = Some(i),
            (Some(begin), false) => return Some((begin, i)),
            _ => {}
        }
    }

    // The run reaches the end of the string
    start.map(|begin| (begin, s.len()))
}
