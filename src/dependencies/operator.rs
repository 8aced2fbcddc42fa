// src/dependencies/operator.rs

//! Version comparison operators in dependency declarations

use std::fmt;

/// Comparison operator between a package name and a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    LessThan,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    GreaterThan,
}

impl Operator {
    /// Parse an operator, accepting the legacy `=<` and `=>` spellings
    ///
    /// Examples:
    /// - "<=" and "=<" → LessOrEqual
    /// - ">=" and "=>" → GreaterOrEqual
    /// - "=" and "==" → Equal
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "<" => Some(Self::LessThan),
            "<=" | "=<" => Some(Self::LessOrEqual),
            "=" | "==" => Some(Self::Equal),
            ">=" | "=>" => Some(Self::GreaterOrEqual),
            ">" => Some(Self::GreaterThan),
            _ => None,
        }
    }

    /// Canonical spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Equal => "=",
            Self::GreaterOrEqual => ">=",
            Self::GreaterThan => ">",
        }
    }

    /// Characters an operator is spelled with
    pub fn is_operator_char(c: char) -> bool {
        matches!(c, '<' | '>' | '=')
    }

    /// Replace the legacy `=<` and `=>` spellings anywhere in `s`
    ///
    /// Used on atoms that are not decomposed, such as macro expansions.
    pub fn canonicalize_spellings(s: &str) -> String {
        s.replace("=<", "<=").replace("=>", ">=")
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
