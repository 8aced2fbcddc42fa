// src/dependencies/normalize.rs

//! Rewriting of dependency list values into canonical atoms
//!
//! Steps, in order:
//! 1. Values querying the package manager (`%(rpm -q ...)`) are left alone
//! 2. The value is split into atoms, operators respaced and canonicalized
//! 3. pkg-config self references become the bare `pkgconfig` capability
//! 4. Bare names are rewritten through the enabled ecosystem tables
//!    (pkgconfig, perl, tex, cmake; first match wins)
//! 5. The resulting strings are sorted

use super::ecosystem::Ecosystem;
use super::parser::{parse_dependency_list, Atom, Dependency};
use crate::config::FormatterConfig;
use regex::Regex;
use std::sync::LazyLock;

/// Matches macro expansions that run rpm itself
static RPM_QUERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\(\s*(?:echo\s+`)?rpm\s").unwrap());

/// Names that refer to pkg-config itself
const PKGCONFIG_ALIASES: &[&str] = &["pkgconfig(pkg-config)", "pkg-config"];

/// Whether a value contains a package manager query
pub fn queries_package_manager(value: &str) -> bool {
    RPM_QUERY_RE.is_match(value)
}

/// Applies name rewriting and ordering to dependency list values
pub struct DependencyNormalizer<'a> {
    config: &'a FormatterConfig,
}

impl<'a> DependencyNormalizer<'a> {
    pub fn new(config: &'a FormatterConfig) -> Self {
        Self { config }
    }

    /// Normalize one declaration value into one or more sorted values
    ///
    /// `rewrite_names` is false for scriptlet requirements, whose names are
    /// kept as written.
    pub fn normalize(&self, value: &str, rewrite_names: bool) -> Vec<String> {
        if queries_package_manager(value) {
            return vec![value.to_string()];
        }

        let mut expanded = Vec::new();
        for atom in parse_dependency_list(value) {
            match atom {
                Atom::Opaque(raw) => expanded.push(raw),
                Atom::Dependency(dep) => {
                    let dep = unify_pkgconfig(dep);
                    if rewrite_names {
                        expanded.extend(self.rewrite(&dep));
                    } else {
                        expanded.push(dep.to_string());
                    }
                }
            }
        }

        expanded.sort();
        expanded
    }

    /// Rewrite a bare name through the first matching enabled table
    fn rewrite(&self, dep: &Dependency) -> Vec<String> {
        if dep.name == Ecosystem::PkgConfig.prefix() {
            return vec![dep.to_string()];
        }

        for ecosystem in Ecosystem::all() {
            if !self.config.rewrites(*ecosystem) {
                continue;
            }
            if let Some(names) = self.config.conversions.lookup(*ecosystem, &dep.name) {
                return names
                    .into_iter()
                    .map(|name| dep.renamed(ecosystem.capability(name)).to_string())
                    .collect();
            }
        }

        vec![dep.to_string()]
    }
}

/// Map pkg-config self references to the bare `pkgconfig` capability
fn unify_pkgconfig(dep: Dependency) -> Dependency {
    if PKGCONFIG_ALIASES.contains(&dep.name.as_str()) {
        dep.renamed(Ecosystem::PkgConfig.prefix())
    } else {
        dep
    }
}
