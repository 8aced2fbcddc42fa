// src/dependencies/ecosystem.rs

//! Capability ecosystems used when rewriting bare package names
//!
//! A bare package name such as `glib2-devel` can usually be expressed as an
//! ecosystem-qualified capability instead (`pkgconfig(glib-2.0)`). Each
//! ecosystem has its own conversion table; the tables are consulted in the
//! fixed priority order returned by [`Ecosystem::all`].

use std::fmt;

/// Ecosystems with name conversion tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    /// pkg-config module
    /// Format: pkgconfig(name)
    /// Example: pkgconfig(zlib)
    PkgConfig,

    /// Perl module
    /// Format: perl(Module::Name)
    /// Example: perl(Test::More)
    Perl,

    /// TeX package
    /// Format: tex(file.sty)
    /// Example: tex(hyperref.sty)
    Tex,

    /// CMake package
    /// Format: cmake(name)
    /// Example: cmake(Qt5Core)
    CMake,
}

impl Ecosystem {
    /// Get the capability prefix for this ecosystem
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::PkgConfig => "pkgconfig",
            Self::Perl => "perl",
            Self::Tex => "tex",
            Self::CMake => "cmake",
        }
    }

    /// All ecosystems, in rewrite priority order (first match wins)
    pub fn all() -> &'static [Ecosystem] {
        &[Self::PkgConfig, Self::Perl, Self::Tex, Self::CMake]
    }

    /// Wrap a name into this ecosystem's capability syntax
    pub fn capability(&self, name: &str) -> String {
        format!("{}({})", self.prefix(), name)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(
            Ecosystem::all(),
            &[
                Ecosystem::PkgConfig,
                Ecosystem::Perl,
                Ecosystem::Tex,
                Ecosystem::CMake
            ]
        );
    }

    #[test]
    fn test_prefix() {
        assert_eq!(Ecosystem::PkgConfig.prefix(), "pkgconfig");
        assert_eq!(Ecosystem::Tex.prefix(), "tex");
    }

    #[test]
    fn test_capability() {
        assert_eq!(Ecosystem::CMake.capability("Qt5Core"), "cmake(Qt5Core)");
        assert_eq!(Ecosystem::Perl.to_string(), "perl");
    }
}
