// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use specfmt::{format_preamble_text, format_spec, FormatterConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Built-in configuration with a user TOML snippet layered on top.
pub fn config_with(toml: &str) -> FormatterConfig {
    FormatterConfig::from_toml_str(toml).unwrap()
}

/// Format `input` as a single preamble with the built-in configuration.
#[allow(dead_code)]
pub fn format(input: &str) -> String {
    format_with(input, "")
}

/// Format `input` as a single preamble with extra configuration.
pub fn format_with(input: &str, toml: &str) -> String {
    format_preamble_text(input, &config_with(toml)).unwrap()
}

/// Format a whole spec file with extra configuration.
#[allow(dead_code)]
pub fn format_spec_with(input: &str, toml: &str) -> String {
    format_spec(input, &config_with(toml)).unwrap()
}

/// Output lines of a single preamble.
#[allow(dead_code)]
pub fn lines(input: &str) -> Vec<String> {
    format(input).lines().map(str::to_string).collect()
}

/// Write a spec file into a fresh temporary directory.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
#[allow(dead_code)]
pub fn write_spec(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

/// A preamble touching most declaration kinds.
#[allow(dead_code)]
pub const SAMPLE_PREAMBLE: &str = r#"# Main comment
Name:           foo
Version:        1.0
Release:        1
Summary:        A test package
Summary(de):    Ein Testpaket
License:        GPLv2+ and MIT License
Group:          Development/Libraries
Url:            https://example.org
Source:         foo-%{version}.tar.gz
Source1:        foo.changes
Patch:          fix.patch
Patch1:         other.patch
BuildRoot:      %{_tmppath}/%{name}-%{version}-build
%define major 1
%bcond_without tests
BuildRequires:  zlib-devel, openssl-devel >= 1.1
# needed at runtime
Requires:       bar =< 2
Requires(post): coreutils
PreReq:         sed
Provides:       foo-libs = %{version}
Obsoletes:      foo-libs < %{version}
%if 0%{?suse_version}
BuildRequires:  suse-macros
%else
BuildRequires:  fedora-macros
%endif
%if %{with tests}
%define testflags --all
%endif
Vendor:         Acme
BuildArch:      noarch
%systemd_requires
"#;
