// tests/preamble.rs
//! Integration tests for preamble formatting
//!
//! These tests feed complete preambles through the public API and check:
//! - Canonical category order and `Key: value` rendering
//! - Comments staying attached to the declaration below them
//! - Dependency splitting, operator spelling and sorting
//! - Conditional hoisting and dead code removal
//! - Idempotence of the whole transformation

mod common;

use common::{config_with, format, format_with, lines, SAMPLE_PREAMBLE};
use specfmt::{format_preamble, format_preamble_text, Error, FormatterConfig, Preamble};

// =============================================================================
// CANONICAL OUTPUT
// =============================================================================

#[test]
fn test_sample_preamble() {
    let expected = r#"%define major 1
%bcond_without tests
%if %{with tests}
%define testflags --all
%endif
# Main comment
Name: foo
Version: 1.0
Release: 0
Summary: A test package
Summary(de): Ein Testpaket
License: GPL-2.0-or-later AND MIT
# FIXME: use correct group, see "https://en.opensuse.org/openSUSE:Package_group_guidelines"
Group: Development/Libraries
URL: https://example.org
Source0: foo-%{version}.tar.gz
Source1: foo.changes
Patch0: fix.patch
Patch1: other.patch
%if 0%{?suse_version}
BuildRequires: suse-macros
%else
BuildRequires: fedora-macros
%endif
BuildRequires: openssl-devel >= 1.1
BuildRequires: zlib-devel
# needed at runtime
Requires: bar <= 2
Requires(pre): sed
Requires(post): coreutils
Provides: foo-libs = %{version}
Obsoletes: foo-libs < %{version}
BuildRoot: %{_tmppath}/%{name}-%{version}-build
BuildArch: noarch
%systemd_requires
"#;
    assert_eq!(format(SAMPLE_PREAMBLE), expected);
}

#[test]
fn test_sample_preamble_aligned() {
    let output = format_with(SAMPLE_PREAMBLE, "align_column = 16");
    assert!(output.contains("\nName:           foo\n"));
    assert!(output.contains("\nBuildRequires:  zlib-devel\n"));
    assert!(output.contains("\nRequires(post): coreutils\n"));
    assert!(output.contains("\nBuildRoot:      %{_tmppath}/%{name}-%{version}-build\n"));
}

#[test]
fn test_spec_examples() {
    assert_eq!(
        lines("BuildRequires: foo >= 1.0, bar"),
        vec!["BuildRequires: bar", "BuildRequires: foo >= 1.0"]
    );
    assert_eq!(lines("Patch: fix.patch"), vec!["Patch0: fix.patch"]);
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[test]
fn test_idempotent_default() {
    let once = format(SAMPLE_PREAMBLE);
    assert_eq!(format(&once), once);
}

#[test]
fn test_idempotent_all_options() {
    let options = r#"
keep_space = true
pkgconfig = true
perl = true
cmake = true
tex = true
align_column = 16
"#;
    let input = format!("{}\n\n# trailing note\nBuildRequires: extra-cmake-modules\n", SAMPLE_PREAMBLE);
    let once = format_with(&input, options);
    assert_eq!(format_with(&once, options), once);
}

#[test]
fn test_idempotent_kept_blank_moved_to_front() {
    let once = format_with("Requires: b\n\nName: a\n", "keep_space = true");
    assert_eq!(once, "Name: a\nRequires: b\n");
    assert_eq!(format_with(&once, "keep_space = true"), once);
}

#[test]
fn test_idempotent_minimal() {
    let once = format_with(SAMPLE_PREAMBLE, "minimal = true");
    assert!(!once.contains("FIXME"));
    assert_eq!(format_with(&once, "minimal = true"), once);
}

// =============================================================================
// COMMENTS
// =============================================================================

#[test]
fn test_comment_follows_declaration() {
    assert_eq!(
        lines("Requires: zzz\n# explains build dep\nBuildRequires: aaa\nName: foo"),
        vec!["Name: foo", "# explains build dep", "BuildRequires: aaa", "Requires: zzz"]
    );
}

#[test]
fn test_multiple_comments_stay_together() {
    assert_eq!(
        lines("Requires: a\n# one\n# two\nName: foo"),
        vec!["# one", "# two", "Name: foo", "Requires: a"]
    );
}

#[test]
fn test_comment_on_split_line_goes_to_first_value() {
    assert_eq!(
        lines("# both of them\nRequires: zzz, aaa"),
        vec!["# both of them", "Requires: aaa", "Requires: zzz"]
    );
}

#[test]
fn test_comment_on_empty_declaration_stays() {
    assert_eq!(
        lines("# about requires\nRequires:\nName: foo"),
        vec!["Name: foo", "# about requires", "Requires:"]
    );
}

#[test]
fn test_comment_on_dropped_declaration_dropped() {
    assert_eq!(lines("# old vendor\nVendor: Acme\nName: foo"), vec!["Name: foo"]);
}

#[test]
fn test_trailing_comment_kept() {
    assert_eq!(lines("Name: foo\n# the end"), vec!["Name: foo", "# the end"]);
}

// =============================================================================
// DEPENDENCIES
// =============================================================================

#[test]
fn test_dependency_sort() {
    assert_eq!(
        lines("BuildRequires: zlib-devel c-dev, b-dev a-dev"),
        vec![
            "BuildRequires: a-dev",
            "BuildRequires: b-dev",
            "BuildRequires: c-dev",
            "BuildRequires: zlib-devel",
        ]
    );
}

#[test]
fn test_operator_canonicalization() {
    assert_eq!(
        lines("Requires: foo =< 1.0, bar=>2\nConflicts: baz=<3"),
        vec!["Requires: bar >= 2", "Requires: foo <= 1.0", "Conflicts: baz <= 3"]
    );
}

#[test]
fn test_operator_canonicalization_in_macros() {
    assert_eq!(
        lines("Requires: %{name}-libs => %{version}"),
        vec!["Requires: %{name}-libs >= %{version}"]
    );
}

#[test]
fn test_macros_and_rich_dependencies_untouched() {
    assert_eq!(
        lines("Requires: (foo or bar), %{name}-libs%{?_isa} = %{version}"),
        vec!["Requires: %{name}-libs%{?_isa} = %{version}", "Requires: (foo or bar)"]
    );
}

#[test]
fn test_pkgconfig_rewrite_adds_pkgconfig() {
    let output = format_with("BuildRequires: zlib-devel\nName: foo", "pkgconfig = true");
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec!["Name: foo", "BuildRequires: pkgconfig(zlib)", "BuildRequires: pkgconfig"]
    );
}

#[test]
fn test_pkgconfig_not_added_twice() {
    let output = format_with(
        "BuildRequires: pkg-config\nBuildRequires: zlib-devel",
        "pkgconfig = true",
    );
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec!["BuildRequires: pkgconfig", "BuildRequires: pkgconfig(zlib)"]
    );
}

#[test]
fn test_pkgconfig_not_added_in_minimal_mode() {
    let output = format_with("BuildRequires: zlib-devel", "pkgconfig = true\nminimal = true");
    assert_eq!(output, "BuildRequires: pkgconfig(zlib)");
}

#[test]
fn test_scriptlet_requires_keep_names() {
    let output = format_with("Requires(post): zlib-devel\nPreReq: zlib-devel", "pkgconfig = true");
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec!["Requires(pre): zlib-devel", "Requires(post): zlib-devel"]
    );
}

#[test]
fn test_rpm_query_passes_through_with_fixme() {
    assert_eq!(
        lines("Requires: kernel = %(echo `rpm -q --qf '%%{VERSION}' kernel`)"),
        vec![
            "# FIXME: Use %requires_eq macro instead",
            "Requires: kernel = %(echo `rpm -q --qf '%%{VERSION}' kernel`)",
        ]
    );
    let output = format_with(
        "Requires: kernel = %(rpm -q --qf '%%{VERSION}' kernel)",
        "minimal = true",
    );
    assert!(!output.contains("FIXME"));
}

// =============================================================================
// DECLARATIONS
// =============================================================================

#[test]
fn test_buildroot_dedup() {
    let output = lines("BuildRoot: /var/tmp/a\nName: foo\nBuildRoot: %{_tmppath}/b");
    let buildroots: Vec<_> = output.iter().filter(|l| l.starts_with("BuildRoot:")).collect();
    assert_eq!(buildroots, vec!["BuildRoot: %{_tmppath}/%{name}-%{version}-build"]);
}

#[test]
fn test_license_fixed() {
    assert_eq!(
        lines("License: ( GPLv2+ or MIT License ) and BSD-3-Clause"),
        vec!["License: (GPL-2.0-or-later OR MIT) AND BSD-3-Clause"]
    );
}

#[test]
fn test_deprecated_tags_dropped() {
    assert_eq!(
        lines("Name: foo\nEpoch: 1\nIcon: foo.xpm\nCopyright: GPL\nPrefix: /usr\n%debug_package"),
        vec!["Name: foo"]
    );
}

#[test]
fn test_bcond_declarations_first() {
    assert_eq!(
        lines("Name: foo\n%bcond_with docs\n%global flavor bar"),
        vec!["%global flavor bar", "%bcond_with docs", "Name: foo"]
    );
}

#[test]
fn test_keep_space_collapses_blank_runs() {
    let input = "\nName: foo\n\n\n# group comment\nVersion: 1.0\n\nBuildRequires: bar\n\n";
    let output = format_with(input, "keep_space = true");
    assert_eq!(output, "Name: foo\n\n# group comment\nVersion: 1.0\n\nBuildRequires: bar\n");
    assert_eq!(format_with(&output, "keep_space = true"), output);
}

#[test]
fn test_blank_lines_dropped_by_default() {
    assert_eq!(lines("Name: foo\n\n\nVersion: 1"), vec!["Name: foo", "Version: 1"]);
}

// =============================================================================
// CONDITIONALS
// =============================================================================

#[test]
fn test_define_block_hoisted_before_build_conditions() {
    let input = "\
%if 0%{?suse_version}
BuildRequires: suse-macros
%endif
%if 0%{?with_foo}
%define x 1
%endif
Name: foo";
    assert_eq!(
        lines(input),
        vec![
            "%if 0%{?with_foo}",
            "%define x 1",
            "%endif",
            "Name: foo",
            "%if 0%{?suse_version}",
            "BuildRequires: suse-macros",
            "%endif",
        ]
    );
}

#[test]
fn test_bcond_block_after_bcond_declarations() {
    assert_eq!(
        lines("Name: foo\n%if %{with docs}\n%define x 1\n%endif\n%bcond_with docs"),
        vec!["%bcond_with docs", "%if %{with docs}", "%define x 1", "%endif", "Name: foo"]
    );
}

#[test]
fn test_conditional_contents_reordered_inside() {
    assert_eq!(
        lines("%if 1\nRequires: zzz, aaa\nName: foo\n%endif"),
        vec!["%if 1", "Name: foo", "Requires: aaa", "Requires: zzz", "%endif"]
    );
}

#[test]
fn test_nested_conditionals() {
    let input = "\
%if 1
Requires: a
%ifarch x86_64
Requires: b
%else
Requires: c
%endif
%endif";
    assert_eq!(
        lines(input),
        vec![
            "%if 1",
            "Requires: a",
            "%ifarch x86_64",
            "Requires: b",
            "%else",
            "Requires: c",
            "%endif",
            "%endif",
        ]
    );
}

#[test]
fn test_elif_branches() {
    assert_eq!(
        lines("%if 1\nRequires: a\n%elif 2\nRequires: b\n%endif"),
        vec!["%if 1", "Requires: a", "%elif 2", "Requires: b", "%endif"]
    );
}

#[test]
fn test_ppc64_block_elided() {
    let input = "Name: foo\n%ifarch ppc64\n# bug437293\nObsoletes: foo-64bit\n%endif";
    assert_eq!(lines(input), vec!["Name: foo"]);
}

#[test]
fn test_ppc64_block_with_leading_marker_elided() {
    let input = "Name: foo\n# bug437293\n%ifarch ppc64\nObsoletes: foo-64bit\n%endif";
    assert_eq!(lines(input), vec!["Name: foo"]);
}

#[test]
fn test_ppc64_block_kept_in_minimal_mode() {
    let input = "Name: foo\n%ifarch ppc64\n# bug437293\nObsoletes: foo-64bit\n%endif";
    assert_eq!(
        format_with(input, "minimal = true").lines().collect::<Vec<_>>(),
        vec!["Name: foo", "%ifarch ppc64", "# bug437293", "Obsoletes: foo-64bit", "%endif"]
    );
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_endif_without_if() {
    let config = FormatterConfig::builtin().unwrap();
    let err = format_preamble_text("Name: foo\n%endif\n", &config).unwrap_err();
    match err {
        Error::UnbalancedConditional { line, directive } => {
            assert_eq!(line, 2);
            assert_eq!(directive, "%endif");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_else_without_if() {
    let config = FormatterConfig::builtin().unwrap();
    assert!(matches!(
        format_preamble(["%else"], &config),
        Err(Error::UnbalancedConditional { line: 1, .. })
    ));
}

#[test]
fn test_unterminated_conditional() {
    let config = FormatterConfig::builtin().unwrap();
    assert!(matches!(
        format_preamble(["%if 1", "%if 2", "Name: foo", "%endif"], &config),
        Err(Error::UnterminatedConditional { depth: 1 })
    ));
}

#[test]
fn test_line_by_line_api() {
    let config = config_with("subpkglicense = true");
    let mut preamble = Preamble::subpackage(&config, Some("MIT"));
    preamble.add_line("Summary: Development files").unwrap();
    preamble.add_line("Requires: foo = %{version}").unwrap();
    assert_eq!(
        preamble.finish().unwrap(),
        vec!["Summary: Development files", "License: MIT", "Requires: foo = %{version}"]
    );
}
