// src/dependencies/mod.rs

//! Dependency declaration values
//!
//! Values of `BuildRequires:`, `Requires:`, `Provides:` and friends are lists
//! of package names with optional version constraints. This module splits
//! such values into atoms and normalizes them:
//! - `foo >= 1.0, bar` becomes two values, `bar` and `foo >= 1.0`
//! - `foo=>1.0` becomes `foo >= 1.0`
//! - `glib2-devel` may become `pkgconfig(glib-2.0)` and friends, when the
//!   pkgconfig conversion table is enabled
//!
//! # Example
//!
//! ```ignore
//! use specfmt::dependencies::{parse_dependency_list, Atom};
//!
//! let atoms = parse_dependency_list("foo >= 1.0, bar");
//! assert_eq!(atoms.len(), 2);
//! assert_eq!(atoms[0].to_string(), "foo >= 1.0");
//! ```

mod ecosystem;
mod normalize;
mod operator;
mod parser;

pub use ecosystem::Ecosystem;
pub use normalize::{queries_package_manager, DependencyNormalizer};
pub use operator::Operator;
pub use parser::{parse_atom, parse_dependency_list, split_atoms, Atom, Dependency};
