// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue).help(help)
}

/// Options shared by `format` and `check`
fn format_args() -> Vec<Arg> {
    vec![
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("PATH")
            .help("Configuration file (default: ~/.config/specfmt/specfmt.toml)"),
        Arg::new("minimal")
            .short('m')
            .long("minimal")
            .action(ArgAction::SetTrue)
            .help("Only reorder and respace; no FIXME comments, no dead code removal"),
        flag("keep-space", "Keep single blank lines between declarations"),
        flag("subpkg-license", "Keep License lines of subpackages"),
        flag("pkgconfig", "Rewrite -devel names to pkgconfig() capabilities"),
        flag("perl", "Rewrite names to perl() capabilities"),
        flag("cmake", "Rewrite names to cmake() capabilities"),
        flag("tex", "Rewrite names to tex() capabilities"),
        Arg::new("align")
            .long("align")
            .value_name("COL")
            .help("Align values at this column (16 gives the classic layout)"),
        flag("preamble-only", "Treat the whole input as one preamble, without section splitting"),
    ]
}

fn build_cli() -> Command {
    Command::new("specfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Conary Contributors")
        .about("Normalize the preamble of RPM spec files")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("format")
                .about("Format spec files (stdin when no file is given)")
                .arg(Arg::new("files").num_args(0..).help("Spec files to format"))
                .arg(
                    Arg::new("inplace")
                        .short('i')
                        .long("inplace")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite files in place"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Write the result to this file (single input only)"),
                )
                .arg(
                    Arg::new("diff")
                        .short('d')
                        .long("diff")
                        .action(ArgAction::SetTrue)
                        .help("Print a unified diff instead of the formatted file"),
                )
                .args(format_args()),
        )
        .subcommand(
            Command::new("check")
                .about("Exit non-zero if any file is not already formatted")
                .arg(Arg::new("files").num_args(1..).required(true).help("Spec files to check"))
                .args(format_args()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("specfmt.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
