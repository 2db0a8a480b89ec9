//! Command-line surface of the `cxxkit` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cxxkit", version, about = "Developer tooling for the C++ SDK")]
pub struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure and build the SDK with CMake
    Build(BuildArgs),
    /// Check or rewrite source formatting with clang-format
    Format(FormatArgs),
    /// Run clang-tidy over the sources in parallel
    Lint(LintArgs),
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Build configuration
    #[arg(long, value_enum, default_value_t = BuildMode::Debug)]
    pub mode: BuildMode,

    /// Enable building tests
    #[arg(long)]
    pub tests: bool,

    /// Clean the build directory before building
    #[arg(long)]
    pub clean: bool,

    /// Enable verbose build output
    #[arg(long)]
    pub verbose: bool,

    /// Export compile_commands.json to the project root
    #[arg(long)]
    pub export_compile_commands: bool,

    /// Number of parallel build jobs (default: detected core count)
    #[arg(long)]
    pub jobs: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Check formatting without modifying files
    #[arg(long)]
    pub check: bool,
}

#[derive(clap::Args, Debug)]
pub struct LintArgs {
    /// Apply fixes automatically
    #[arg(long)]
    pub fix: bool,

    /// Number of parallel jobs (default: detected core count)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// The value passed to `-DCMAKE_BUILD_TYPE=`.
    pub fn cmake_value(self) -> &'static str {
        match self {
            BuildMode::Debug => "Debug",
            BuildMode::Release => "Release",
        }
    }

    /// Upper-case label for the configuration summary.
    pub fn label(self) -> &'static str {
        match self {
            BuildMode::Debug => "DEBUG",
            BuildMode::Release => "RELEASE",
        }
    }
}
