//! cxxkit: developer tooling for the C++ SDK.
//!
//! One binary, three subcommands:
//!
//! - `cxxkit build`  — CMake configure + build with vcpkg toolchain lookup
//! - `cxxkit format` — clang-format check/apply over the source tree
//! - `cxxkit lint`   — clang-tidy over the sources under bounded concurrency
//!
//! The heavy lifting lives in `cxxkit-walk` (discovery) and `cxxkit-exec`
//! (subprocess invocation and fan-out); this crate is the argument surface,
//! the tool/artifact resolvers, and the console reporting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod locate;
pub mod report;
