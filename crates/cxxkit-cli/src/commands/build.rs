//! `cxxkit build` — CMake configure + build orchestration.
//!
//! Two sequential child invocations (configure, then build), with an
//! optional clean step before and an optional compile-database export step
//! after. The first failing step aborts the run and its exit code becomes
//! the process exit code.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use cxxkit_exec::Invocation;

use crate::cli::BuildArgs;
use crate::config::KitConfig;
use crate::locate::{self, FsProbe};
use crate::report;

pub async fn run(root: &Path, config: &KitConfig, args: &BuildArgs) -> Result<ExitCode> {
    let build_dir = root.join("build");
    let jobs = args.jobs.unwrap_or_else(|| config.default_jobs());

    print_configuration(root, &build_dir, args, jobs);

    if args.clean && build_dir.exists() {
        std::fs::remove_dir_all(&build_dir)
            .with_context(|| format!("failed to clean {}", build_dir.display()))?;
        report::ok("build directory cleaned");
    }
    std::fs::create_dir_all(&build_dir)
        .with_context(|| format!("failed to create {}", build_dir.display()))?;

    let toolchain = resolve_toolchain(root);
    match &toolchain {
        Some(path) => report::ok(&format!("using vcpkg toolchain: {}", path.display())),
        None => {
            report::warn("vcpkg toolchain not found; dependencies may not be available");
            println!(
                "{}",
                "install vcpkg and set VCPKG_ROOT, or place it in a standard location".dimmed()
            );
        }
    }
    println!();

    // Configure.
    let mut configure = Invocation::new(config.tools.cmake.as_str())
        .arg(root.display().to_string())
        .arg(format!("-DCMAKE_BUILD_TYPE={}", args.mode.cmake_value()));
    if let Some(toolchain) = &toolchain {
        configure = configure.arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
    }
    if args.export_compile_commands {
        configure = configure.arg("-DCMAKE_EXPORT_COMPILE_COMMANDS=ON");
    }
    configure = configure
        .arg(format!(
            "-DBUILD_TESTS={}",
            if args.tests { "ON" } else { "OFF" }
        ))
        .arg("-DBUILD_EXAMPLES=ON")
        .current_dir(&build_dir);

    if let Some(exit) = run_step(&configure).await? {
        return Ok(exit);
    }
    report::ok("CMake configuration completed");

    // Build.
    let mut build = Invocation::new(config.tools.cmake.as_str()).args(["--build", "."]);
    if args.verbose {
        build = build.arg("--verbose");
    }
    build = build
        .args(["--parallel", &jobs.to_string()])
        .current_dir(&build_dir);

    if let Some(exit) = run_step(&build).await? {
        return Ok(exit);
    }
    report::ok("build completed successfully");

    if args.export_compile_commands {
        export_compile_database(root, &build_dir)?;
    }

    print_results(&build_dir, args);
    Ok(ExitCode::SUCCESS)
}

/// Echo and run one sequential step. `Some(exit)` means the step failed and
/// the run must stop with that exit code; captured output has already been
/// surfaced.
async fn run_step(invocation: &Invocation) -> Result<Option<ExitCode>> {
    report::running(&invocation.command_line());

    let output = invocation.run().await?;
    if output.ok() {
        let stdout = output.stdout.trim();
        if !stdout.is_empty() {
            println!("{}", stdout.dimmed());
        }
        return Ok(None);
    }

    report::fail(&format!(
        "{} exited with code {}",
        invocation.program(),
        output.code
    ));
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        eprintln!("{stderr}");
    }
    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        eprintln!("{stdout}");
    }
    Ok(Some(super::propagate_exit(output.code)))
}

/// Resolve the vcpkg toolchain from the fixed locations, then $VCPKG_ROOT.
fn resolve_toolchain(root: &Path) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let vcpkg_root = std::env::var_os("VCPKG_ROOT").map(PathBuf::from);
    locate::vcpkg_toolchain(&FsProbe, root, home.as_deref(), vcpkg_root.as_deref())
}

/// Copy `compile_commands.json` from the build tree to the project root,
/// warning (non-fatally) if the build didn't produce one.
fn export_compile_database(root: &Path, build_dir: &Path) -> Result<()> {
    let source = build_dir.join("compile_commands.json");
    let target = root.join("compile_commands.json");

    if source.exists() {
        std::fs::copy(&source, &target)
            .with_context(|| format!("failed to copy {}", source.display()))?;
        report::ok(&format!("exported compile commands to {}", target.display()));
    } else {
        report::warn("compile_commands.json was not generated");
    }
    Ok(())
}

fn print_configuration(root: &Path, build_dir: &Path, args: &BuildArgs, jobs: usize) {
    let flag = |on: bool| if on { "yes" } else { "no" };

    println!("{}", "build configuration".bold());
    println!("  {:<24} {}", "project root", root.display());
    println!("  {:<24} {}", "build directory", build_dir.display());
    println!("  {:<24} {}", "build mode", args.mode.label());
    println!("  {:<24} {}", "with tests", flag(args.tests));
    println!("  {:<24} {}", "clean build", flag(args.clean));
    println!(
        "  {:<24} {}",
        "export compile commands",
        flag(args.export_compile_commands)
    );
    println!("  {:<24} {jobs}", "parallel jobs");
    println!();
}

fn print_results(build_dir: &Path, args: &BuildArgs) {
    println!();
    println!("{}", "built targets".bold());
    println!("  library:  {}", build_dir.join("libai-sdk-cpp.a").display());
    println!("  examples: {}", build_dir.join("examples").display());
    if args.tests {
        println!("  tests:    {}", build_dir.join("tests").display());
        println!();
        println!("{}", "run the tests with: cd build && ctest".dimmed());
    }
}
