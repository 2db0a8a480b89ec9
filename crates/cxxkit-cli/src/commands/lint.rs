//! `cxxkit lint` — clang-tidy over the sources under bounded concurrency.
//!
//! Preconditions are checked up front (tool on PATH, compile database
//! present); then every source file gets one clang-tidy invocation, fanned
//! out with at most `--jobs` children in flight. Failures accumulate and are
//! dumped after the run; one failing file never stops the others.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use cxxkit_exec::{run_bounded, Invocation, TaskReport};

use crate::cli::LintArgs;
use crate::config::KitConfig;
use crate::locate::{self, FsProbe};
use crate::report::{self, ConsoleProgress};

pub async fn run(root: &Path, config: &KitConfig, args: &LintArgs) -> Result<ExitCode> {
    let tool = &config.tools.clang_tidy;
    if which::which(tool).is_err() {
        report::fail(&format!("{tool} is not installed"));
        eprintln!("install it with: brew install llvm (macOS) or apt-get install clang-tidy (Ubuntu)");
        return Ok(ExitCode::FAILURE);
    }

    let Some(compile_db) = locate::compile_database(&FsProbe, root) else {
        report::fail("compile_commands.json not found");
        eprintln!("build the project first with:");
        eprintln!("  cxxkit build --export-compile-commands");
        eprintln!("or:");
        eprintln!("  cmake -B build -DCMAKE_EXPORT_COMPILE_COMMANDS=ON");
        eprintln!("  cmake --build build");
        return Ok(ExitCode::FAILURE);
    };

    let jobs = args.jobs.unwrap_or_else(|| config.default_jobs());
    println!("using compile commands: {}", compile_db.display());
    println!("running with {jobs} parallel jobs");

    let files = super::discover_sources(
        root,
        &config.discovery.source_extensions,
        &config.discovery.exclude_dirs,
    )
    .await;
    println!("found {} files to lint\n", files.len());

    if files.is_empty() {
        println!("no C++ files found to lint");
        return Ok(ExitCode::SUCCESS);
    }

    let extra_args = system_include_args().await;
    let progress = Arc::new(ConsoleProgress::new(root));

    let tool = tool.clone();
    let fix = args.fix;
    let reports = run_bounded(files, jobs, progress, move |file: PathBuf| {
        let mut invocation = Invocation::new(tool.as_str())
            .arg(format!("-p={}", compile_db.display()))
            .args(extra_args.iter().cloned());
        if fix {
            invocation = invocation.args(["--fix", "--fix-errors"]);
        }
        let invocation = invocation.arg(file.display().to_string());

        async move {
            match invocation.run().await {
                Ok(output) => {
                    let ok = output.ok();
                    let mut detail = output.stdout;
                    detail.push_str(&output.stderr);
                    TaskReport {
                        item: file,
                        ok,
                        detail,
                    }
                }
                Err(err) => TaskReport::failure(file, err.to_string()),
            }
        }
    })
    .await;

    let failed: Vec<&TaskReport<PathBuf>> = reports.iter().filter(|r| !r.ok).collect();

    if !failed.is_empty() {
        println!("\n{}", "issues found in the following files:".red());
        for entry in &failed {
            println!("\n{}", entry.item.display().to_string().yellow());
            let detail = entry.detail.trim();
            if !detail.is_empty() {
                println!("{detail}");
            }
        }
    }

    println!();
    if failed.is_empty() {
        if fix {
            report::ok("linting completed with fixes applied");
        } else {
            report::ok("no linting issues found");
        }
        Ok(ExitCode::SUCCESS)
    } else if fix {
        // A fix run that leaves diagnostics behind is still a failure; the
        // message distinguishes it from a plain lint failure.
        report::warn(&format!(
            "{} files could not be automatically fixed",
            failed.len()
        ));
        Ok(ExitCode::FAILURE)
    } else {
        report::fail(&format!(
            "linting issues found in {} files; run 'cxxkit lint --fix' to auto-fix some issues",
            failed.len()
        ));
        Ok(ExitCode::FAILURE)
    }
}

/// System include arguments for clang-tidy on macOS, derived from the
/// active Xcode installation. Best effort: any failure yields no extra
/// arguments.
#[cfg(target_os = "macos")]
async fn system_include_args() -> Vec<String> {
    let xcode_path = match Invocation::new("xcode-select").arg("-p").run().await {
        Ok(output) if output.ok() => PathBuf::from(output.stdout.trim()),
        _ => PathBuf::from("/Applications/Xcode.app/Contents/Developer"),
    };

    let sdk_path = xcode_path.join("Platforms/MacOSX.platform/Developer/SDKs/MacOSX.sdk");
    if !sdk_path.exists() {
        return Vec::new();
    }

    vec![
        format!("--extra-arg=-isystem{}/usr/include/c++/v1", sdk_path.display()),
        format!("--extra-arg=-isystem{}/usr/include", sdk_path.display()),
        format!(
            "--extra-arg=-isystem{}/Toolchains/XcodeDefault.xctoolchain/usr/include",
            xcode_path.display()
        ),
    ]
}

#[cfg(not(target_os = "macos"))]
async fn system_include_args() -> Vec<String> {
    Vec::new()
}
