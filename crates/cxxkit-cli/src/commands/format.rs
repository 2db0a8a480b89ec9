//! `cxxkit format` — clang-format over the source tree.
//!
//! Check mode runs the formatter in dry-run mode and lists non-conforming
//! files without touching them; apply mode rewrites files in place. Both
//! are strictly sequential, one child process at a time.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use cxxkit_exec::Invocation;

use crate::cli::FormatArgs;
use crate::config::KitConfig;
use crate::report;

pub async fn run(root: &Path, config: &KitConfig, args: &FormatArgs) -> Result<ExitCode> {
    let tool = &config.tools.clang_format;
    if which::which(tool).is_err() {
        report::fail(&format!("{tool} is not installed"));
        eprintln!(
            "install it with: brew install clang-format (macOS) or apt-get install clang-format (Ubuntu)"
        );
        return Ok(ExitCode::FAILURE);
    }

    let files = super::discover_sources(
        root,
        &config.discovery.extensions,
        &config.discovery.exclude_dirs,
    )
    .await;

    if files.is_empty() {
        println!("no C++ files found");
        return Ok(ExitCode::SUCCESS);
    }

    if args.check {
        check(root, tool, &files).await
    } else {
        apply(root, tool, &files).await
    }
}

async fn check(root: &Path, tool: &str, files: &[PathBuf]) -> Result<ExitCode> {
    println!("checking formatting for {} files\n", files.len());

    let mut needs_format = Vec::new();
    for file in files {
        let output = Invocation::new(tool)
            .args(["--dry-run", "--Werror"])
            .arg(file.display().to_string())
            .run()
            .await?;
        if !output.ok() {
            println!("{} {}", "✗".red(), relative(root, file).display());
            needs_format.push(file);
        }
    }

    if needs_format.is_empty() {
        println!();
        report::ok("all files are properly formatted");
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    report::fail(&format!("{} files need formatting:", needs_format.len()));
    for file in &needs_format {
        println!("  {}", relative(root, file).display());
    }
    println!("\n{}", "run 'cxxkit format' to fix them".yellow());
    Ok(ExitCode::FAILURE)
}

async fn apply(root: &Path, tool: &str, files: &[PathBuf]) -> Result<ExitCode> {
    println!("formatting {} C++ files\n", files.len());

    let mut errors = 0usize;
    for file in files {
        let output = Invocation::new(tool)
            .arg("-i")
            .arg(file.display().to_string())
            .run()
            .await?;
        if output.ok() {
            println!("{} {}", "✓".green(), relative(root, file).display());
        } else {
            // In-place rewrite only fails when the process itself errors.
            println!("{} {}", "✗".red(), relative(root, file).display());
            let stderr = output.stderr.trim();
            if !stderr.is_empty() {
                eprintln!("{stderr}");
            }
            errors += 1;
        }
    }

    println!();
    if errors == 0 {
        report::ok(&format!("{} files formatted", files.len()));
        Ok(ExitCode::SUCCESS)
    } else {
        report::fail(&format!("{errors} files could not be formatted"));
        Ok(ExitCode::FAILURE)
    }
}

fn relative<'a>(root: &Path, file: &'a Path) -> &'a Path {
    file.strip_prefix(root).unwrap_or(file)
}
