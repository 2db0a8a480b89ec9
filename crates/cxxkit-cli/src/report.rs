//! Console status reporting.
//!
//! Thin helpers over `colored` plus the console `Progress` implementation
//! the lint fan-out renders through. Anything that needs to be testable
//! takes a `Progress` instead of printing directly.

use std::path::{Path, PathBuf};

use colored::Colorize;
use cxxkit_exec::{Progress, TaskReport};

/// `✓ message`
pub fn ok(message: &str) {
    println!("{} {message}", "✓".green());
}

/// `⚠ message`
pub fn warn(message: &str) {
    println!("{} {message}", "⚠".yellow());
}

/// `✗ message` on stderr.
pub fn fail(message: &str) {
    eprintln!("{} {message}", "✗".red());
}

/// Dimmed echo of a command line before it runs.
pub fn running(command_line: &str) {
    println!("{} {}", "running:".dimmed(), command_line.cyan());
}

/// Per-file ✓/✗ lines in completion order, with a running count.
///
/// Paths are shown relative to the project root when possible.
pub struct ConsoleProgress {
    root: PathBuf,
}

impl ConsoleProgress {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

impl Progress<PathBuf> for ConsoleProgress {
    fn on_complete(&self, completed: usize, total: usize, report: &TaskReport<PathBuf>) {
        let mark = if report.ok {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "{mark} {} {}",
            self.display_path(&report.item),
            format!("({completed}/{total})").dimmed()
        );
    }
}
