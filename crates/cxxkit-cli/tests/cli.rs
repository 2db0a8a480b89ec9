//! End-to-end tests for the cxxkit binary.
//!
//! External tools (cmake, clang-format, clang-tidy) are replaced with shell
//! stubs on a private PATH, so these tests exercise argument assembly, exit
//! codes, and console output without the real toolchain.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// A throwaway C++ project tree: two sources, one header.
fn setup_project() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let root = dir.path().to_path_buf();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("include/sdk")).unwrap();
    fs::write(root.join("src/client.cpp"), "int main() { return 0; }\n").unwrap();
    fs::write(root.join("src/transport.cc"), "void transport() {}\n").unwrap();
    fs::write(root.join("include/sdk/client.h"), "#pragma once\n").unwrap();

    (dir, root)
}

/// A private PATH directory for stub tools.
fn setup_bin() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let bin = dir.path().to_path_buf();
    (dir, bin)
}

fn write_stub(bin: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn cxxkit(root: &Path, bin: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cxxkit").unwrap();
    cmd.arg("--root").arg(root).env("PATH", bin);
    cmd
}

// ----------------------------------------------------------------------------
// format
// ----------------------------------------------------------------------------

#[test]
fn format_check_passes_on_clean_tree() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "clang-format", "exit 0");

    cxxkit(&root, &bin)
        .args(["format", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("all files are properly formatted"));
}

#[test]
fn format_check_lists_nonconforming_files_and_exits_one() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(
        &bin,
        "clang-format",
        r#"case "$*" in *client.cpp*) exit 1 ;; esac
exit 0"#,
    );

    cxxkit(&root, &bin)
        .args(["format", "--check"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("client.cpp"))
        .stdout(predicate::str::contains("1 files need formatting"));
}

#[test]
fn format_apply_reports_rewritten_count() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "clang-format", "exit 0");

    cxxkit(&root, &bin)
        .arg("format")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files formatted"));
}

#[test]
fn format_missing_tool_is_fatal_with_guidance() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();

    cxxkit(&root, &bin)
        .args(["format", "--check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clang-format is not installed"))
        .stderr(predicate::str::contains("install it with"));
}

#[test]
fn format_never_touches_excluded_directories() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();

    // Files under excluded directories would fail the check; the run only
    // passes if the walker never hands them to the formatter.
    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/generated.cpp"), "int g;\n").unwrap();
    fs::create_dir_all(root.join("vcpkg_installed/x64")).unwrap();
    fs::write(root.join("vcpkg_installed/x64/dep.h"), "#pragma once\n").unwrap();

    write_stub(
        &bin,
        "clang-format",
        r#"case "$*" in *generated.cpp*|*dep.h*) exit 1 ;; esac
exit 0"#,
    );

    cxxkit(&root, &bin).args(["format", "--check"]).assert().success();
}

// ----------------------------------------------------------------------------
// lint
// ----------------------------------------------------------------------------

fn setup_compile_db(root: &Path) {
    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/compile_commands.json"), "[]\n").unwrap();
}

#[test]
fn lint_requires_a_compile_database() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "clang-tidy", "exit 0");

    cxxkit(&root, &bin)
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("compile_commands.json not found"))
        .stderr(predicate::str::contains("cmake -B build"));
}

#[test]
fn lint_requires_the_tool_on_path() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    setup_compile_db(&root);

    cxxkit(&root, &bin)
        .arg("lint")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clang-tidy is not installed"));
}

#[test]
fn lint_passes_when_every_file_is_clean() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    setup_compile_db(&root);
    write_stub(&bin, "clang-tidy", "exit 0");

    cxxkit(&root, &bin)
        .args(["lint", "-j", "2"])
        .assert()
        .success()
        // Only .cc/.cpp/.cxx sources are linted, not headers.
        .stdout(predicate::str::contains("found 2 files to lint"))
        .stdout(predicate::str::contains("no linting issues found"));
}

#[test]
fn lint_aggregates_failures_without_stopping_siblings() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    setup_compile_db(&root);
    write_stub(
        &bin,
        "clang-tidy",
        r#"case "$*" in *transport.cc*) echo "warning: bad thing" ; exit 1 ;; esac
exit 0"#,
    );

    cxxkit(&root, &bin)
        .arg("lint")
        .assert()
        .code(1)
        // Both files completed despite one failure.
        .stdout(predicate::str::contains("(2/2)"))
        .stdout(predicate::str::contains("issues found in the following files:"))
        .stdout(predicate::str::contains("transport.cc"))
        .stdout(predicate::str::contains("warning: bad thing"))
        .stdout(predicate::str::contains("linting issues found in 1 files"));
}

#[test]
fn lint_fix_with_residual_failures_is_still_a_failure() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    setup_compile_db(&root);
    write_stub(
        &bin,
        "clang-tidy",
        r#"case "$*" in *transport.cc*) exit 1 ;; esac
exit 0"#,
    );

    cxxkit(&root, &bin)
        .args(["lint", "--fix"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1 files could not be automatically fixed"));
}

// ----------------------------------------------------------------------------
// build
// ----------------------------------------------------------------------------

/// A cmake stub that appends each invocation's arguments to a log file.
fn write_logging_cmake(bin: &Path, extra: &str) {
    write_stub(
        bin,
        "cmake",
        &format!("echo \"$*\" >> \"$CXXKIT_TEST_LOG\"\n{extra}\nexit 0"),
    );
}

#[test]
fn build_runs_configure_then_build_with_expected_arguments() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    let log = root.join("cmake.log");
    write_logging_cmake(&bin, "");

    cxxkit(&root, &bin)
        .env("CXXKIT_TEST_LOG", &log)
        .args(["build", "--jobs", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build completed successfully"));

    let log = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2, "expected configure + build, got: {log}");

    assert!(lines[0].contains("-DCMAKE_BUILD_TYPE=Debug"));
    assert!(lines[0].contains("-DBUILD_TESTS=OFF"));
    assert!(lines[0].contains("-DBUILD_EXAMPLES=ON"));

    assert!(lines[1].contains("--build ."));
    assert!(lines[1].contains("--parallel 3"));
}

#[test]
fn build_release_with_tests_flips_the_cmake_defines() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    let log = root.join("cmake.log");
    write_logging_cmake(&bin, "");

    cxxkit(&root, &bin)
        .env("CXXKIT_TEST_LOG", &log)
        .args(["build", "--mode", "release", "--tests", "--verbose"])
        .assert()
        .success();

    let log = fs::read_to_string(&log).unwrap();
    assert!(log.contains("-DCMAKE_BUILD_TYPE=Release"));
    assert!(log.contains("-DBUILD_TESTS=ON"));
    assert!(log.contains("--verbose"));
}

#[test]
fn build_clean_removes_the_build_directory_first() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "cmake", "exit 0");

    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/stale.txt"), "old").unwrap();

    cxxkit(&root, &bin)
        .args(["build", "--clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build directory cleaned"));

    assert!(!root.join("build/stale.txt").exists());
    assert!(root.join("build").exists());
}

#[test]
fn build_without_clean_leaves_the_build_directory_alone() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "cmake", "exit 0");

    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/stale.txt"), "old").unwrap();

    cxxkit(&root, &bin).arg("build").assert().success();

    assert!(root.join("build/stale.txt").exists());
}

#[test]
fn build_propagates_the_failing_step_exit_code() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "cmake", "echo \"configure blew up\" >&2\nexit 7");

    cxxkit(&root, &bin)
        .arg("build")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("exited with code 7"))
        .stderr(predicate::str::contains("configure blew up"));
}

#[test]
fn build_exports_the_compile_database_to_the_project_root() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    // The stub runs with the build directory as cwd, like real cmake would.
    write_stub(&bin, "cmake", "echo '[]' > compile_commands.json\nexit 0");

    cxxkit(&root, &bin)
        .args(["build", "--export-compile-commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exported compile commands"));

    assert!(root.join("compile_commands.json").exists());
}

#[test]
fn build_warns_when_no_compile_database_was_generated() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    write_stub(&bin, "cmake", "exit 0");

    cxxkit(&root, &bin)
        .args(["build", "--export-compile-commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compile_commands.json was not generated"));

    assert!(!root.join("compile_commands.json").exists());
}

// ----------------------------------------------------------------------------
// configuration file
// ----------------------------------------------------------------------------

#[test]
fn config_file_can_rename_tools_and_extend_exclusions() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();

    fs::write(
        root.join("cxxkit.toml"),
        r#"
[discovery]
exclude_dirs = ["build", "vcpkg_installed", ".cache", ".git", "third_party"]

[tools]
clang_format = "clang-format-19"
"#,
    )
    .unwrap();

    fs::create_dir_all(root.join("third_party")).unwrap();
    fs::write(root.join("third_party/vendored.cpp"), "int v;\n").unwrap();

    // Only the renamed binary exists; failing for the vendored file proves
    // the extra exclusion is honored.
    write_stub(
        &bin,
        "clang-format-19",
        r#"case "$*" in *vendored.cpp*) exit 1 ;; esac
exit 0"#,
    );

    cxxkit(&root, &bin)
        .args(["format", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("all files are properly formatted"));
}

#[test]
fn malformed_config_file_is_a_readable_error() {
    let (_project, root) = setup_project();
    let (_bin_dir, bin) = setup_bin();
    fs::write(root.join("cxxkit.toml"), "not valid toml [").unwrap();

    cxxkit(&root, &bin)
        .arg("format")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cxxkit.toml"));
}
