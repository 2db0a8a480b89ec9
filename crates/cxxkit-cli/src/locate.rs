//! Prioritized searches for optional upstream artifacts.
//!
//! Both searches are pure over an injected existence probe: an ordered list
//! of candidates, first hit wins. The real probe just asks the filesystem.

use std::path::{Path, PathBuf};

/// Existence probe the resolvers run against.
///
/// The only side effect a resolver is allowed is asking whether a path
/// exists; tests inject a fake probe instead of touching the filesystem.
pub trait Probe {
    fn exists(&self, path: &Path) -> bool;
}

/// The real-filesystem probe.
pub struct FsProbe;

impl Probe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Relative location of the toolchain file inside a vcpkg checkout.
const VCPKG_TOOLCHAIN_SUFFIX: &str = "scripts/buildsystems/vcpkg.cmake";

/// Find the vcpkg toolchain file.
///
/// Candidates, in priority order: a project-local `vcpkg/` checkout, the
/// user's home checkout, the Linux/macOS system location, the Windows system
/// location, and finally `$VCPKG_ROOT` — which is consulted only when none
/// of the fixed locations exist.
pub fn vcpkg_toolchain(
    probe: &dyn Probe,
    project_root: &Path,
    home: Option<&Path>,
    vcpkg_root: Option<&Path>,
) -> Option<PathBuf> {
    let mut candidates = vec![project_root.join("vcpkg").join(VCPKG_TOOLCHAIN_SUFFIX)];
    if let Some(home) = home {
        candidates.push(home.join("vcpkg").join(VCPKG_TOOLCHAIN_SUFFIX));
    }
    candidates.push(PathBuf::from("/usr/local/share/vcpkg").join(VCPKG_TOOLCHAIN_SUFFIX));
    candidates.push(PathBuf::from("C:/vcpkg").join(VCPKG_TOOLCHAIN_SUFFIX));
    if let Some(vcpkg_root) = vcpkg_root {
        candidates.push(vcpkg_root.join(VCPKG_TOOLCHAIN_SUFFIX));
    }

    candidates.into_iter().find(|c| probe.exists(c))
}

/// Find `compile_commands.json`, checking the build directory before the
/// project root.
pub fn compile_database(probe: &dyn Probe, project_root: &Path) -> Option<PathBuf> {
    let candidates = [
        project_root.join("build").join("compile_commands.json"),
        project_root.join("compile_commands.json"),
    ];

    candidates.into_iter().find(|c| probe.exists(c))
}
