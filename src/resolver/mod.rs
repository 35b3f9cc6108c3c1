//! Dependency closure over a [`PackageGraph`]
//!
//! The walk uses an explicit stack, so arbitrarily deep dependency chains and
//! dependency cycles are both fine.

use crate::core::{SysrootError, SysrootResult};
use crate::graph::PackageGraph;
use std::collections::BTreeSet;
use tracing::debug;

/// Base-system and compiler-runtime packages that are never pulled into a
/// sysroot, either because the cross toolchain ships them or because they
/// only make sense on a booted system.
pub const IGNORED_PACKAGES: &[&str] = &[
    "raspberrypi-bootloader",
    "libasan3",
    "libubsan0",
    "libgomp1",
    "libatomic1",
    "sh",
    "filesystem",
    "tzdata",
    "iana-etc",
    "libncursesw.so",
    "libp11-kit.so",
    "libsystemd.so",
    "libidn2.so",
    "libacl.so",
];

/// Names excluded from closure expansion
#[derive(Debug, Clone, Copy)]
pub struct IgnoreSet {
    names: &'static [&'static str],
}

impl IgnoreSet {
    /// The fixed built-in exclusion list
    pub fn builtin() -> Self {
        Self {
            names: IGNORED_PACKAGES,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Set of package names to install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    names: BTreeSet<String>,
}

impl ResolvedSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Compute the closure of `roots` over `graph`
///
/// Roots are always included. Dependencies listed in `ignore` are neither
/// added nor expanded. A root or dependency missing from the graph is an
/// [`SysrootError::UnknownPackage`]; each call starts from an empty set.
pub fn resolve<S: AsRef<str>>(
    roots: &[S],
    graph: &PackageGraph,
    ignore: &IgnoreSet,
) -> SysrootResult<ResolvedSet> {
    let mut resolved = BTreeSet::new();
    let mut stack: Vec<(&str, Option<&str>)> =
        roots.iter().rev().map(|root| (root.as_ref(), None)).collect();

    while let Some((name, required_by)) = stack.pop() {
        if resolved.contains(name) {
            continue;
        }

        let record = graph.get(name).ok_or_else(|| SysrootError::UnknownPackage {
            name: name.to_string(),
            required_by: required_by.map(str::to_string),
        })?;

        resolved.insert(name.to_string());

        for dep in record.dependencies.iter().rev() {
            if ignore.contains(dep) {
                debug!("Skipping ignored dependency {} of {}", dep, name);
                continue;
            }
            if !resolved.contains(dep.as_str()) {
                stack.push((dep.as_str(), Some(name)));
            }
        }
    }

    Ok(ResolvedSet { names: resolved })
}
