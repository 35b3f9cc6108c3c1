//! Rewrite absolute symlinks inside an install root as relative ones
//!
//! Packages assume they are unpacked at `/`. Inside a sysroot a link to
//! `/usr/lib/libz.so.1` has to point at `<root>/usr/lib/libz.so.1`, which a
//! relative target does regardless of where the root ends up.

use crate::core::{SysrootError, SysrootResult};
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

// Same limit the kernel applies to nested links
const MAX_LINK_HOPS: usize = 40;

enum Step {
    Up,
    Down(OsString),
}

fn steps(path: &Path) -> Vec<Step> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(Step::Down(part.to_os_string())),
            Component::ParentDir => Some(Step::Up),
            _ => None,
        })
        .collect()
}

/// Map an absolute link target into the install root
///
/// `.` is dropped and `..` never climbs above `root`, the same way `/..` is
/// `/` on a real filesystem. Directories along the way that are themselves
/// symlinks inside the root are followed, so a `..` after them leaves the
/// directory they really point at. The last component is kept as named and
/// does not need to exist.
pub fn anchor_in_root(root: &Path, target: &Path) -> PathBuf {
    let mut pending: VecDeque<Step> = steps(target).into();
    let mut anchored = root.to_path_buf();
    let mut depth = 0usize;
    let mut hops = 0usize;

    while let Some(step) = pending.pop_front() {
        match step {
            Step::Up => {
                if depth > 0 {
                    anchored.pop();
                    depth -= 1;
                }
            }
            Step::Down(part) => {
                anchored.push(&part);
                depth += 1;
                if pending.is_empty() || hops >= MAX_LINK_HOPS {
                    continue;
                }

                let Ok(link) = fs::read_link(&anchored) else {
                    continue;
                };
                hops += 1;
                anchored.pop();
                depth -= 1;
                if link.is_absolute() {
                    anchored = root.to_path_buf();
                    depth = 0;
                }
                for step in steps(&link).into_iter().rev() {
                    pending.push_front(step);
                }
            }
        }
    }

    anchored
}

/// Relative replacement for the absolute `target` of the link at `link`
pub fn relative_target(root: &Path, link: &Path, target: &Path) -> SysrootResult<PathBuf> {
    let parent = link
        .parent()
        .ok_or_else(|| SysrootError::Path(format!("{} has no parent", link.display())))?;
    let anchored = anchor_in_root(root, target);

    let fixed = pathdiff::diff_paths(&anchored, parent).ok_or_else(|| {
        SysrootError::Path(format!(
            "Cannot express {} relative to {}",
            anchored.display(),
            parent.display()
        ))
    })?;

    // A link to its own directory
    if fixed.as_os_str().is_empty() {
        return Ok(PathBuf::from("."));
    }
    Ok(fixed)
}

/// Walk `root` once and rewrite every absolute symlink. Returns the number
/// of links rewritten.
///
/// Must run after every package has been extracted; targets do not need to
/// exist.
pub fn normalize_symlinks(root: &Path) -> SysrootResult<usize> {
    // Resolve the root itself so link locations and anchored targets share
    // one spelling
    let root = root.canonicalize()?;

    let mut links = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false) {
        let entry = entry?;
        if entry.path_is_symlink() {
            links.push(entry.into_path());
        }
    }

    let mut rewritten = 0;
    for link in links {
        let target = fs::read_link(&link)?;
        if !target.is_absolute() {
            continue;
        }

        let fixed = relative_target(&root, &link, &target)?;
        debug!(
            "{}: {} -> {}",
            link.display(),
            target.display(),
            fixed.display()
        );
        replace_link(&link, &fixed)?;
        rewritten += 1;
    }

    Ok(rewritten)
}

// The new link is created beside the old one and renamed over it, so a
// failure leaves the original link in place
#[cfg(unix)]
fn replace_link(link: &Path, target: &Path) -> SysrootResult<()> {
    let mut staged = link.as_os_str().to_owned();
    staged.push(".sysroot-new");
    let staged = PathBuf::from(staged);

    if staged.symlink_metadata().is_ok() {
        fs::remove_file(&staged)?;
    }
    std::os::unix::fs::symlink(target, &staged)?;
    fs::rename(&staged, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn replace_link(link: &Path, _target: &Path) -> SysrootResult<()> {
    Err(SysrootError::Path(format!(
        "Cannot rewrite symlink {} on this platform",
        link.display()
    )))
}
