//! Filesystem primitives used while browsing and pasting.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{FavoritesError, Result};

/// Immediate children of `dir`: directories first, then files, each group
/// ordered case-insensitively by name.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = fs::read_dir(dir).map_err(|e| FavoritesError::from_io(dir, e))?;
    let mut children: Vec<(PathBuf, bool, String)> = Vec::new();
    for item in read {
        let item = item.map_err(|e| FavoritesError::from_io(dir, e))?;
        let path = item.path();
        let is_dir = path.is_dir();
        let name = item.file_name().to_string_lossy().to_lowercase();
        children.push((path, is_dir, name));
    }

    children.sort_by(|a, b| {
        if a.1 != b.1 {
            return if a.1 { Ordering::Less } else { Ordering::Greater };
        }
        a.2.cmp(&b.2)
    });
    debug!(dir = %dir.display(), count = children.len(), "Listed directory");
    Ok(children.into_iter().map(|(path, _, _)| path).collect())
}

/// Last component of `path` as text, or the whole path when it has none.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Copy a file, or a directory tree, to a `dest` that does not exist yet.
///
/// Refuses to overwrite and to copy a directory into itself. On failure
/// whatever was already written under `dest` is removed again.
pub fn copy_entry(src: &Path, dest: &Path) -> io::Result<()> {
    check_destination(src, dest)?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let result = if src.is_dir() {
        copy_tree(src, dest)
    } else {
        fs::copy(src, dest).map(|_| ())
    };
    if result.is_err() {
        discard(dest);
    }
    result
}

/// Move `src` to a `dest` that does not exist yet.
///
/// Copy and remove is only used when the two sit on different filesystems.
/// If the source cannot be removed afterwards it is restored from the copy
/// and the copy is discarded, so the item ends up in exactly one place.
pub fn move_entry(src: &Path, dest: &Path) -> io::Result<()> {
    check_destination(src, dest)?;
    let err = match fs::rename(src, dest) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    if !is_cross_device(&err) {
        return Err(err);
    }

    debug!(src = %src.display(), dest = %dest.display(), "Moving across filesystems");
    copy_entry(src, dest)?;
    let removed = if src.is_dir() {
        fs::remove_dir_all(src)
    } else {
        fs::remove_file(src)
    };
    if let Err(e) = removed {
        match restore_missing(dest, src) {
            Ok(()) => discard(dest),
            Err(restore) => {
                warn!(src = %src.display(), error = %restore, "Could not restore source after failed move")
            }
        }
        return Err(e);
    }
    Ok(())
}

fn check_destination(src: &Path, dest: &Path) -> io::Result<()> {
    if dest.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", dest.display()),
        ));
    }
    if src.is_dir() && dest.starts_with(src) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot place a folder inside itself",
        ));
    }
    Ok(())
}

/// The source's entries are read before `dest` is created.
fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    let entries = fs::read_dir(src)?.collect::<io::Result<Vec<_>>>()?;
    fs::create_dir(dest)?;
    for entry in entries {
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_tree(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }
    Ok(())
}

/// Copy back everything under `from` that is missing under `to`.
fn restore_missing(from: &Path, to: &Path) -> io::Result<()> {
    if !from.is_dir() {
        if !to.exists() {
            fs::copy(from, to)?;
        }
        return Ok(());
    }
    if !to.exists() {
        fs::create_dir(to)?;
    }
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        restore_missing(&entry.path(), &to.join(entry.file_name()))?;
    }
    Ok(())
}

fn discard(path: &Path) {
    let removed = if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        Ok(())
    };
    if let Err(e) = removed {
        warn!(path = %path.display(), error = %e, "Could not clean up partial copy");
    }
}

#[cfg(unix)]
const EXDEV: i32 = 18;
#[cfg(windows)]
const EXDEV: i32 = 17; // ERROR_NOT_SAME_DEVICE
#[cfg(not(any(unix, windows)))]
const EXDEV: i32 = -1;

fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(EXDEV)
}
