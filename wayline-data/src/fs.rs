//! UTF-8 file access through `cap-std` directory capabilities.
//!
//! Every operation opens the parent directory with ambient authority and then
//! works relative to that handle, so callers never juggle raw `std::fs`
//! paths.

use std::io::{self, Read, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a whole file as UTF-8 text.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened or is not
/// valid UTF-8.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Write `contents` to `path`, creating missing parent directories and
/// replacing any existing file.
///
/// # Errors
/// Returns the underlying I/O error when a directory or the file cannot be
/// created.
pub fn write_string(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    let mut file = dir.create(name)?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

/// Whether `path` names an existing regular file.
///
/// # Errors
/// Returns the underlying I/O error, including `NotFound` when the parent
/// directory is missing.
pub fn is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    match dir.metadata(&name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create the parent directory of `path` and its ancestors.
///
/// # Errors
/// Returns the underlying I/O error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split a directory path into an opened anchor (root, drive or current
/// directory) and the remainder relative to it.
fn split_anchor(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut anchor = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in dir.as_std_path().components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                let part = component
                    .as_os_str()
                    .to_str()
                    .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
                anchor.push(part);
            }
            other => {
                let part = other
                    .as_os_str()
                    .to_str()
                    .ok_or_else(|| io::Error::other("non-UTF-8 path component"))?;
                relative.push(part);
            }
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    let base = fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?;
    Ok((base, relative))
}
