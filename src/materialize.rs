//! Copies generated output into place without losing existing work.
//!
//! Files that do not exist yet are created. An existing file with the same content is left
//! alone; one with different content is backed up next to itself as `{file}.N` before being
//! replaced.

use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;

/// What happened to each file during [`materialize`].
#[derive(Debug, Default, PartialEq)]
pub struct MaterializeReport {
    pub created: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// `(replaced file, backup of its previous content)`
    pub replaced: Vec<(PathBuf, PathBuf)>,
}

/// Copies every file under `source_root` to the same relative location under `output_dir`.
///
/// # Arguments
/// * `source_root` - Directory holding freshly generated files
/// * `output_dir` - Destination root
///
/// # Returns
/// * `Result<MaterializeReport>` - Destination paths grouped by outcome
pub fn materialize<P: AsRef<Path>, Q: AsRef<Path>>(
    source_root: P,
    output_dir: Q,
) -> Result<MaterializeReport> {
    let source_root = source_root.as_ref();
    let output_dir = output_dir.as_ref();
    let mut report = MaterializeReport::default();

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry.path().strip_prefix(source_root).unwrap_or(entry.path());
        let target = output_dir.join(relative);

        if !target.exists() {
            copy_file(entry.path(), &target)?;
            info!("Created {}", target.display());
            report.created.push(target);
        } else if same_content(entry.path(), &target)? {
            info!("Same file already exists, not changing {}", target.display());
            report.unchanged.push(target);
        } else {
            let backup = find_unused_name(&target);
            info!("Moving old file: {} -> {}", target.display(), backup.display());
            fs::copy(&target, &backup)?;
            copy_file(entry.path(), &target)?;
            report.replaced.push((target, backup));
        }
    }

    Ok(report)
}

/// First of `{path}.1`, `{path}.2`, ... that does not exist.
pub fn find_unused_name<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut counter = 0u32;
    loop {
        counter += 1;
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{counter}"));
        let candidate = PathBuf::from(name);
        if !candidate.exists() {
            return candidate;
        }
    }
}

/// Compares two files block by block.
pub fn same_content<P: AsRef<Path>, Q: AsRef<Path>>(a: P, b: Q) -> Result<bool> {
    let (a, b) = (a.as_ref(), b.as_ref());
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }

    let mut left = BufReader::new(fs::File::open(a)?);
    let mut right = BufReader::new(fs::File::open(b)?);
    let mut left_buf = [0u8; 4096];
    let mut right_buf = [0u8; 4096];

    loop {
        let read = left.read(&mut left_buf)?;
        if read == 0 {
            return Ok(true);
        }
        right.read_exact(&mut right_buf[..read])?;
        if left_buf[..read] != right_buf[..read] {
            return Ok(false);
        }
    }
}

/// Writes `content`, creating parent directories.
pub fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Writing {}", dest_path.display());
    Ok(fs::write(dest_path, content)?)
}

/// Copies a file with its permissions, creating parent directories.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, dest_path: Q) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source_path, dest_path)?;
    Ok(())
}

/// Adds the execute bits for user, group and others.
#[cfg(unix)]
pub fn make_executable<P: AsRef<Path>>(path: P) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    info!("Making file executable: {}", path.display());
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    Ok(fs::set_permissions(path, permissions)?)
}

#[cfg(not(unix))]
pub fn make_executable<P: AsRef<Path>>(path: P) -> Result<()> {
    debug!("Executable bit not supported here, leaving {}", path.as_ref().display());
    Ok(())
}
