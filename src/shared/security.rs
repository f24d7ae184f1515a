use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum manifest size accepted from a local checkout (10 MiB)
///
/// Manifests are small text files; anything larger is almost certainly not
/// a dependency declaration and is skipped.
pub const MAX_MANIFEST_SIZE: u64 = 10 * 1024 * 1024;

/// Outcome of inspecting a candidate manifest path before reading it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCheck {
    /// Regular file within the size limit
    Readable,
    /// Nothing at this path
    Missing,
}

/// Validates that a path is not a symbolic link
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Inspects a manifest path before it is read.
///
/// A missing path is not an error; repository access reports absent files
/// as `None` rather than failing.
///
/// # Errors
/// Returns an error if the path is a symbolic link, is not a regular file,
/// or exceeds `max_size`.
pub fn check_manifest_file(path: &Path, max_size: u64) -> Result<FileCheck> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileCheck::Missing),
        Err(e) => anyhow::bail!("Failed to read metadata for {}: {}", path.display(), e),
    };

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    Ok(FileCheck::Readable)
}
