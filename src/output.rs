use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{HydrateError, Result};

/// Replace the file at `path` with `content`.
///
/// The bytes go to a temporary file next to the destination which is then
/// renamed over it, so readers never observe a half-written file. A symlink
/// at `path` is followed and its target replaced, and an existing file keeps
/// its permissions. New files are created owner read/write only.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    let (dest, existing) = match std::fs::canonicalize(path) {
        Ok(target) => {
            let metadata = std::fs::metadata(&target).map_err(|e| HydrateError::Io {
                context: format!("reading metadata of {}", target.display()),
                source: e,
            })?;
            (target, Some(metadata.permissions()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(e) => {
            return Err(HydrateError::Io {
                context: format!("resolving {}", path.display()),
                source: e,
            });
        }
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| HydrateError::Io {
        context: format!("creating temporary file in {}", dir.display()),
        source: e,
    })?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| HydrateError::Io {
            context: format!("writing {}", dest.display()),
            source: e,
        })?;
    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| HydrateError::Io {
                context: format!("setting permissions of {}", dest.display()),
                source: e,
            })?;
    }
    tmp.persist(&dest).map_err(|e| HydrateError::Io {
        context: format!("writing file {}", dest.display()),
        source: e.error,
    })?;

    log::debug!("wrote {} bytes to {}", content.len(), dest.display());
    Ok(())
}

/// Write `content` to `dir/file_name`, creating `dir` first if needed.
pub fn write_file_in(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| HydrateError::Io {
        context: format!("creating output directory {}", dir.display()),
        source: e,
    })?;

    let dest = dir.join(file_name);
    write_file(&dest, content)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_file_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.yaml");
        fs::write(&path, "write_file_example: {{ and true true }}").unwrap();

        write_file(&path, "write_file_example: true").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "write_file_example: true");
    }

    #[test]
    fn test_write_file_in_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out");

        let dest = write_file_in(&target, "values.yaml", "a: b").unwrap();

        assert_eq!(dest, target.join("values.yaml"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "a: b");
    }

    #[test]
    fn test_write_file_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/values.yaml");

        let err = write_file(&path, "a: b").unwrap_err();
        assert!(matches!(err, HydrateError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.yaml");

        write_file(&path, "password: hunter2").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.yaml");
        fs::write(&path, "a: {{ ssm \"/a\" \"\" }}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_file(&path, "a: b").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a: b");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_follows_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.yaml");
        let link = dir.path().join("values.yaml");
        fs::write(&target, "a: template").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        write_file(&link, "a: rendered").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "a: rendered");
        assert_eq!(fs::read_to_string(&link).unwrap(), "a: rendered");
    }
}
