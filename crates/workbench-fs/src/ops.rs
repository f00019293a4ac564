//! Single-call file-system operations: list, stat, read, write, move,
//! delete, permissions. Each is one `tokio::fs` call translated to the
//! crate error type — no state, no concurrency design.

use crate::error::{FsError, Result};
use crate::types::FileInfo;
use chrono::{DateTime, Utc};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;

fn info_from_metadata(path: &Path, meta: &std::fs::Metadata) -> FileInfo {
    FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.display().to_string(),
        size: meta.len(),
        mode: format!("{:o}", meta.permissions().mode() & 0o777),
        is_dir: meta.is_dir(),
        mod_time: meta.modified().ok().map(DateTime::<Utc>::from),
    }
}

fn not_found(path: &Path, e: std::io::Error) -> FsError {
    if e.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound(path.display().to_string())
    } else {
        FsError::Io(e)
    }
}

/// Metadata for a single path.
pub async fn info(path: &Path) -> Result<FileInfo> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| not_found(path, e))?;
    Ok(info_from_metadata(path, &meta))
}

/// List the entries of a directory (non-recursive), sorted by name.
pub async fn list_dir(path: &Path) -> Result<Vec<FileInfo>> {
    let mut entries = tokio::fs::read_dir(path)
        .await
        .map_err(|e| not_found(path, e))?;

    let mut infos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let meta = entry.metadata().await?;
        infos.push(info_from_metadata(&entry.path(), &meta));
    }
    infos.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(infos)
}

/// Read a file's raw bytes.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| not_found(path, e))
}

/// Write `contents` to `path`, creating parent directories as needed.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    debug!(path = %path.display(), bytes = contents.len(), "file written");
    Ok(())
}

/// Create a directory (and any missing parents) with the given octal mode.
pub async fn create_folder(path: &Path, mode: &str) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    set_permissions(path, mode).await
}

/// Rename `source` to `destination`.
pub async fn move_entry(source: &Path, destination: &Path) -> Result<()> {
    tokio::fs::rename(source, destination)
        .await
        .map_err(|e| not_found(source, e))
}

/// Delete a file, or a directory when `recursive` is set.
pub async fn delete(path: &Path, recursive: bool) -> Result<()> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| not_found(path, e))?;

    if meta.is_dir() {
        if recursive {
            tokio::fs::remove_dir_all(path).await?;
        } else {
            tokio::fs::remove_dir(path).await?;
        }
    } else {
        tokio::fs::remove_file(path).await?;
    }
    Ok(())
}

/// Apply an octal permission string (e.g. `"644"`) to a path.
pub async fn set_permissions(path: &Path, mode: &str) -> Result<()> {
    let bits =
        u32::from_str_radix(mode, 8).map_err(|_| FsError::InvalidMode(mode.to_string()))?;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(bits))
        .await
        .map_err(|e| not_found(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_info_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/file.txt");

        write_file(&path, b"payload").await.unwrap();
        assert_eq!(read_file(&path).await.unwrap(), b"payload");

        let meta = info(&path).await.unwrap();
        assert_eq!(meta.name, "file.txt");
        assert_eq!(meta.size, 7);
        assert!(!meta.is_dir);
    }

    #[tokio::test]
    async fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let entries = list_dir(dir.path()).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(info(&missing).await, Err(FsError::NotFound(_))));
        assert!(matches!(
            read_file(&missing).await,
            Err(FsError::NotFound(_))
        ));
        assert!(matches!(
            delete(&missing, false).await,
            Err(FsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn permissions_apply_and_reject_bad_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x");
        std::fs::write(&path, b"").unwrap();

        set_permissions(&path, "600").await.unwrap();
        assert_eq!(info(&path).await.unwrap().mode, "600");

        assert!(matches!(
            set_permissions(&path, "9z9").await,
            Err(FsError::InvalidMode(_))
        ));
    }

    #[tokio::test]
    async fn move_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        std::fs::write(&src, b"x").unwrap();

        move_entry(&src, &dst).await.unwrap();
        assert!(!src.exists());
        assert!(dst.exists());

        delete(&dst, false).await.unwrap();
        assert!(!dst.exists());

        let sub = dir.path().join("tree/leaf");
        std::fs::create_dir_all(&sub).unwrap();
        delete(&dir.path().join("tree"), true).await.unwrap();
    }
}
