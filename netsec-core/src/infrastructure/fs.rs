use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// The parent directory is created if needed, the temporary file lives next to
/// the target so the final rename never crosses filesystems, and an existing
/// target is replaced rather than appended to.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    atomic_write_with(path, |temp_path| {
        let mut file = fs::OpenOptions::new().write(true).open(temp_path)?;
        file.write_all(content.as_ref())?;
        file.sync_all()?;
        Ok(())
    })
}

/// Same guarantee as [`atomic_write`] for writers that want a path rather
/// than bytes (DuckDB `COPY ... TO`, `.npy` encoders).
pub fn atomic_write_with<P, F>(path: P, write: F) -> Result<(), InfrastructureError>
where
    P: AsRef<Path>,
    F: FnOnce(&Path) -> Result<(), InfrastructureError>,
{
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".netsec-");
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()));
    if let Some(suffix) = &suffix {
        builder.suffix(suffix);
    }
    let temp_file = builder.tempfile_in(parent)?;

    write(temp_file.path())?;

    temp_file.persist(path)?;
    Ok(())
}

/// Atomically replaces `to` with a copy of `from`.
pub fn copy_atomic(from: &Path, to: &Path) -> Result<(), InfrastructureError> {
    let content = fs::read(from)?;
    atomic_write(to, content)
}

pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), InfrastructureError> {
    let content = serde_json::to_string_pretty(data)?;
    atomic_write(path, content)
}

pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");
        let content = "Hello, World!";

        atomic_write(&file_path, content)?;

        assert!(file_path.exists());
        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, content);
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, "Updated");
        Ok(())
    }

    #[test]
    fn test_atomic_write_creates_missing_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("a/b/c.csv");
        atomic_write(&file_path, "x")?;
        assert_eq!(fs::read_to_string(file_path)?, "x");
        Ok(())
    }

    #[test]
    fn test_failed_writer_leaves_no_target() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("out.csv");
        let res = atomic_write_with(&file_path, |_| {
            Err(InfrastructureError::ConfigError("boom".into()))
        });
        assert!(res.is_err());
        assert!(!file_path.exists());
        // The temporary file is cleaned up on drop.
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("artifact.json");
        save_json(&path, &vec![1, 2, 3])?;
        let back: Vec<i32> = load_json(&path)?;
        assert_eq!(back, vec![1, 2, 3]);
        Ok(())
    }
}
