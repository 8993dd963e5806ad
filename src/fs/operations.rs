use std::path::{Path, PathBuf};

use tokio::{
    fs::File,
    io::{self, AsyncWriteExt},
};

/// Opens (creating when needed) a file that only exists to be locked.
pub async fn open_lock_file(path: &Path) -> Result<File, io::Error> {
    File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await
}

/// Replaces the contents of `path` so that readers see either the old or the new contents, never
/// a half written file. Data goes to a sibling temp file which is then renamed over `path`.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let temp = temp_path(path);
    let mut file = File::create(&temp).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&temp, path).await
}

/// Removes `path`, treating a missing file as already removed.
pub async fn remove_if_exists(path: &Path) -> Result<(), io::Error> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn test_write_atomically_replaces_contents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("profile.v1.json");

        write_atomically(&path, b"first").await?;
        assert_eq!(tokio::fs::read_to_string(&path).await?, "first");

        write_atomically(&path, b"second, longer").await?;
        assert_eq!(tokio::fs::read_to_string(&path).await?, "second, longer");

        let files = std::fs::read_dir(dir.path())?.collect::<Vec<_>>();
        assert_eq!(files.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_if_exists() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("gone");
        remove_if_exists(&path).await?;

        tokio::fs::write(&path, "x").await?;
        remove_if_exists(&path).await?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let path = Path::new("/tmp/state/profile.v1.json");
        assert_eq!(temp_path(path), Path::new("/tmp/state/profile.v1.json.tmp"));
    }
}
