//! Storage is organized around [ProfileStore].
//! The basic idea is:
//!   - The whole profile is stored as one json document. There are no partial writes.
//!   - The document lives in `profile.v1.json`; the file name is the only version marker.
//!   - Failing to read or write is never fatal. [load_profile] and [save_profile] log the problem
//!     and the session carries on in memory.

pub mod persistence;

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tracing::{debug, error, warn};

use crate::{
    fs::operations::{open_lock_file, remove_if_exists, write_atomically},
    model::Profile,
};

pub const PROFILE_FILE_NAME: &str = "profile.v1.json";
const LOCK_FILE_NAME: &str = "profile.lock";

/// What gets persisted after a transition. `None` means the profile was reset.
pub type Snapshot = Option<Arc<Profile>>;

/// Interface for abstracting storage of the profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the stored profile, `None` when nothing was stored yet.
    async fn load(&self) -> Result<Option<Profile>>;

    /// Stores the snapshot, clearing storage for `None`.
    async fn save(&self, snapshot: Snapshot) -> Result<()>;
}

/// The main realization of [ProfileStore].
pub struct JsonProfileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join(PROFILE_FILE_NAME),
            lock_path: dir.join(LOCK_FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_locked(&self) -> Result<Option<String>, std::io::Error> {
        let lock = open_lock_file(&self.lock_path).await?;
        lock.lock_shared()?;
        let read = tokio::fs::read_to_string(&self.path).await;
        lock.unlock_async().await?;

        match read {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ProfileStore for JsonProfileStore {
    async fn load(&self) -> Result<Option<Profile>> {
        let Some(raw) = self.read_locked().await? else {
            debug!("No profile stored at {:?}", self.path);
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let profile = serde_json::from_str::<Profile>(&raw)
            .with_context(|| format!("Stored profile at {:?} is corrupted", self.path))?;
        Ok(Some(profile))
    }

    async fn save(&self, snapshot: Snapshot) -> Result<()> {
        let lock = open_lock_file(&self.lock_path).await?;
        lock.lock_exclusive()?;
        let result = match snapshot {
            Some(profile) => {
                let buffer = serde_json::to_vec(profile.as_ref())?;
                write_atomically(&self.path, &buffer).await
            }
            None => remove_if_exists(&self.path).await,
        };
        lock.unlock_async().await?;
        result?;
        Ok(())
    }
}

/// Loads the profile, treating unreadable or corrupted storage as "no profile".
pub async fn load_profile<S: ProfileStore + ?Sized>(store: &S) -> Option<Profile> {
    match store.load().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Ignoring stored profile: {e:?}");
            None
        }
    }
}

/// Saves the snapshot. Failures are logged and otherwise ignored.
pub async fn save_profile<S: ProfileStore + ?Sized>(store: &S, snapshot: Snapshot) {
    if let Err(e) = store.save(snapshot).await {
        error!("Failed to save profile: {e:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        model::{Profile, Project, WorkDay, WorkEntry},
        utils::logging::TEST_LOGGING,
    };

    use super::*;

    fn profile() -> Profile {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Profile {
            weekly_budget_hours: 40.,
            projects: vec![Project::new("a", "client work", "#10b981").with_bounds(5., 10., 15.)],
            work_days: vec![WorkDay {
                date: "2024-01-01".into(),
                entries: vec![WorkEntry {
                    id: "e1".into(),
                    project_id: "a".into(),
                    hours: 8.,
                    note: Some("kickoff".into()),
                    created_at: created,
                }],
            }],
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_missing_profile_loads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProfileStore::new(dir.path().join("state"))?;
        assert_eq!(store.load().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_profile_loads_back() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProfileStore::new(dir.path().to_owned())?;
        store.save(Some(Arc::new(profile()))).await?;
        assert_eq!(store.load().await?, Some(profile()));

        let raw = std::fs::read_to_string(store.path())?;
        assert!(raw.contains("\"weeklyBudgetHours\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_saving_none_clears_storage() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonProfileStore::new(dir.path().to_owned())?;
        store.save(None).await?;
        store.save(Some(Arc::new(profile()))).await?;
        store.save(None).await?;
        assert!(!store.path().exists());
        assert_eq!(store.load().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupted_profile_is_swallowed() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let store = JsonProfileStore::new(dir.path().to_owned())?;
        std::fs::write(store.path(), "{\"weeklyBudgetHours\": 4")?;
        assert!(store.load().await.is_err());
        assert_eq!(load_profile(&store).await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let mut store = MockProfileStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(anyhow!("disk full")));
        save_profile(&store, None).await;
    }

    #[tokio::test]
    async fn test_load_failure_is_swallowed() {
        let mut store = MockProfileStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|| Err(anyhow!("permission denied")));
        assert_eq!(load_profile(&store).await, None);
    }
}
