//! File-backed persistence for the single `UserProgress` document.
//!
//! No caching: every `load` re-reads the document and every `save` overwrites it.
//! A crash mid-write can leave a truncated document behind; the next `load`
//! then fails with `AppError::CorruptProgress` instead of silently resetting.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::domain::UserProgress;
use crate::error::AppError;
use crate::progression::level_for;

pub const PROGRESS_FILE: &str = "user_progress.json";

#[derive(Clone, Debug)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self { path: data_dir.as_ref().join(PROGRESS_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, or return defaults when none exists yet.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<UserProgress, AppError> {
        self.ensure_dir().await?;
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "progress", "No progress document yet; using defaults");
                return Ok(UserProgress::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut progress: UserProgress = serde_json::from_str(&raw)?;
        progress.level = level_for(progress.xp);
        Ok(progress)
    }

    #[instrument(level = "debug", skip(self, progress), fields(path = %self.path.display(), xp = progress.xp))]
    pub async fn save(&self, progress: &UserProgress) -> Result<(), AppError> {
        self.ensure_dir().await?;
        let body = serde_json::to_string_pretty(progress)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn ensure_dir(&self) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_returns_defaults_and_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let store = ProgressStore::in_dir(&dir);

        let p = store.load().await.unwrap();
        assert_eq!(p, UserProgress::default());
        assert!(dir.is_dir());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProgressStore::in_dir(tmp.path());

        let mut p = UserProgress::default();
        p.xp = 340;
        p.level = 4;
        p.streak_days = 2;
        p.achievements.push("detective".into());
        store.save(&p).await.unwrap();

        assert_eq!(store.load().await.unwrap(), p);
    }

    #[tokio::test]
    async fn load_recomputes_stale_level() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProgressStore::in_dir(tmp.path());
        std::fs::write(store.path(), r#"{"xp": 512, "level": 1}"#).unwrap();

        assert_eq!(store.load().await.unwrap().level, 6);
    }

    #[tokio::test]
    async fn truncated_document_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ProgressStore::in_dir(tmp.path());
        std::fs::write(store.path(), r#"{"xp": 5"#).unwrap();

        assert!(matches!(store.load().await, Err(AppError::CorruptProgress(_))));
    }
}
