//! JSON-lines file backend.
//!
//! Each record is one line of JSON. The file is read once on open and kept
//! in memory; appends write the new line and flush before the record becomes
//! visible to readers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::record::MatchRecord;
use crate::traits::MatchLogStore;

/// File-backed store, durable across restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: BTreeMap<u64, MatchRecord>,
    /// The file is non-empty and does not end in `\n`.
    unterminated: bool,
}

impl FileStore {
    /// Open the store at `path`, loading any records already written.
    ///
    /// A missing file is an empty store; it is created on first append.
    /// Blank lines are skipped. A line that is not a valid record fails the
    /// open with `StorageError::Corrupt`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let mut records = BTreeMap::new();
        let mut unterminated = false;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                unterminated = !contents.is_empty() && !contents.ends_with('\n');
                for (idx, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let record: MatchRecord =
                        serde_json::from_str(line).map_err(|e| StorageError::Corrupt {
                            line: idx + 1,
                            message: e.to_string(),
                        })?;
                    if records.contains_key(&record.match_id) {
                        return Err(StorageError::Corrupt {
                            line: idx + 1,
                            message: format!("duplicate match id {}", record.match_id),
                        });
                    }
                    records.insert(record.match_id, record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(path = %path.display(), count = records.len(), "opened match store");

        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                records,
                unterminated,
            }),
        })
    }
}

#[async_trait]
impl MatchLogStore for FileStore {
    async fn next_match_id(&self) -> Result<u64, StorageError> {
        let inner = self.inner.lock().await;
        Ok(inner.records.keys().next_back().map_or(1, |last| last + 1))
    }

    async fn append(&self, record: MatchRecord) -> Result<(), StorageError> {
        // Held across the write so two appends cannot interleave lines.
        let mut inner = self.inner.lock().await;
        if inner.records.contains_key(&record.match_id) {
            return Err(StorageError::DuplicateMatch {
                match_id: record.match_id,
            });
        }

        let mut line = String::new();
        if inner.unterminated {
            line.push('\n');
        }
        line.push_str(
            &serde_json::to_string(&record).map_err(|e| StorageError::Backend(e.to_string()))?,
        );
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let len = file.metadata().await?.len();

        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // Drop the partial line so the next append starts on a clean line.
            if let Err(truncate) = file.set_len(len).await {
                tracing::error!(
                    path = %self.path.display(),
                    error = %truncate,
                    "failed to roll back partial append"
                );
                inner.unterminated = true;
            }
            return Err(e.into());
        }

        inner.unterminated = false;
        inner.records.insert(record.match_id, record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self.inner.lock().await.records.values().cloned().collect())
    }

    async fn get(&self, match_id: u64) -> Result<MatchRecord, StorageError> {
        self.inner
            .lock()
            .await
            .records
            .get(&match_id)
            .cloned()
            .ok_or(StorageError::MatchNotFound { match_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("matches.jsonl"))
            .await
            .unwrap();
        assert_eq!(store.next_match_id().await.unwrap(), 1);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("matches.jsonl");

        let store = FileStore::open(&path).await.unwrap();
        store
            .append(MatchRecord::new(1, "a\n", "Player A", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();
        store
            .append(MatchRecord::new(2, "b\n", "Player B", "2025-01-01T00:01:00Z"))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.next_match_id().await.unwrap(), 3);
        let second = reopened.get(2).await.unwrap();
        assert_eq!(second.winner, "Player B");
        assert_eq!(second.match_log, "b\n");
    }

    #[tokio::test]
    async fn append_after_unterminated_last_line_starts_new_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.jsonl");
        let first = serde_json::to_string(&MatchRecord::new(1, "x", "Player A", "t")).unwrap();
        tokio::fs::write(&path, &first).await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        store
            .append(MatchRecord::new(2, "y", "Player B", "t"))
            .await
            .unwrap();
        store
            .append(MatchRecord::new(3, "z", "Player A", "t"))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.next_match_id().await.unwrap(), 4);
        assert_eq!(reopened.list_all().await.unwrap().len(), 3);
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn corrupt_line_is_reported_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.jsonl");
        let good = serde_json::to_string(&MatchRecord::new(1, "x", "Player A", "t")).unwrap();
        tokio::fs::write(&path, format!("{good}\n\nnot json\n"))
            .await
            .unwrap();

        match FileStore::open(&path).await {
            Err(StorageError::Corrupt { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_ids_on_disk_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.jsonl");
        let line = serde_json::to_string(&MatchRecord::new(4, "x", "Player A", "t")).unwrap();
        tokio::fs::write(&path, format!("{line}\n{line}\n"))
            .await
            .unwrap();

        assert!(matches!(
            FileStore::open(&path).await,
            Err(StorageError::Corrupt { line: 2, .. })
        ));
    }
}
