use crate::core::Storage;
use crate::domain::model::{CanonicalList, LoadedLists, ReconciliationResult, SessionState};
use crate::utils::error::{AnalyzerError, Result};
use chrono::Utc;
use serde_json::Value;

/// Saved lists and last result, kept in one JSON file inside a [`Storage`].
///
/// Layout: `{"followers": [..], "following": [..], "results": {"notFollowingBack": [..],
/// "mutual": [..], "fans": [..]}, "savedAt": "<rfc3339>"}`.
pub struct SessionStore<'a, S: Storage> {
    storage: &'a S,
    path: String,
}

impl<'a, S: Storage> SessionStore<'a, S> {
    pub fn new(storage: &'a S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn save(&self, lists: &LoadedLists, results: &ReconciliationResult) -> Result<()> {
        let state = SessionState {
            followers: lists.followers.clone(),
            following: lists.following.clone(),
            results: Some(results.clone()),
            saved_at: Utc::now(),
        };
        let data = serde_json::to_vec_pretty(&state)?;
        self.storage.write_file(&self.path, &data).await?;
        tracing::debug!("Session saved to {}", self.path);
        Ok(())
    }

    /// `Ok(None)` when no session has been saved yet.
    pub async fn load(&self) -> Result<Option<SessionState>> {
        let data = match self.storage.read_file(&self.path).await {
            Ok(data) => data,
            Err(AnalyzerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let raw: Value = serde_json::from_slice(&data)?;
        let member = |key: &str| raw.get(key).cloned().unwrap_or(Value::Array(Vec::new()));

        let followers = CanonicalList::from_json(&member("followers"))?;
        let following = CanonicalList::from_json(&member("following"))?;
        let results = match raw.get("results") {
            Some(Value::Null) | None => None,
            Some(results) => Some(serde_json::from_value(results.clone())?),
        };
        let saved_at = match raw.get("savedAt") {
            Some(ts) => serde_json::from_value(ts.clone())?,
            None => Utc::now(),
        };

        Ok(Some(SessionState {
            followers,
            following,
            results,
            saved_at,
        }))
    }

    /// The saved lists, for re-running only the reconciliation.
    pub async fn load_lists(&self) -> Result<LoadedLists> {
        let state = self.load().await?.ok_or_else(|| AnalyzerError::StateNotFound {
            path: self.path.clone(),
        })?;

        Ok(LoadedLists {
            followers: state.followers,
            following: state.following,
        })
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_file(&self.path).await?;
        tracing::info!("Session cleared: {}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::core::reconcile::reconcile;
    use crate::domain::model::Identifier;
    use tempfile::TempDir;

    fn list(names: &[&str]) -> CanonicalList {
        names.iter().filter_map(|n| Identifier::parse(n)).collect()
    }

    #[tokio::test]
    async fn test_save_then_load_lists() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
        let store = SessionStore::new(&storage, "state.json");

        let lists = LoadedLists {
            followers: list(&["b", "c"]),
            following: list(&["a", "b"]),
        };
        let result = reconcile(&lists.following, &lists.followers);
        store.save(&lists, &result).await.unwrap();

        let saved = store.load().await.unwrap().unwrap();
        assert_eq!(saved.followers, lists.followers);
        assert_eq!(saved.results.as_ref(), Some(&result));

        let restored = store.load_lists().await.unwrap();
        assert_eq!(restored, lists);
        assert_eq!(
            reconcile(&restored.following, &restored.followers),
            result
        );
    }

    #[tokio::test]
    async fn test_missing_and_cleared_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
        let store = SessionStore::new(&storage, "state.json");

        assert!(store.load().await.unwrap().is_none());
        assert!(matches!(
            store.load_lists().await,
            Err(AnalyzerError::StateNotFound { .. })
        ));

        storage
            .write_file("state.json", br#"{"followers": ["x"], "following": []}"#)
            .await
            .unwrap();
        let lists = store.load_lists().await.unwrap();
        assert_eq!(lists.followers.len(), 1);
        assert!(lists.following.is_empty());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_lists_are_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());
        let store = SessionStore::new(&storage, "state.json");

        storage
            .write_file("state.json", br#"{"followers": {"a": 1}, "following": ["b"]}"#)
            .await
            .unwrap();
        assert!(matches!(
            store.load().await,
            Err(AnalyzerError::InvalidInput { .. })
        ));
    }
}
