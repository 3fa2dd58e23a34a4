use crate::errors::AppError;
use crate::store::AlarmStore;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

pub async fn load_store(path: &Path) -> AlarmStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AlarmStore>(&bytes) {
            Ok(store) => {
                info!(
                    alarms = store.list().len(),
                    deleted = store.deleted().len(),
                    "loaded alarms from {}",
                    path.display()
                );
                store
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                AlarmStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AlarmStore::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AlarmStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &AlarmStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlarmDraft;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("sunrise_alarm_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty_store() {
        let store = load_store(&temp_path("missing")).await;
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty_store() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{not json").await.unwrap();
        let store = load_store(&path).await;
        assert!(store.list().is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_store_loads_back() {
        let path = temp_path("persist");
        let mut store = AlarmStore::default();
        let alarm = store.create(AlarmDraft::default()).unwrap();
        persist_store(&path, &store).await.unwrap();

        let loaded = load_store(&path).await;
        assert_eq!(loaded.list(), &[alarm]);
        let _ = fs::remove_file(&path).await;
    }
}
