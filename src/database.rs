//! # Database
//!
//! SQLite-backed key-value table used as the persistence medium for
//! adherence history.
//!
//! Every operation runs on tokio's blocking pool. A caller that stops waiting
//! does not stop the work: an update either commits in full or rolls back,
//! and is never left half-written.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::features::history::{BlobUpdate, KeyValueStore};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use sqlite::{Connection, ConnectionWithFullMutex, State};
use std::sync::{Arc, Mutex};

const BUSY_TIMEOUT_MS: usize = 5_000;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS key_value_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );
";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<ConnectionWithFullMutex>>,
}

impl Database {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub async fn new(path: &str) -> Result<Self> {
        let path = path.to_string();
        tokio::task::spawn_blocking(move || Self::open(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Database open task failed: {e}"))?
    }

    fn open(path: &str) -> Result<Self> {
        let mut connection = Connection::open_with_full_mutex(path)
            .map_err(|e| anyhow::anyhow!("Failed to open database {path}: {e}"))?;
        connection.set_busy_timeout(BUSY_TIMEOUT_MS)?;
        connection.execute(SCHEMA)?;

        info!("Opened adherence database at {path}");
        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run `op` with exclusive use of the connection on a blocking thread
    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| anyhow::anyhow!("Database connection lock poisoned"))?;
            op(&guard)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Database task failed: {e}"))?
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_connection(move |conn| read_value(conn, &key)).await
    }

    /// Read-modify-write `key` inside a single immediate transaction
    pub async fn update_value(&self, key: &str, apply: BlobUpdate) -> Result<()> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.execute("BEGIN IMMEDIATE")?;

            let outcome = read_value(conn, &key)
                .and_then(|current| apply(current))
                .and_then(|next| write_value(conn, &key, &next));

            match outcome.and_then(|_| conn.execute("COMMIT").map_err(anyhow::Error::from)) {
                Ok(()) => {
                    debug!("Committed update to {key}");
                    Ok(())
                }
                Err(e) => {
                    if let Err(rollback) = conn.execute("ROLLBACK") {
                        warn!("Rollback of {key} failed: {rollback}");
                    }
                    Err(e)
                }
            }
        })
        .await
    }

    pub async fn delete_value(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            let mut statement = conn.prepare("DELETE FROM key_value_store WHERE key = ?")?;
            statement.bind((1, key.as_str()))?;
            while statement.next()? != State::Done {}
            Ok(())
        })
        .await
    }
}

fn read_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut statement = conn.prepare("SELECT value FROM key_value_store WHERE key = ?")?;
    statement.bind((1, key))?;

    match statement.next()? {
        State::Row => Ok(Some(statement.read::<String, _>("value")?)),
        State::Done => Ok(None),
    }
}

fn write_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let mut statement = conn.prepare(
        "INSERT INTO key_value_store (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )?;
    statement.bind((1, key))?;
    statement.bind((2, value))?;
    statement.bind((3, chrono::Utc::now().timestamp()))?;
    while statement.next()? != State::Done {}
    Ok(())
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn update(&self, key: &str, apply: BlobUpdate) -> Result<()> {
        self.update_value(key, apply).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delete_value(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::history::{AdherenceHistoryStore, PredictionEntry};
    use crate::features::prediction::{DayOfWeek, TimeOfDay};

    fn entry(id: &str, percent: f64) -> PredictionEntry {
        PredictionEntry {
            id: id.to_string(),
            time_of_day: TimeOfDay::Night,
            day_of_week: DayOfWeek::Saturday,
            device_online: false,
            hours_since_last_dose: 6.25,
            probability_percent: percent,
        }
    }

    fn db_path(dir: &tempfile::TempDir) -> String {
        dir.path().join("adherence.db").to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_value_lifecycle() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.get_value("k").await.unwrap().is_none());

        db.update_value("k", Box::new(|_: Option<String>| Ok::<_, anyhow::Error>("v1".to_string())))
            .await
            .unwrap();
        db.update_value(
            "k",
            Box::new(|current: Option<String>| Ok::<_, anyhow::Error>(format!("{}-v2", current.unwrap_or_default()))),
        )
        .await
        .unwrap();
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("v1-v2"));

        db.delete_value("k").await.unwrap();
        db.delete_value("k").await.unwrap();
        assert!(db.get_value("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back() {
        let db = Database::new(":memory:").await.unwrap();
        db.update_value("k", Box::new(|_: Option<String>| Ok::<_, anyhow::Error>("kept".to_string())))
            .await
            .unwrap();

        let result = db
            .update_value(
                "k",
                Box::new(|_: Option<String>| -> anyhow::Result<String> {
                    Err(anyhow::anyhow!("rejected"))
                }),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("kept"));

        // The connection is usable again after the rollback
        db.update_value("k", Box::new(|_: Option<String>| Ok::<_, anyhow::Error>("next".to_string())))
            .await
            .unwrap();
        assert_eq!(db.get_value("k").await.unwrap().as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_path(&dir);

        {
            let history = AdherenceHistoryStore::new(Database::new(&path).await.unwrap());
            history.append("user-1", &entry("1", 12.0)).await.unwrap();
            history.append("user-1", &entry("2", 75.5)).await.unwrap();
        }

        let history = AdherenceHistoryStore::new(Database::new(&path).await.unwrap());
        let loaded = history.load("user-1").await.unwrap();
        assert_eq!(loaded, vec![entry("1", 12.0), entry("2", 75.5)]);

        history.clear("user-1").await.unwrap();
        assert!(history.load("user-1").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_separate_connections_do_not_lose_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = db_path(&dir);
        let first = Arc::new(AdherenceHistoryStore::new(Database::new(&path).await.unwrap()));
        let second = Arc::new(AdherenceHistoryStore::new(Database::new(&path).await.unwrap()));

        let mut handles = Vec::new();
        for i in 0..20 {
            let history = if i % 2 == 0 { first.clone() } else { second.clone() };
            handles.push(tokio::spawn(async move {
                history.append("shared", &entry(&i.to_string(), i as f64)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = first.load("shared").await.unwrap();
        assert_eq!(loaded.len(), 20);
    }

    #[test]
    fn test_database_is_shareable_across_tasks() {
        fn assert_shareable<T: Send + Sync + Clone + 'static>() {}
        assert_shareable::<Database>();
    }

    #[tokio::test]
    async fn test_unreachable_path_fails_to_open() {
        assert!(Database::new("/nonexistent-dir/deeper/adherence.db")
            .await
            .is_err());
    }
}
