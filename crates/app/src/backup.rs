use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ledger::{Backup, ExchangeLedger, KeyValueStore};

use crate::error::Result;

/// Writes the daily backup when one is due and records it in the ledger.
///
/// A failed write is logged and left for the next run; it never fails the
/// command that triggered it.
pub async fn run_due<S: KeyValueStore>(
    ledger: &mut ExchangeLedger,
    store: &S,
    directory: &Path,
    now: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    let Some(backup) = ledger.due_backup(now) else {
        return Ok(None);
    };

    let path = directory.join(backup.file_name());
    if let Err(err) = write_json(&path, &backup) {
        tracing::error!("automatic backup to {} failed: {err}", path.display());
        return Ok(None);
    }

    ledger
        .transact(store, |ledger| {
            ledger.mark_backed_up(now);
            Ok(())
        })
        .await?;
    tracing::info!("automatic backup written to {}", path.display());
    Ok(Some(path))
}

fn write_json(path: &Path, backup: &Backup) -> Result<()> {
    let json = serde_json::to_vec_pretty(backup)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use ledger::{BackupPreference, Currency, MemoryStore};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sarraf-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn writes_once_per_day() {
        let store = MemoryStore::new();
        let dir = scratch_dir("daily");
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        ledger
            .transact(&store, |ledger| {
                ledger.activate_premium(30, now())?;
                ledger.set_backup_preference(BackupPreference::Local);
                ledger.record_transaction(Currency::Usd, 500.0, now())?;
                Ok(())
            })
            .await
            .unwrap();

        let path = run_due(&mut ledger, &store, &dir, now())
            .await
            .unwrap()
            .unwrap();
        let backup: Backup = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(backup.transactions.len(), 1);
        assert_eq!(backup.total_profit, 1_000_000.0);
        assert_eq!(ledger.last_backup(), Some(now()));

        let again = run_due(&mut ledger, &store, &dir, now() + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(again, None);

        let reloaded = ExchangeLedger::load(&store).await.unwrap();
        assert_eq!(reloaded.last_backup(), Some(now()));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn free_plan_gets_no_backup() {
        let store = MemoryStore::new();
        let dir = scratch_dir("free");
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        ledger
            .transact(&store, |ledger| {
                ledger.set_backup_preference(BackupPreference::Local);
                ledger.record_transaction(Currency::Usd, 5.0, now())?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(run_due(&mut ledger, &store, &dir, now()).await.unwrap(), None);
        assert!(!dir.exists());
    }
}
