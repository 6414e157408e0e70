//! Periodic backups of the label store.
//!
//! Spawns a loop that checks whether new labels have been submitted since
//! the last backup and, if so, copies the SQLite database file into the
//! backup directory and prunes old copies. Copying the file (rather than
//! querying the live store) means the backup never holds a lock that could
//! stall allocator reads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use roilabel_db::repositories::LabelRepo;
use roilabel_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::config::BackupConfig;

/// Run the backup loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    database_path: PathBuf,
    config: BackupConfig,
    cancel: CancellationToken,
) {
    if let Err(e) = tokio::fs::create_dir_all(&config.dir).await {
        tracing::error!(error = %e, dir = %config.dir.display(), "Backup: cannot create directory, task disabled");
        return;
    }

    let mut last_count = match LabelRepo::count_all(&pool).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Backup: initial label count failed, assuming zero");
            0
        }
    };

    tracing::info!(
        interval_secs = config.interval_secs,
        retention = config.retention_count,
        dir = %config.dir.display(),
        "Backup task started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Backup task stopping");
                break;
            }
            _ = interval.tick() => {
                match LabelRepo::count_all(&pool).await {
                    Ok(count) if count > last_count => {
                        match make_backup(&database_path, &config.dir).await {
                            Ok(backup_path) => {
                                tracing::info!(
                                    count,
                                    previous = last_count,
                                    path = %backup_path.display(),
                                    "Backup written"
                                );
                                last_count = count;
                                if let Err(e) = prune_backups(&config.dir, config.retention_count).await {
                                    tracing::error!(error = %e, "Backup: pruning failed");
                                }
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "Backup: copy failed");
                            }
                        }
                    }
                    Ok(_) => {
                        tracing::debug!("Backup: no new labels");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Backup: label count failed");
                    }
                }
            }
        }
    }
}

/// Copy the database file into the backup directory with a timestamped name.
async fn make_backup(database_path: &Path, backup_dir: &Path) -> std::io::Result<PathBuf> {
    let stem = database_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("labels");
    let backup_path = backup_dir.join(format!("{stem}_{}.db", chrono::Utc::now().timestamp()));
    tokio::fs::copy(database_path, &backup_path).await?;
    Ok(backup_path)
}

/// Delete all but the `retention_count` most recently modified backups.
async fn prune_backups(backup_dir: &Path, retention_count: usize) -> std::io::Result<()> {
    let mut backups = Vec::new();
    let mut entries = tokio::fs::read_dir(backup_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if metadata.is_file() {
            backups.push((metadata.modified()?, entry.path()));
        }
    }

    backups.sort_by_key(|(modified, _)| *modified);
    let expired = backups.len().saturating_sub(retention_count);
    for (_, path) in backups.into_iter().take(expired) {
        tracing::debug!(path = %path.display(), "Backup: removing expired backup");
        tokio::fs::remove_file(path).await?;
    }
    Ok(())
}
