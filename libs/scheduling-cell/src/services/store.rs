use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{SchedulerError, StoreSnapshot};

/// Durable keyed collection of appointment records plus the monotonic id
/// counter, persisted as a single JSON document. Reload and commit move the
/// whole snapshot at once; there are no partial writes.
pub struct AppointmentStore {
    data_file: PathBuf,
}

impl AppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            data_file: config.appointments_data_file.clone(),
        }
    }

    pub fn with_path(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Re-read the durable medium. An unreadable or corrupt file degrades to
    /// an empty snapshot with a logged warning; the service stays available
    /// with a cold cache rather than failing every request.
    pub async fn reload(&self) -> StoreSnapshot {
        match self.read_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "Appointment store {} unreadable ({:#}); continuing with empty snapshot",
                    self.data_file.display(),
                    e
                );
                StoreSnapshot::default()
            }
        }
    }

    /// Persist the full snapshot atomically: serialize to a sibling temp file,
    /// then rename over the data file. Map, counter and last-updated timestamp
    /// always land together.
    pub async fn commit(&self, snapshot: &mut StoreSnapshot) -> Result<(), SchedulerError> {
        snapshot.last_updated = Some(chrono::Utc::now());

        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| SchedulerError::Storage(format!("serialize snapshot: {}", e)))?;

        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SchedulerError::Storage(format!("create data dir: {}", e)))?;
            }
        }

        let tmp_file = self.data_file.with_extension("json.tmp");
        tokio::fs::write(&tmp_file, &bytes)
            .await
            .map_err(|e| SchedulerError::Storage(format!("write snapshot: {}", e)))?;
        tokio::fs::rename(&tmp_file, &self.data_file)
            .await
            .map_err(|e| SchedulerError::Storage(format!("publish snapshot: {}", e)))?;

        debug!(
            "Committed {} appointments (counter {}) to {}",
            snapshot.appointments.len(),
            snapshot.counter,
            self.data_file.display()
        );
        Ok(())
    }

    /// Allocate the next appointment id against this snapshot. The increment
    /// only becomes durable at the following `commit`; callers hold the
    /// service write lock across both so ids never regress or collide.
    pub fn next_id(&self, snapshot: &mut StoreSnapshot, today: NaiveDate) -> String {
        snapshot.counter += 1;
        format!("APT-{}-{:04}", today.format("%Y%m%d"), snapshot.counter)
    }

    async fn read_snapshot(&self) -> Result<StoreSnapshot> {
        match tokio::fs::read(&self.data_file).await {
            Ok(bytes) => serde_json::from_slice(&bytes).context("parse appointment data"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreSnapshot::default()),
            Err(e) => Err(e).context("read appointment data"),
        }
    }
}
