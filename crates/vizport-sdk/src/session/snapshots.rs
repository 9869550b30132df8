//! Snapshot management

use super::Session;
use crate::error::SdkResult;
use crate::snapshot::Snapshot;
use tracing::{debug, instrument};
use vizport_core::Command;

impl Session {
    /// Describe a new snapshot; nothing is sent until it is saved
    ///
    /// Thin alias of [`Snapshot::new`], kept on the session so scripts can
    /// build and save snapshots through one handle.
    pub fn new_snapshot(
        &self,
        session_id: &str,
        name: &str,
        layout: bool,
        preferences: bool,
        data: bool,
        description: &str,
    ) -> Snapshot {
        Snapshot::new(session_id, name, layout, preferences, data, description)
    }

    /// Snapshots saved under `session_id`
    #[instrument(skip(self))]
    pub async fn snapshots(&mut self, session_id: &str) -> SdkResult<Vec<Snapshot>> {
        let command = Command::new("getSnapshotObjects").arg("sessionId", session_id);
        let fields = self.execute_list(&command).await?;
        debug!(count = fields.len(), "listed snapshots");
        fields
            .iter()
            .map(|field| Snapshot::from_json(session_id, field))
            .collect()
    }

    /// Store `snapshot` in the application
    #[instrument(skip(self, snapshot), fields(name = %snapshot.name))]
    pub async fn save_snapshot(&mut self, snapshot: &Snapshot) -> SdkResult<()> {
        self.execute_void(&snapshot.save_command()).await
    }

    /// Restore the application to `snapshot`
    #[instrument(skip(self, snapshot), fields(name = %snapshot.name))]
    pub async fn restore_snapshot(&mut self, snapshot: &Snapshot) -> SdkResult<()> {
        self.execute_void(&snapshot.restore_command()).await
    }

    /// Delete `snapshot` from the application
    #[instrument(skip(self, snapshot), fields(name = %snapshot.name))]
    pub async fn delete_snapshot(&mut self, snapshot: &Snapshot) -> SdkResult<()> {
        self.execute_void(&snapshot.delete_command()).await
    }
}
