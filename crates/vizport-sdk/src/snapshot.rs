//! Saved application state
//!
//! The application reports each snapshot as one JSON object per response
//! field. The session id is not part of that object; it is the id the
//! snapshots were listed under.

use crate::error::{SdkError, SdkResult};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use vizport_core::Command;

/// A snapshot of layout, preferences and/or data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session the snapshot belongs to
    #[serde(skip)]
    pub session_id: String,
    /// Snapshot type reported by the application; empty until saved
    #[serde(rename = "type", default)]
    pub snapshot_type: String,
    /// Position in the application's list
    #[serde(default)]
    pub index: i64,
    /// Save name
    #[serde(rename = "Snapshot")]
    pub name: String,
    /// Whether the layout is included
    #[serde(default)]
    pub layout: bool,
    /// Whether preferences are included
    #[serde(default)]
    pub preferences: bool,
    /// Whether loaded data is included
    #[serde(default)]
    pub data: bool,
    #[serde(default)]
    pub description: String,
    /// Creation time as the application formatted it
    #[serde(rename = "dateCreated", default)]
    pub date_created: String,
}

impl Snapshot {
    /// Describe a snapshot that has not been saved yet
    pub fn new(
        session_id: impl Into<String>,
        name: impl Into<String>,
        layout: bool,
        preferences: bool,
        data: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            snapshot_type: String::new(),
            index: 0,
            name: name.into(),
            layout,
            preferences,
            data,
            description: description.into(),
            date_created: String::new(),
        }
    }

    /// Parse one field of a `getSnapshotObjects` response
    pub fn from_json(session_id: &str, field: &str) -> SdkResult<Self> {
        let mut snapshot: Snapshot = serde_json::from_str(field)
            .map_err(|e| SdkError::decode("getSnapshotObjects", e.to_string()))?;
        snapshot.session_id = session_id.to_string();
        Ok(snapshot)
    }

    /// Creation time, when the application wrote it as RFC 3339
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date_created).ok()
    }

    /// Whether the application has reported this snapshot back
    pub fn is_saved(&self) -> bool {
        !self.date_created.is_empty()
    }

    /// Command that stores this snapshot under its name
    pub fn save_command(&self) -> Command {
        Command::new("saveSnapshot")
            .arg("sessionId", self.session_id.as_str())
            .arg("saveName", self.name.as_str())
            .arg("saveLayout", self.layout)
            .arg("savePreferences", self.preferences)
            .arg("saveData", self.data)
            .arg("description", self.description.as_str())
    }

    /// Command that restores the application to this snapshot
    pub fn restore_command(&self) -> Command {
        Command::new("restoreSnapshot")
            .arg("sessionId", self.session_id.as_str())
            .arg("saveName", self.name.as_str())
    }

    /// Command that deletes this snapshot
    pub fn delete_command(&self) -> Command {
        Command::new("deleteSnapshot")
            .arg("sessionId", self.session_id.as_str())
            .arg("saveName", self.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTED: &str = r#"{"type":"Snapshot","index":2,"Snapshot":"before-zoom","layout":true,"preferences":false,"data":true,"description":"m42 with heat","dateCreated":"2016-03-04T10:21:07+00:00"}"#;

    #[test]
    fn test_parse_listed_snapshot() {
        let snapshot = Snapshot::from_json("session-7", LISTED).unwrap();
        assert_eq!(snapshot.session_id, "session-7");
        assert_eq!(snapshot.snapshot_type, "Snapshot");
        assert_eq!(snapshot.index, 2);
        assert_eq!(snapshot.name, "before-zoom");
        assert!(snapshot.layout);
        assert!(!snapshot.preferences);
        assert!(snapshot.data);
        assert!(snapshot.is_saved());

        let created = snapshot.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2016-03-04T10:21:07+00:00");
    }

    #[test]
    fn test_free_form_date_is_kept() {
        let json = r#"{"Snapshot":"s","dateCreated":"Fri Mar 4 10:21:07 2016"}"#;
        let snapshot = Snapshot::from_json("s1", json).unwrap();
        assert_eq!(snapshot.date_created, "Fri Mar 4 10:21:07 2016");
        assert!(snapshot.created_at().is_none());
    }

    #[test]
    fn test_bad_json_is_decode_error() {
        let err = Snapshot::from_json("s1", "{not json").unwrap_err();
        assert!(matches!(err, SdkError::Decode { .. }));
        // The name is required.
        assert!(Snapshot::from_json("s1", r#"{"index":1}"#).is_err());
    }

    #[test]
    fn test_new_is_unsaved() {
        let snapshot = Snapshot::new("s1", "draft", true, true, false, "work in progress");
        assert!(!snapshot.is_saved());
        assert_eq!(snapshot.index, 0);
        assert!(snapshot.snapshot_type.is_empty());
    }

    #[test]
    fn test_commands() {
        let snapshot = Snapshot::new("s1", "draft", true, false, false, "notes");
        let save = snapshot.save_command().encode().unwrap();
        assert_eq!(
            save,
            "saveSnapshot|description=notes|saveData=false|saveLayout=true|saveName=draft|savePreferences=false|sessionId=s1"
        );
        assert_eq!(
            snapshot.restore_command().encode().unwrap(),
            "restoreSnapshot|saveName=draft|sessionId=s1"
        );
        assert_eq!(snapshot.delete_command().name(), "deleteSnapshot");
    }
}
