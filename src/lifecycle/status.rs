use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::types::state::{self, StateId};
use crate::types::{ComponentDescriptor, CurrentState};

/// Read-only view of a status, as reported to health consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub name: String,
    pub version: String,
    pub state: CurrentState,
    pub icon: &'static str,
    pub title: &'static str,
    pub message: Option<String>,
    pub since: DateTime<Utc>,
}

/// Published after every successful transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChange {
    pub name: String,
    pub previous: CurrentState,
    pub state: CurrentState,
    pub message: Option<String>,
    pub since: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Record {
    state: CurrentState,
    message: Option<String>,
    since: DateTime<Utc>,
}

/// Mutable health record of one component.
///
/// State, message and timestamp live behind a single lock, so a reader sees
/// either the whole previous transition or the whole next one.
#[derive(Debug)]
pub struct Status {
    name: String,
    version: String,
    record: RwLock<Record>,
    changes: Option<broadcast::Sender<StatusChange>>,
}

impl Status {
    /// Creates a detached status in the `uninitialized` state. Statuses handed
    /// out by a registry also publish their transitions.
    pub fn new(descriptor: &ComponentDescriptor) -> Self {
        Self {
            name: descriptor.id.clone(),
            version: descriptor.version.clone(),
            record: RwLock::new(Record {
                state: CurrentState::Uninitialized,
                message: None,
                since: Utc::now(),
            }),
            changes: None,
        }
    }

    pub(crate) fn with_changes(
        descriptor: &ComponentDescriptor,
        changes: broadcast::Sender<StatusChange>,
    ) -> Self {
        Self {
            changes: Some(changes),
            ..Self::new(descriptor)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Moves to the state named by `identifier`, which may be a canonical id
    /// or any alias (case-insensitive). On error nothing changes.
    pub fn transition_to(&self, identifier: &str, message: Option<&str>) -> Result<()> {
        let state = state::resolve(identifier)?;
        self.transition(state.id, message);
        Ok(())
    }

    pub fn transition(&self, id: StateId, message: Option<&str>) {
        let change = {
            let mut record = self.write();
            let previous = record.state;
            *record = Record {
                state: CurrentState::State(id),
                message: message.map(str::to_string),
                since: Utc::now(),
            };

            let change = StatusChange {
                name: self.name.clone(),
                previous,
                state: record.state,
                message: record.message.clone(),
                since: record.since,
            };
            if let Some(changes) = &self.changes {
                // Err only means nobody is subscribed.
                let _ = changes.send(change.clone());
            }
            change
        };

        log_change(&change);
    }

    pub fn green(&self, message: Option<&str>) {
        self.transition(StateId::Green, message);
    }

    pub fn yellow(&self, message: Option<&str>) {
        self.transition(StateId::Yellow, message);
    }

    pub fn red(&self, message: Option<&str>) {
        self.transition(StateId::Red, message);
    }

    pub fn current_state(&self) -> CurrentState {
        self.read().state
    }

    pub fn message(&self) -> Option<String> {
        self.read().message.clone()
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.read().since
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let record = self.read().clone();
        StatusSnapshot {
            name: self.name.clone(),
            version: self.version.clone(),
            state: record.state,
            icon: record.state.icon(),
            title: record.state.title(),
            message: record.message,
            since: record.since,
        }
    }

    // A panic can't leave a Record half-written, so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Record> {
        self.record.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Record> {
        self.record.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_change(change: &StatusChange) {
    let detail = change
        .message
        .as_deref()
        .map(|message| format!(" - {message}"))
        .unwrap_or_default();

    if change.state == CurrentState::State(StateId::Red) {
        log::error!(
            "[status][{}] changed from {} to {}{}",
            change.name,
            change.previous,
            change.state,
            detail
        );
    } else {
        log::info!(
            "[status][{}] changed from {} to {}{}",
            change.name,
            change.previous,
            change.state,
            detail
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusError;

    fn create_test_status() -> Status {
        Status::new(&ComponentDescriptor::new("name", "1.2.3"))
    }

    #[test]
    fn test_new_status_is_uninitialized() {
        let status = create_test_status();
        assert_eq!(status.current_state(), CurrentState::Uninitialized);
        assert_eq!(status.name(), "name");
        assert_eq!(status.version(), "1.2.3");
        assert!(status.message().is_none());
    }

    #[test]
    fn test_shorthands() {
        let status = create_test_status();

        status.green(None);
        assert_eq!(status.current_state(), "green");

        status.yellow(Some("slow"));
        assert_eq!(status.current_state(), "yellow");
        assert_eq!(status.message().as_deref(), Some("slow"));

        status.red(Some("down"));
        assert_eq!(status.current_state(), "red");

        status.green(None);
        assert_eq!(status.current_state(), "green");
    }

    #[test]
    fn test_aliases_match_canonical_transitions() {
        for state in state::all() {
            let canonical = create_test_status();
            canonical.transition_to(state.id.as_str(), None).unwrap();

            for alias in state.aliases {
                let aliased = create_test_status();
                aliased.transition_to(&alias.to_lowercase(), None).unwrap();
                assert_eq!(aliased.current_state(), canonical.current_state());

                aliased.transition_to(&alias.to_uppercase(), None).unwrap();
                assert_eq!(aliased.current_state(), canonical.current_state());
            }
        }
    }

    #[test]
    fn test_invalid_transition_leaves_status_unchanged() {
        let status = create_test_status();
        status.yellow(Some("warming up"));
        let before = status.snapshot();

        let result = status.transition_to("mauve", Some("ignored"));
        assert_eq!(
            result,
            Err(StatusError::UnknownState {
                identifier: "mauve".to_string()
            })
        );
        assert_eq!(status.snapshot(), before);
    }

    #[test]
    fn test_invalid_transition_on_fresh_status() {
        let status = create_test_status();
        assert!(status.transition_to("uninitialized", None).is_err());
        assert_eq!(status.current_state(), CurrentState::Uninitialized);
    }

    #[test]
    fn test_transition_clears_message_when_omitted() {
        let status = create_test_status();
        status.red(Some("connection refused"));
        status.transition_to("ok", None).unwrap();
        assert!(status.message().is_none());
    }

    #[test]
    fn test_transition_refreshes_timestamp() {
        let status = create_test_status();
        let created = status.since();

        status.green(None);
        let first = status.since();
        assert!(first >= created);

        status.green(None);
        assert!(status.since() >= first);
    }

    #[test]
    fn test_snapshot_uses_placeholders_when_uninitialized() {
        let snapshot = create_test_status().snapshot();
        assert_eq!(snapshot.state, CurrentState::Uninitialized);
        assert_eq!(snapshot.title, "Uninitialized");
        assert_eq!(snapshot.icon, "spinner");
        assert!(snapshot.message.is_none());
    }

    #[test]
    fn test_snapshot_resolves_catalog_metadata() {
        let status = create_test_status();
        status.red(Some("disk full"));

        let json = serde_json::to_value(status.snapshot()).unwrap();
        assert_eq!(json["name"], "name");
        assert_eq!(json["version"], "1.2.3");
        assert_eq!(json["state"], "red");
        assert_eq!(json["title"], "Red");
        assert_eq!(json["icon"], "danger");
        assert_eq!(json["message"], "disk full");
        assert!(json["since"].is_string());
    }

    #[test]
    fn test_transitions_are_published() {
        let (tx, mut rx) = broadcast::channel(8);
        let status = Status::with_changes(&ComponentDescriptor::new("name", "1.2.3"), tx);

        status.yellow(Some("starting"));
        status.green(None);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.previous, CurrentState::Uninitialized);
        assert_eq!(first.state, "yellow");
        assert_eq!(first.message.as_deref(), Some("starting"));

        let second = rx.try_recv().unwrap();
        assert_eq!(second.previous, "yellow");
        assert_eq!(second.state, "green");
    }

    #[test]
    fn test_failed_transition_publishes_nothing() {
        let (tx, mut rx) = broadcast::channel(8);
        let status = Status::with_changes(&ComponentDescriptor::new("name", "1.2.3"), tx);

        assert!(status.transition_to("nope", None).is_err());
        assert!(rx.try_recv().is_err());
    }
}
