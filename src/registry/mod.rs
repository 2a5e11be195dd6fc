//! Process-wide collection of component statuses.
//!
//! A registry is built once at startup and shared as `Arc<StatusRegistry>`
//! with every component that needs to register. Entries are never removed.

pub mod overall;

pub use overall::{OverallStatus, RegistrySnapshot};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

use crate::error::{Result, StatusError};
use crate::lifecycle::{Status, StatusChange, StatusSnapshot};
use crate::types::{ComponentDescriptor, CurrentState, StateId};

const CHANGE_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct Entries {
    order: Vec<Arc<Status>>,
    index: HashMap<String, usize>,
}

#[derive(Debug)]
pub struct StatusRegistry {
    entries: RwLock<Entries>,
    changes: broadcast::Sender<StatusChange>,
    created_at: DateTime<Utc>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            entries: RwLock::new(Entries::default()),
            changes,
            created_at: Utc::now(),
        }
    }

    /// Registers a component and hands back its status handle.
    ///
    /// Ids are unique: a second registration under the same id fails with
    /// [`StatusError::DuplicateComponent`] and leaves the first one in place.
    pub fn create(&self, descriptor: &ComponentDescriptor) -> Result<Arc<Status>> {
        descriptor.validate()?;

        let mut entries = self.write();
        if entries.index.contains_key(&descriptor.id) {
            log::warn!(
                "[status][{}] rejected duplicate registration ({})",
                descriptor.id,
                descriptor
            );
            return Err(StatusError::DuplicateComponent {
                id: descriptor.id.clone(),
            });
        }

        let status = Arc::new(Status::with_changes(descriptor, self.changes.clone()));
        let position = entries.order.len();
        entries.index.insert(descriptor.id.clone(), position);
        entries.order.push(Arc::clone(&status));
        drop(entries);

        log::info!(
            "[status][{}] registered version {}",
            descriptor.id,
            descriptor.version
        );
        Ok(status)
    }

    pub fn get(&self, id: &str) -> Result<Arc<Status>> {
        let entries = self.read();
        entries
            .index
            .get(id)
            .map(|&position| Arc::clone(&entries.order[position]))
            .ok_or_else(|| StatusError::UnknownComponent { id: id.to_string() })
    }

    pub fn get_state(&self, id: &str) -> Result<CurrentState> {
        Ok(self.get(id)?.current_state())
    }

    /// Handles for every registered component, in registration order.
    pub fn statuses(&self) -> Vec<Arc<Status>> {
        self.read().order.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.read()
            .order
            .iter()
            .map(|status| status.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overall(&self) -> OverallStatus {
        OverallStatus::aggregate(
            self.statuses()
                .iter()
                .map(|status| status.current_state()),
        )
    }

    pub fn is_green(&self) -> bool {
        self.overall().state == CurrentState::State(StateId::Green)
    }

    pub fn not_green(&self) -> bool {
        !self.is_green()
    }

    /// Snapshot of every status plus the aggregate derived from those same
    /// snapshots. Never fails and never mutates a status.
    pub fn to_serializable(&self) -> RegistrySnapshot {
        let statuses: Vec<StatusSnapshot> = self
            .statuses()
            .iter()
            .map(|status| status.snapshot())
            .collect();
        let overall = OverallStatus::aggregate(statuses.iter().map(|snapshot| snapshot.state));

        log::debug!(
            "status snapshot: {} components, overall {}",
            statuses.len(),
            overall.state
        );
        RegistrySnapshot { overall, statuses }
    }

    /// Receives every transition made through statuses created here.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.changes.subscribe()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.overall(), f)
    }
}

impl Serialize for StatusRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_serializable().serialize(serializer)
    }
}
