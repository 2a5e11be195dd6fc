use serde::Serialize;
use std::fmt;

use crate::lifecycle::StatusSnapshot;
use crate::types::{CurrentState, StateId};

/// Worst-case summary across every registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallStatus {
    pub state: CurrentState,
    pub title: &'static str,
    pub icon: &'static str,
    pub nickname: &'static str,
}

impl OverallStatus {
    /// Picks the highest-severity state, ignoring uninitialized components.
    /// With nothing initialized (or nothing at all) the result is
    /// `uninitialized`.
    pub fn aggregate<I>(states: I) -> Self
    where
        I: IntoIterator<Item = CurrentState>,
    {
        let worst = states
            .into_iter()
            .filter_map(|current| current.state())
            .max_by_key(StateId::severity);

        let state = worst.map_or(CurrentState::Uninitialized, CurrentState::State);
        Self {
            state,
            title: state.title(),
            icon: state.icon(),
            nickname: state.nickname(),
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.nickname)
    }
}

/// Full reporting payload. The `overall` and `statuses` keys are consumed by
/// external monitoring and must keep their names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrySnapshot {
    pub overall: OverallStatus,
    pub statuses: Vec<StatusSnapshot>,
}
