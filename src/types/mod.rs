pub mod descriptor;
pub mod state;

pub use descriptor::ComponentDescriptor;
pub use state::{State, StateId};

use serde::{Serialize, Serializer};
use std::fmt;

/// What a status reports: a catalog state, or the marker it holds before its
/// first transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentState {
    Uninitialized,
    State(StateId),
}

impl CurrentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentState::Uninitialized => "uninitialized",
            CurrentState::State(id) => id.as_str(),
        }
    }

    pub fn state(&self) -> Option<StateId> {
        match self {
            CurrentState::Uninitialized => None,
            CurrentState::State(id) => Some(*id),
        }
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, CurrentState::Uninitialized)
    }

    pub fn title(&self) -> &'static str {
        self.state()
            .map_or(state::UNINITIALIZED_TITLE, |id| id.state().title)
    }

    pub fn icon(&self) -> &'static str {
        self.state()
            .map_or(state::UNINITIALIZED_ICON, |id| id.state().icon)
    }

    pub fn nickname(&self) -> &'static str {
        self.state()
            .map_or(state::UNINITIALIZED_NICKNAME, |id| id.state().nickname())
    }
}

impl From<StateId> for CurrentState {
    fn from(id: StateId) -> Self {
        CurrentState::State(id)
    }
}

impl PartialEq<&str> for CurrentState {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for CurrentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CurrentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
