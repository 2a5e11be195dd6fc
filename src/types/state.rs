//! The fixed catalog of health states.
//!
//! Entries are ordered by increasing severity. Every state carries the
//! metadata used for display (title, icon) and a set of aliases accepted by
//! lenient transition calls. The first alias doubles as the state's nickname.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatusError};

pub const UNINITIALIZED_TITLE: &str = "Uninitialized";
pub const UNINITIALIZED_ICON: &str = "spinner";
pub const UNINITIALIZED_NICKNAME: &str = "Initializing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateId {
    Green,  // Healthy
    Yellow, // Degraded but serving
    Red,    // Not serving
}

impl StateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateId::Green => "green",
            StateId::Yellow => "yellow",
            StateId::Red => "red",
        }
    }

    /// Catalog entry for this identifier.
    pub fn state(&self) -> &'static State {
        match self {
            StateId::Green => &CATALOG[0],
            StateId::Yellow => &CATALOG[1],
            StateId::Red => &CATALOG[2],
        }
    }

    pub fn severity(&self) -> u16 {
        self.state().severity
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateId {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s).map(|state| state.id)
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct State {
    pub id: StateId,
    pub title: &'static str,
    pub icon: &'static str,
    pub severity: u16,
    pub aliases: &'static [&'static str],
}

impl State {
    /// Friendly display label, always the first alias.
    pub fn nickname(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.title)
    }

    fn matches(&self, identifier: &str) -> bool {
        self.id.as_str().eq_ignore_ascii_case(identifier)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(identifier))
    }
}

static CATALOG: [State; 3] = [
    State {
        id: StateId::Green,
        title: "Green",
        icon: "success",
        severity: 0,
        aliases: &["Looking good", "ok", "healthy", "up"],
    },
    State {
        id: StateId::Yellow,
        title: "Yellow",
        icon: "warning",
        severity: 400,
        aliases: &["S.N.A.F.U", "I'll be back", "brb", "degraded", "warn"],
    },
    State {
        id: StateId::Red,
        title: "Red",
        icon: "danger",
        severity: 1000,
        aliases: &[
            "Danger Will Robinson! Danger!",
            "danger",
            "unhealthy",
            "error",
            "down",
        ],
    },
];

/// Every state, healthiest first.
pub fn all() -> &'static [State] {
    &CATALOG
}

/// Finds a state by its canonical identifier (case-insensitive).
pub fn lookup(identifier: &str) -> Result<&'static State> {
    let identifier = identifier.trim();
    CATALOG
        .iter()
        .find(|state| state.id.as_str().eq_ignore_ascii_case(identifier))
        .ok_or_else(|| StatusError::UnknownState {
            identifier: identifier.to_string(),
        })
}

/// Like [`lookup`], but also accepts any alias of a state.
pub fn resolve(identifier: &str) -> Result<&'static State> {
    let identifier = identifier.trim();
    CATALOG
        .iter()
        .find(|state| state.matches(identifier))
        .ok_or_else(|| StatusError::UnknownState {
            identifier: identifier.to_string(),
        })
}

pub fn severity_of(state: &State) -> u16 {
    state.severity
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ordered_by_severity() {
        let ranks: Vec<u16> = all().iter().map(severity_of).collect();
        assert_eq!(ranks.len(), 3);
        assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));

        assert!(StateId::Green.severity() < StateId::Yellow.severity());
        assert!(StateId::Yellow.severity() < StateId::Red.severity());
    }

    #[test]
    fn test_lookup_canonical_ids() {
        assert_eq!(lookup("green").unwrap().id, StateId::Green);
        assert_eq!(lookup("YELLOW").unwrap().id, StateId::Yellow);
        assert_eq!(lookup(" red ").unwrap().id, StateId::Red);
    }

    #[test]
    fn test_lookup_rejects_aliases_and_unknown() {
        assert_eq!(
            lookup("ok"),
            Err(StatusError::UnknownState {
                identifier: "ok".to_string()
            })
        );
        assert!(lookup("blue").is_err());
        assert!(lookup("uninitialized").is_err());
    }

    #[test]
    fn test_resolve_aliases_case_insensitive() {
        for state in all() {
            for alias in state.aliases {
                assert_eq!(resolve(alias).unwrap().id, state.id);
                assert_eq!(resolve(&alias.to_uppercase()).unwrap().id, state.id);
            }
            assert_eq!(resolve(state.id.as_str()).unwrap().id, state.id);
        }
        assert!(resolve("purple").is_err());
        assert!(resolve("").is_err());
    }

    #[test]
    fn test_aliases_do_not_overlap() {
        let mut seen = HashSet::new();
        for state in all() {
            assert!(!state.aliases.is_empty());
            assert!(seen.insert(state.id.as_str().to_lowercase()));
            for alias in state.aliases {
                assert!(
                    seen.insert(alias.to_lowercase()),
                    "alias {alias} is claimed twice"
                );
            }
        }
    }

    #[test]
    fn test_nickname_is_first_alias() {
        for state in all() {
            assert_eq!(state.nickname(), state.aliases[0]);
        }
        assert_eq!(StateId::Green.state().nickname(), "Looking good");
    }

    #[test]
    fn test_state_id_from_str() {
        assert_eq!("red".parse::<StateId>().unwrap(), StateId::Red);
        assert!("brb".parse::<StateId>().is_err());
        assert_eq!(StateId::Yellow.to_string(), "yellow");
    }
}
