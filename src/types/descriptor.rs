use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatusError};

/// Identity a component supplies when it registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub id: String,
    pub version: String,
}

impl ComponentDescriptor {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Checks the fields a registry relies on. Ids are used as lookup keys,
    /// so they must be non-empty and free of whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.id.chars().any(char::is_whitespace) {
            return Err(invalid(format!("id {:?} contains whitespace", self.id)));
        }
        if self.version.trim().is_empty() {
            return Err(invalid(format!("component {} has an empty version", self.id)));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> StatusError {
    StatusError::InvalidDescriptor {
        reason: reason.into(),
    }
}

impl fmt::Display for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

/// Parses `id@version`.
impl FromStr for ComponentDescriptor {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self> {
        let (id, version) = s
            .rsplit_once('@')
            .ok_or_else(|| invalid(format!("expected id@version, got {s:?}")))?;
        let descriptor = Self::new(id.trim(), version.trim());
        descriptor.validate()?;
        Ok(descriptor)
    }
}
