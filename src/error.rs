/// Errors returned by the state catalog, statuses and the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("unknown state: {identifier}")]
    UnknownState { identifier: String },

    #[error("unknown component: {id}")]
    UnknownComponent { id: String },

    #[error("component already registered: {id}")]
    DuplicateComponent { id: String },

    #[error("invalid component descriptor: {reason}")]
    InvalidDescriptor { reason: String },
}

pub type Result<T> = std::result::Result<T, StatusError>;
