//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! at the port boundary via `From`.

/// Top-level error type crossing the port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistence sink failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Publishing to the message bus failed.
    #[error("bus error")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A room name must not be empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A device id must not be empty.
    #[error("device id must not be empty")]
    EmptyDeviceId,

    /// An identifier in a request could not be parsed.
    #[error("malformed identifier: {0}")]
    MalformedId(String),
}

/// A lookup by id came up empty.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Human-readable record kind (e.g. `"Room"`).
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}
