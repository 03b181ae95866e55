//! Error types.
//!
//! Gameplay itself never fails: a missing montage or a missing attacker turns
//! into a logged no-op. Errors are reserved for loading configuration and for
//! session bookkeeping (unknown actors, malformed collision shapes).

use std::path::PathBuf;

use hitscan::{ActorId, WorldError};

/// Error loading or validating configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file was not valid JSON for the expected type.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Error from a [`GameSession`](crate::session::GameSession) operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No actor with this id exists in the session.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// The actor exists but is not a player character.
    #[error("actor {0} is not a player character")]
    NotACharacter(ActorId),

    /// The collision world rejected an edit.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
