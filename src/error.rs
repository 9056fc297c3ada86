//! Error types.
//!
//! Duplicate keys and missing records are ordinary outcomes and surface as
//! `bool` / `Option` on [`RecordManager`](crate::RecordManager). The types
//! here cover caller bugs (bad indices) and inconsistent snapshots.

use thiserror::Error;

/// An index outside `[0, len)` was passed to a [`GrowableArray`](crate::GrowableArray).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for length {len}")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Reasons a [`Snapshot`](crate::Snapshot) cannot be imported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("actor `{0}` appears more than once")]
    DuplicateActor(String),

    #[error("election {0} appears more than once")]
    DuplicateElection(String),

    #[error("candidacy {candidacy} refers to missing actor position {actor}")]
    UnknownActor { candidacy: usize, actor: usize },

    #[error("candidacy {candidacy} refers to missing election position {election}")]
    UnknownElection { candidacy: usize, election: usize },

    #[error("actor `{actor}` lists missing candidacy position {candidacy}")]
    UnknownCandidacy { actor: String, candidacy: usize },

    #[error("candidacy {candidacy} is listed by actor `{listed_by}` but belongs to another actor")]
    MisattributedCandidacy { candidacy: usize, listed_by: String },

    #[error("candidacy {candidacy} is listed {count} times by its actor")]
    CandidacyListing { candidacy: usize, count: usize },

    #[error("actor `{actor}` stands twice in election {election}")]
    DuplicateCandidacy { actor: String, election: String },
}
