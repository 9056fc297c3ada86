//! ballot-ledger: an in-memory record store for political actors, elections
//! and the candidacies linking them.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep two keyed collections (actors by name, elections by
//!   type/year/location) and a many-to-many relationship between them,
//!   with both sides of every link kept in step.
//! - Layers:
//!   - GrowableArray<T>: index-addressable sequence that doubles when
//!     full; every list the store hands out is one.
//!   - ProbeTable<K, V, S>: open-addressing table with linear probing and
//!     tombstones; grows and purges tombstones past its load ceiling;
//!     includes a debug-only reentrancy guard.
//!   - sort: insertion sort (names, years) and selection sort (votes)
//!     over GrowableArray.
//!   - RecordManager: owns the tables and the record arenas; the only
//!     place links are created or destroyed.
//!
//! Constraints
//! - Single-threaded: `ProbeTable` is `!Sync`; nothing here locks.
//! - Actor names are case-sensitive keys; the per-election uniqueness
//!   guard on candidacies compares names ignoring case.
//! - Missing records and duplicate keys are reported as `false`/`None`,
//!   never by panicking.
//!
//! Link representation
//! - Each candidacy is one entry in a slotmap arena. The actor's and the
//!   election's sequences hold the same `CandidacyId`, so an update made
//!   through either side is visible from the other.
//! - Deleting an actor or an election first unlinks each of its
//!   candidacies from the other owner; no sequence ever holds a dangling
//!   id.
//!
//! Hasher and rehashing invariants
//! - Each table entry stores its `u64` hash; rebuilding reuses it and
//!   never calls `K: Hash`.
//! - The hasher is a type parameter (`hashbrown`'s default builder unless
//!   overridden), so tests can force every key onto one chain.
//!
//! Notes and non-goals
//! - Snapshots (`Snapshot`) are plain serde data; reading and writing
//!   files is left to the caller.
//! - No concurrent access, no persistence engine, no UI.

mod config;
mod error;
mod growable_array;
mod model;
pub mod probe_table;
mod probe_table_proptest;
mod record_manager;
mod reentrancy;
mod snapshot;
pub mod sort;

// Public surface
pub use config::StoreConfig;
pub use error::{IndexOutOfRange, SnapshotError};
pub use growable_array::{GrowableArray, INITIAL_CAPACITY};
pub use model::{
    ActorId, CandidacyId, CandidacyLink, ElectionEvent, ElectionId, ElectionKey, PoliticalActor,
};
pub use probe_table::ProbeTable;
pub use record_manager::RecordManager;
pub use snapshot::{ActorRecord, CandidacyRecord, ElectionRecord, Snapshot};
pub use sort::SortOrder;
