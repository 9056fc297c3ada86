//! Entity records and the arena handles that link them.
//!
//! Actors, elections and candidacy links each live in their own slotmap
//! arena inside [`RecordManager`](crate::RecordManager). A candidacy link is
//! one arena entry; the actor's and the election's sequences both hold its
//! [`CandidacyId`], so the two sequences are views onto one shared record.

use crate::growable_array::GrowableArray;
use core::fmt;
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Handle to a [`PoliticalActor`] in its manager's arena.
    pub struct ActorId;
    /// Handle to an [`ElectionEvent`] in its manager's arena.
    pub struct ElectionId;
    /// Handle to a [`CandidacyLink`] in its manager's arena.
    pub struct CandidacyId;
}

/// Identity of an election: `(type, year, location)` as one structured key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElectionKey {
    pub kind: String,
    pub year: i32,
    pub location: String,
}

impl ElectionKey {
    pub fn new(kind: impl Into<String>, year: i32, location: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            year,
            location: location.into(),
        }
    }
}

impl fmt::Display for ElectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.year, self.location)
    }
}

/// A political actor, identified by full name (case-sensitive).
#[derive(Debug, Clone)]
pub struct PoliticalActor {
    name: String,
    date_of_birth: String,
    party: String,
    county: String,
    image_url: String,
    candidacies: GrowableArray<CandidacyId>,
}

impl PoliticalActor {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
        party: impl Into<String>,
        county: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            party: party.into(),
            county: county.into(),
            image_url: image_url.into(),
            candidacies: GrowableArray::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }

    /// Current party; see [`CandidacyLink::party_at_time`] for historical ones.
    pub fn party(&self) -> &str {
        &self.party
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Every election this actor has contested, in link order.
    pub fn candidacies(&self) -> &GrowableArray<CandidacyId> {
        &self.candidacies
    }

    pub(crate) fn candidacies_mut(&mut self) -> &mut GrowableArray<CandidacyId> {
        &mut self.candidacies
    }

    pub(crate) fn update_details(
        &mut self,
        name: &str,
        date_of_birth: &str,
        party: &str,
        county: &str,
        image_url: &str,
    ) {
        self.name = name.to_owned();
        self.date_of_birth = date_of_birth.to_owned();
        self.party = party.to_owned();
        self.county = county.to_owned();
        self.image_url = image_url.to_owned();
    }
}

/// An election event, identified by its [`ElectionKey`].
#[derive(Debug, Clone)]
pub struct ElectionEvent {
    kind: String,
    location: String,
    year: i32,
    seats: u32,
    candidates: GrowableArray<CandidacyId>,
}

impl ElectionEvent {
    pub fn new(kind: impl Into<String>, location: impl Into<String>, year: i32, seats: u32) -> Self {
        Self {
            kind: kind.into(),
            location: location.into(),
            year,
            seats,
            candidates: GrowableArray::new(),
        }
    }

    /// Election type, e.g. "General" or "Local".
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Number of seats (winners) the election fills.
    pub fn seats(&self) -> u32 {
        self.seats
    }

    pub fn key(&self) -> ElectionKey {
        ElectionKey::new(self.kind.as_str(), self.year, self.location.as_str())
    }

    /// Candidacies in this election, in link order.
    pub fn candidates(&self) -> &GrowableArray<CandidacyId> {
        &self.candidates
    }

    pub(crate) fn candidates_mut(&mut self) -> &mut GrowableArray<CandidacyId> {
        &mut self.candidates
    }

    pub(crate) fn update_details(&mut self, key: &ElectionKey, seats: u32) {
        self.kind = key.kind.clone();
        self.location = key.location.clone();
        self.year = key.year;
        self.seats = seats;
    }
}

/// One actor's participation in one election.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidacyLink {
    actor: ActorId,
    election: ElectionId,
    party_at_time: String,
    votes: u64,
}

impl CandidacyLink {
    pub(crate) fn new(actor: ActorId, election: ElectionId, party_at_time: &str, votes: u64) -> Self {
        Self {
            actor,
            election,
            party_at_time: party_at_time.to_owned(),
            votes,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn election(&self) -> ElectionId {
        self.election
    }

    /// Party the actor stood for in this election.
    pub fn party_at_time(&self) -> &str {
        &self.party_at_time
    }

    pub fn votes(&self) -> u64 {
        self.votes
    }

    pub(crate) fn update(&mut self, party_at_time: &str, votes: u64) {
        self.party_at_time = party_at_time.to_owned();
        self.votes = votes;
    }
}
