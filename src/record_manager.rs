//! RecordManager: owns every record and keeps the actor/election links consistent.
//!
//! Storage
//! - Three slotmap arenas hold actors, elections and candidacy links.
//! - Two [`ProbeTable`]s map identities to arena handles: actor name ->
//!   [`ActorId`], [`ElectionKey`] -> [`ElectionId`].
//! - A candidacy link is stored once; the actor's and the election's
//!   sequences both hold its [`CandidacyId`].
//!
//! Invariants
//! - Every `CandidacyId` in any sequence resolves in the link arena, and
//!   appears exactly once in its election's sequence and exactly once in its
//!   actor's sequence.
//! - At most one link exists per (actor, election); the guard compares actor
//!   names ignoring case.
//! - Each live actor/election is reachable from exactly one table key, the
//!   one derived from its current fields.
//!
//! Duplicate keys and missing records are reported through `bool` /
//! `Option` results; nothing is mutated on those paths.

use crate::config::StoreConfig;
use crate::growable_array::GrowableArray;
use crate::model::{
    ActorId, CandidacyId, CandidacyLink, ElectionEvent, ElectionId, ElectionKey, PoliticalActor,
};
use crate::probe_table::ProbeTable;
use crate::sort::{self, cmp_ignore_case, SortOrder};
use core::cmp::Ordering;
use slotmap::SlotMap;
use tracing::debug;

#[derive(Debug)]
pub struct RecordManager {
    pub(crate) config: StoreConfig,
    pub(crate) actor_index: ProbeTable<String, ActorId>,
    pub(crate) election_index: ProbeTable<ElectionKey, ElectionId>,
    pub(crate) actors: SlotMap<ActorId, PoliticalActor>,
    pub(crate) elections: SlotMap<ElectionId, ElectionEvent>,
    pub(crate) candidacies: SlotMap<CandidacyId, CandidacyLink>,
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    cmp_ignore_case(a, b) == Ordering::Equal
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Default for RecordManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordManager {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            actor_index: ProbeTable::with_capacity(config.actor_capacity)
                .with_max_load_factor(config.max_load_factor),
            election_index: ProbeTable::with_capacity(config.election_capacity)
                .with_max_load_factor(config.max_load_factor),
            actors: SlotMap::with_key(),
            elections: SlotMap::with_key(),
            candidacies: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn actor_count(&self) -> usize {
        self.actor_index.len()
    }

    pub fn election_count(&self) -> usize {
        self.election_index.len()
    }

    pub fn candidacy_count(&self) -> usize {
        self.candidacies.len()
    }

    // ---- actors ----

    /// Adds an actor. Returns `false` if `name` is already taken.
    pub fn add_actor(
        &mut self,
        name: &str,
        date_of_birth: &str,
        party: &str,
        county: &str,
        image_url: &str,
    ) -> bool {
        self.insert_actor(name, date_of_birth, party, county, image_url)
            .is_some()
    }

    pub(crate) fn insert_actor(
        &mut self,
        name: &str,
        date_of_birth: &str,
        party: &str,
        county: &str,
        image_url: &str,
    ) -> Option<ActorId> {
        if self.actor_index.contains_key(name) {
            debug!(actor = name, "rejected duplicate actor");
            return None;
        }
        let id = self.actors.insert(PoliticalActor::new(
            name,
            date_of_birth,
            party,
            county,
            image_url,
        ));
        self.actor_index.put(name.to_owned(), id);
        debug!(actor = name, "added actor");
        Some(id)
    }

    pub fn get_actor(&self, name: &str) -> Option<&PoliticalActor> {
        self.actor_index
            .get(name)
            .and_then(|id| self.actors.get(*id))
    }

    pub fn actor_id(&self, name: &str) -> Option<ActorId> {
        self.actor_index.get(name).copied()
    }

    pub fn actor_by_id(&self, id: ActorId) -> Option<&PoliticalActor> {
        self.actors.get(id)
    }

    /// Updates an actor in place; a changed name moves it to the new key.
    ///
    /// Returns `false` if `name` is unknown, `new_name` belongs to a
    /// different actor, or `new_name` matches (ignoring case) a fellow
    /// candidate in one of this actor's elections.
    pub fn update_actor(
        &mut self,
        name: &str,
        new_name: &str,
        date_of_birth: &str,
        party: &str,
        county: &str,
        image_url: &str,
    ) -> bool {
        let Some(id) = self.actor_id(name) else {
            return false;
        };
        let renamed = name != new_name;
        if renamed && self.actor_index.contains_key(new_name) {
            debug!(actor = name, new_name, "rejected rename onto existing actor");
            return false;
        }
        if renamed && self.rename_collides(id, new_name) {
            debug!(actor = name, new_name, "rejected rename onto a fellow candidate's name");
            return false;
        }

        if renamed {
            self.actor_index.remove(name);
        }
        let actor = self
            .actors
            .get_mut(id)
            .expect("indexed actor lives in the arena");
        actor.update_details(new_name, date_of_birth, party, county, image_url);
        if renamed {
            self.actor_index.put(new_name.to_owned(), id);
        }
        debug!(actor = new_name, renamed, "updated actor");
        true
    }

    /// True when another candidate in one of `id`'s elections already goes
    /// by `new_name`, ignoring case.
    fn rename_collides(&self, id: ActorId, new_name: &str) -> bool {
        let Some(actor) = self.actors.get(id) else {
            return false;
        };
        actor.candidacies().iter().any(|cid| {
            let Some(election) = self
                .candidacies
                .get(*cid)
                .and_then(|link| self.elections.get(link.election()))
            else {
                return false;
            };
            election.candidates().iter().any(|other| {
                self.candidacies
                    .get(*other)
                    .filter(|link| link.actor() != id)
                    .and_then(|link| self.actors.get(link.actor()))
                    .is_some_and(|a| eq_ignore_case(a.name(), new_name))
            })
        })
    }

    /// Deletes an actor, first unlinking each of its candidacies from the
    /// election that lists it.
    pub fn delete_actor(&mut self, name: &str) -> bool {
        let Some(id) = self.actor_index.remove(name) else {
            return false;
        };
        let actor = self
            .actors
            .remove(id)
            .expect("indexed actor lives in the arena");

        for &cid in actor.candidacies() {
            let link = self
                .candidacies
                .remove(cid)
                .expect("listed candidacy lives in the arena");
            if let Some(election) = self.elections.get_mut(link.election()) {
                if let Some(idx) = election.candidates().position(|c| *c == cid) {
                    election
                        .candidates_mut()
                        .remove(idx)
                        .expect("position came from the same sequence");
                }
            }
        }
        debug!(
            actor = name,
            unlinked = actor.candidacies().len(),
            "deleted actor"
        );
        true
    }

    /// Every actor, in table-scan order.
    pub fn all_actors(&self) -> GrowableArray<&PoliticalActor> {
        self.scan_actors(|_| true)
    }

    /// Actors whose name contains `part`, ignoring case.
    pub fn search_actors_by_name(&self, part: &str) -> GrowableArray<&PoliticalActor> {
        self.scan_actors(|a| contains_ignore_case(a.name(), part))
    }

    /// Actors whose party equals `party`, ignoring case.
    pub fn search_actors_by_party(&self, party: &str) -> GrowableArray<&PoliticalActor> {
        self.scan_actors(|a| eq_ignore_case(a.party(), party))
    }

    /// Actors whose county equals `county`, ignoring case.
    pub fn search_actors_by_county(&self, county: &str) -> GrowableArray<&PoliticalActor> {
        self.scan_actors(|a| eq_ignore_case(a.county(), county))
    }

    pub fn search_actors_by_name_sorted(&self, part: &str) -> GrowableArray<&PoliticalActor> {
        let mut out = self.search_actors_by_name(part);
        sort::sort_actors_by_name(&mut out);
        out
    }

    pub fn search_actors_by_party_sorted(&self, party: &str) -> GrowableArray<&PoliticalActor> {
        let mut out = self.search_actors_by_party(party);
        sort::sort_actors_by_name(&mut out);
        out
    }

    pub fn search_actors_by_county_sorted(&self, county: &str) -> GrowableArray<&PoliticalActor> {
        let mut out = self.search_actors_by_county(county);
        sort::sort_actors_by_name(&mut out);
        out
    }

    fn scan_actors<F>(&self, mut keep: F) -> GrowableArray<&PoliticalActor>
    where
        F: FnMut(&PoliticalActor) -> bool,
    {
        let mut out = GrowableArray::new();
        for i in 0..self.actor_index.capacity() {
            if let Some(actor) = self
                .actor_index
                .get_from_index(i)
                .and_then(|id| self.actors.get(*id))
            {
                if keep(actor) {
                    out.add(actor);
                }
            }
        }
        out
    }

    // ---- elections ----

    /// Adds an election. Returns `false` if `key` is already taken.
    pub fn add_election(&mut self, key: ElectionKey, seats: u32) -> bool {
        self.insert_election(key, seats).is_some()
    }

    pub(crate) fn insert_election(&mut self, key: ElectionKey, seats: u32) -> Option<ElectionId> {
        if self.election_index.contains_key(&key) {
            debug!(election = %key, "rejected duplicate election");
            return None;
        }
        let id = self.elections.insert(ElectionEvent::new(
            key.kind.as_str(),
            key.location.as_str(),
            key.year,
            seats,
        ));
        debug!(election = %key, seats, "added election");
        self.election_index.put(key, id);
        Some(id)
    }

    pub fn get_election(&self, key: &ElectionKey) -> Option<&ElectionEvent> {
        self.election_index
            .get(key)
            .and_then(|id| self.elections.get(*id))
    }

    pub fn election_id(&self, key: &ElectionKey) -> Option<ElectionId> {
        self.election_index.get(key).copied()
    }

    pub fn election_by_id(&self, id: ElectionId) -> Option<&ElectionEvent> {
        self.elections.get(id)
    }

    /// Updates an election in place. The table key is recomputed from
    /// `new_key`, so changing type, year or location re-keys the record.
    ///
    /// Returns `false` if `key` is unknown or `new_key` belongs to a
    /// different election.
    pub fn update_election(&mut self, key: &ElectionKey, new_key: ElectionKey, seats: u32) -> bool {
        let Some(id) = self.election_id(key) else {
            return false;
        };
        let rekeyed = *key != new_key;
        if rekeyed && self.election_index.contains_key(&new_key) {
            debug!(election = %key, new_key = %new_key, "rejected re-key onto existing election");
            return false;
        }

        if rekeyed {
            self.election_index.remove(key);
        }
        let election = self
            .elections
            .get_mut(id)
            .expect("indexed election lives in the arena");
        election.update_details(&new_key, seats);
        debug!(election = %new_key, rekeyed, seats, "updated election");
        if rekeyed {
            self.election_index.put(new_key, id);
        }
        true
    }

    /// Deletes an election, first removing each of its candidacies from the
    /// actor that holds it.
    pub fn delete_election(&mut self, key: &ElectionKey) -> bool {
        let Some(id) = self.election_index.remove(key) else {
            return false;
        };
        let election = self
            .elections
            .remove(id)
            .expect("indexed election lives in the arena");

        for &cid in election.candidates() {
            let link = self
                .candidacies
                .remove(cid)
                .expect("listed candidacy lives in the arena");
            if let Some(actor) = self.actors.get_mut(link.actor()) {
                if let Some(idx) = actor.candidacies().position(|c| *c == cid) {
                    actor
                        .candidacies_mut()
                        .remove(idx)
                        .expect("position came from the same sequence");
                }
            }
        }
        debug!(
            election = %key,
            unlinked = election.candidates().len(),
            "deleted election"
        );
        true
    }

    /// Every election, in table-scan order.
    pub fn all_elections(&self) -> GrowableArray<&ElectionEvent> {
        self.scan_elections(|_| true)
    }

    pub fn search_elections_by_year(&self, year: i32) -> GrowableArray<&ElectionEvent> {
        self.scan_elections(|e| e.year() == year)
    }

    /// Elections whose type equals `kind`, ignoring case.
    pub fn search_elections_by_type(&self, kind: &str) -> GrowableArray<&ElectionEvent> {
        self.scan_elections(|e| eq_ignore_case(e.kind(), kind))
    }

    pub fn elections_sorted_by_year(&self, order: SortOrder) -> GrowableArray<&ElectionEvent> {
        let mut out = self.all_elections();
        sort::sort_elections_by_year(&mut out, order);
        out
    }

    fn scan_elections<F>(&self, mut keep: F) -> GrowableArray<&ElectionEvent>
    where
        F: FnMut(&ElectionEvent) -> bool,
    {
        let mut out = GrowableArray::new();
        for i in 0..self.election_index.capacity() {
            if let Some(election) = self
                .election_index
                .get_from_index(i)
                .and_then(|id| self.elections.get(*id))
            {
                if keep(election) {
                    out.add(election);
                }
            }
        }
        out
    }

    // ---- candidacies ----

    pub fn candidacy(&self, id: CandidacyId) -> Option<&CandidacyLink> {
        self.candidacies.get(id)
    }

    /// Links `actor_name` to the election at `key`.
    ///
    /// Returns `false` if either side is missing or the election already
    /// lists an actor with that name (ignoring case).
    pub fn add_candidacy(
        &mut self,
        actor_name: &str,
        key: &ElectionKey,
        party_at_time: &str,
        votes: u64,
    ) -> bool {
        let (Some(aid), Some(eid)) = (self.actor_id(actor_name), self.election_id(key)) else {
            debug!(actor = actor_name, election = %key, "rejected candidacy with missing owner");
            return false;
        };
        let Some(cid) = self.attach_to_election(aid, eid, party_at_time, votes) else {
            return false;
        };
        self.actors
            .get_mut(aid)
            .expect("indexed actor lives in the arena")
            .candidacies_mut()
            .add(cid);
        debug!(actor = actor_name, election = %key, votes, "added candidacy");
        true
    }

    /// Creates the link record and appends it to the election's sequence.
    /// The caller appends the same id to the actor's sequence.
    pub(crate) fn attach_to_election(
        &mut self,
        aid: ActorId,
        eid: ElectionId,
        party_at_time: &str,
        votes: u64,
    ) -> Option<CandidacyId> {
        if !self.elections.contains_key(eid) {
            return None;
        }
        let name = self.actors.get(aid)?.name();
        if self.find_candidate_index(eid, name).is_some() {
            debug!(actor = name, "rejected duplicate candidacy");
            return None;
        }
        let cid = self
            .candidacies
            .insert(CandidacyLink::new(aid, eid, party_at_time, votes));
        self.elections[eid].candidates_mut().add(cid);
        Some(cid)
    }

    /// Position in the election's sequence of the link whose actor is named
    /// `actor_name`, ignoring case.
    fn find_candidate_index(&self, eid: ElectionId, actor_name: &str) -> Option<usize> {
        let election = self.elections.get(eid)?;
        election.candidates().position(|cid| {
            self.candidacies
                .get(*cid)
                .and_then(|link| self.actors.get(link.actor()))
                .is_some_and(|actor| eq_ignore_case(actor.name(), actor_name))
        })
    }

    /// Position of the link to edit or remove: the one owned by the actor
    /// named exactly `actor_name` if there is one, else the first whose
    /// actor name matches ignoring case.
    fn locate_candidacy(&self, eid: ElectionId, actor_name: &str) -> Option<usize> {
        let election = self.elections.get(eid)?;
        let owned = self.actor_id(actor_name).and_then(|aid| {
            election
                .candidates()
                .position(|cid| self.candidacies.get(*cid).is_some_and(|l| l.actor() == aid))
        });
        owned.or_else(|| self.find_candidate_index(eid, actor_name))
    }

    /// Rewrites the party-at-time and vote count of an existing link.
    pub fn update_candidacy(
        &mut self,
        actor_name: &str,
        key: &ElectionKey,
        party_at_time: &str,
        votes: u64,
    ) -> bool {
        let Some(eid) = self.election_id(key) else {
            return false;
        };
        let Some(idx) = self.locate_candidacy(eid, actor_name) else {
            return false;
        };
        let cid = *self.elections[eid]
            .candidates()
            .get(idx)
            .expect("position came from the same sequence");
        self.candidacies
            .get_mut(cid)
            .expect("listed candidacy lives in the arena")
            .update(party_at_time, votes);
        debug!(actor = actor_name, election = %key, votes, "updated candidacy");
        true
    }

    /// Removes a link from both owners.
    ///
    /// The election side is removed by the index [`Self::locate_candidacy`]
    /// found; the actor side by scanning the link owner's sequence for the
    /// entry that refers to this election.
    pub fn delete_candidacy(&mut self, actor_name: &str, key: &ElectionKey) -> bool {
        let (Some(_), Some(eid)) = (self.actor_id(actor_name), self.election_id(key)) else {
            return false;
        };
        let Some(idx) = self.locate_candidacy(eid, actor_name) else {
            return false;
        };

        let cid = self.elections[eid]
            .candidates_mut()
            .remove(idx)
            .expect("position came from the same sequence");
        let owner = self.candidacies[cid].actor();

        let links = &self.candidacies;
        if let Some(actor) = self.actors.get_mut(owner) {
            let pos = actor
                .candidacies()
                .position(|c| links.get(*c).is_some_and(|l| l.election() == eid));
            if let Some(pos) = pos {
                actor
                    .candidacies_mut()
                    .remove(pos)
                    .expect("position came from the same sequence");
            }
        }
        self.candidacies.remove(cid);
        debug!(actor = actor_name, election = %key, "deleted candidacy");
        true
    }

    /// A copy of the election's candidacies, highest vote count first. The
    /// election's stored order is left as is. Unknown elections yield an
    /// empty sequence.
    pub fn candidacies_sorted_by_votes(&self, key: &ElectionKey) -> GrowableArray<&CandidacyLink> {
        let mut out = self.election_candidacies(key).unwrap_or_default();
        sort::sort_by_votes_desc(&mut out);
        out
    }

    /// The election's candidacies in stored order.
    pub fn election_candidacies(&self, key: &ElectionKey) -> Option<GrowableArray<&CandidacyLink>> {
        let election = self.get_election(key)?;
        Some(self.resolve_links(election.candidates()))
    }

    /// The actor's candidacies in stored order.
    pub fn actor_candidacies(&self, name: &str) -> Option<GrowableArray<&CandidacyLink>> {
        let actor = self.get_actor(name)?;
        Some(self.resolve_links(actor.candidacies()))
    }

    fn resolve_links(&self, ids: &GrowableArray<CandidacyId>) -> GrowableArray<&CandidacyLink> {
        ids.iter().filter_map(|id| self.candidacies.get(*id)).collect()
    }
}
