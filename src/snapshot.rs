//! Serializable snapshot of a [`RecordManager`].
//!
//! Handles are process-local, so a snapshot refers to records by their
//! position in its own vectors:
//! - `candidacies` is grouped by election, each group in that election's
//!   stored order; `CandidacyRecord::actor`/`election` index into `actors`
//!   and `elections`.
//! - `ActorRecord::candidacies` lists positions in `candidacies`, in the
//!   actor's stored order.
//!
//! Import rebuilds both orders exactly and creates one arena entry per
//! record, so every link is again shared by its two owners.

use crate::config::StoreConfig;
use crate::error::SnapshotError;
use crate::model::{ActorId, CandidacyId, ElectionId, ElectionKey};
use crate::record_manager::RecordManager;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub actors: Vec<ActorRecord>,
    pub elections: Vec<ElectionRecord>,
    pub candidacies: Vec<CandidacyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub name: String,
    pub date_of_birth: String,
    pub party: String,
    pub county: String,
    pub image_url: String,
    /// Positions in [`Snapshot::candidacies`].
    #[serde(default)]
    pub candidacies: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub kind: String,
    pub location: String,
    pub year: i32,
    pub seats: u32,
}

impl ElectionRecord {
    pub fn key(&self) -> ElectionKey {
        ElectionKey::new(self.kind.as_str(), self.year, self.location.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidacyRecord {
    /// Position in [`Snapshot::actors`].
    pub actor: usize,
    /// Position in [`Snapshot::elections`].
    pub election: usize,
    pub party_at_time: String,
    pub votes: u64,
}

impl RecordManager {
    /// Captures every record. Actors and elections appear in table-scan order.
    pub fn export_snapshot(&self) -> Snapshot {
        let mut actor_pos: SecondaryMap<ActorId, usize> = SecondaryMap::new();
        let mut election_pos: SecondaryMap<ElectionId, usize> = SecondaryMap::new();
        let mut candidacy_pos: SecondaryMap<CandidacyId, usize> = SecondaryMap::new();

        let actors = self.all_actors();
        for (pos, actor) in actors.iter().enumerate() {
            let id = self
                .actor_id(actor.name())
                .expect("scanned actor is indexed by name");
            actor_pos.insert(id, pos);
        }

        let mut out = Snapshot::default();
        for (pos, election) in self.all_elections().iter().enumerate() {
            let id = self
                .election_id(&election.key())
                .expect("scanned election is indexed by key");
            election_pos.insert(id, pos);
            out.elections.push(ElectionRecord {
                kind: election.kind().to_owned(),
                location: election.location().to_owned(),
                year: election.year(),
                seats: election.seats(),
            });
        }

        for election in self.all_elections().iter() {
            for &cid in election.candidates() {
                let link = &self.candidacies[cid];
                candidacy_pos.insert(cid, out.candidacies.len());
                out.candidacies.push(CandidacyRecord {
                    actor: actor_pos[link.actor()],
                    election: election_pos[link.election()],
                    party_at_time: link.party_at_time().to_owned(),
                    votes: link.votes(),
                });
            }
        }

        for actor in actors.iter() {
            out.actors.push(ActorRecord {
                name: actor.name().to_owned(),
                date_of_birth: actor.date_of_birth().to_owned(),
                party: actor.party().to_owned(),
                county: actor.county().to_owned(),
                image_url: actor.image_url().to_owned(),
                candidacies: actor
                    .candidacies()
                    .iter()
                    .map(|cid| candidacy_pos[*cid])
                    .collect(),
            });
        }

        info!(
            actors = out.actors.len(),
            elections = out.elections.len(),
            candidacies = out.candidacies.len(),
            "exported snapshot"
        );
        out
    }

    /// Rebuilds a manager from `snapshot`.
    ///
    /// Fails on duplicate identities, dangling positions, or a candidacy
    /// that is not listed exactly once by the actor that owns it.
    pub fn from_snapshot(snapshot: &Snapshot, config: StoreConfig) -> Result<Self, SnapshotError> {
        let mut mgr = RecordManager::with_config(config);

        let mut actor_ids = Vec::with_capacity(snapshot.actors.len());
        for rec in &snapshot.actors {
            let id = mgr
                .insert_actor(
                    &rec.name,
                    &rec.date_of_birth,
                    &rec.party,
                    &rec.county,
                    &rec.image_url,
                )
                .ok_or_else(|| SnapshotError::DuplicateActor(rec.name.clone()))?;
            actor_ids.push(id);
        }

        let mut election_ids = Vec::with_capacity(snapshot.elections.len());
        for rec in &snapshot.elections {
            let key = rec.key();
            let id = mgr
                .insert_election(key.clone(), rec.seats)
                .ok_or_else(|| SnapshotError::DuplicateElection(key.to_string()))?;
            election_ids.push(id);
        }

        // Election sequences fill in record order; actor sequences are
        // filled afterwards from each actor's own listing.
        let mut candidacy_ids = Vec::with_capacity(snapshot.candidacies.len());
        for (pos, rec) in snapshot.candidacies.iter().enumerate() {
            let aid = *actor_ids
                .get(rec.actor)
                .ok_or(SnapshotError::UnknownActor {
                    candidacy: pos,
                    actor: rec.actor,
                })?;
            let eid = *election_ids
                .get(rec.election)
                .ok_or(SnapshotError::UnknownElection {
                    candidacy: pos,
                    election: rec.election,
                })?;
            let cid = mgr
                .attach_to_election(aid, eid, &rec.party_at_time, rec.votes)
                .ok_or_else(|| SnapshotError::DuplicateCandidacy {
                    actor: snapshot.actors[rec.actor].name.clone(),
                    election: snapshot.elections[rec.election].key().to_string(),
                })?;
            candidacy_ids.push(cid);
        }

        let mut listed = vec![0usize; candidacy_ids.len()];
        for (rec, &aid) in snapshot.actors.iter().zip(&actor_ids) {
            for &pos in &rec.candidacies {
                let cid = *candidacy_ids
                    .get(pos)
                    .ok_or_else(|| SnapshotError::UnknownCandidacy {
                        actor: rec.name.clone(),
                        candidacy: pos,
                    })?;
                if mgr.candidacies[cid].actor() != aid {
                    return Err(SnapshotError::MisattributedCandidacy {
                        candidacy: pos,
                        listed_by: rec.name.clone(),
                    });
                }
                listed[pos] += 1;
                mgr.actors[aid].candidacies_mut().add(cid);
            }
        }
        if let Some((pos, &count)) = listed.iter().enumerate().find(|(_, c)| **c != 1) {
            return Err(SnapshotError::CandidacyListing {
                candidacy: pos,
                count,
            });
        }

        info!(
            actors = mgr.actor_count(),
            elections = mgr.election_count(),
            candidacies = mgr.candidacy_count(),
            "imported snapshot"
        );
        Ok(mgr)
    }
}
