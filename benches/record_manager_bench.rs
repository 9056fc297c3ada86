use ballot_ledger::{ElectionKey, RecordManager, StoreConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

const ACTORS: usize = 5_000;
const ELECTIONS: usize = 200;

fn actor_name(i: usize) -> String {
    format!("actor {i:05}")
}

fn election_key(i: usize) -> ElectionKey {
    ElectionKey::new("Local", 1990 + (i % 35) as i32, format!("ward {i}"))
}

/// Every actor stands in 4 pseudo-random elections.
fn populated() -> RecordManager {
    let mut m = RecordManager::with_config(StoreConfig::default());
    for i in 0..ACTORS {
        m.add_actor(&actor_name(i), "1970-01-01", "Independent", "Cork", "");
    }
    for i in 0..ELECTIONS {
        m.add_election(election_key(i), 5);
    }
    let mut r = lcg(42);
    for i in 0..ACTORS {
        for _ in 0..4 {
            let e = (r.next().unwrap() as usize) % ELECTIONS;
            let votes = r.next().unwrap() % 10_000;
            m.add_candidacy(&actor_name(i), &election_key(e), "Independent", votes);
        }
    }
    m
}

fn bench_populate(c: &mut Criterion) {
    c.bench_function("manager::populate_5k_actors_20k_links", |b| {
        b.iter(|| black_box(populated()))
    });
}

fn bench_sorted_by_votes(c: &mut Criterion) {
    c.bench_function("manager::sorted_by_votes_all_elections", |b| {
        let m = populated();
        b.iter(|| {
            for i in 0..ELECTIONS {
                black_box(m.candidacies_sorted_by_votes(&election_key(i)));
            }
        })
    });
}

fn bench_search_by_name(c: &mut Criterion) {
    c.bench_function("manager::search_by_name_sorted", |b| {
        let m = populated();
        b.iter(|| black_box(m.search_actors_by_name_sorted("actor 01")))
    });
}

fn bench_delete_elections(c: &mut Criterion) {
    c.bench_function("manager::delete_all_elections", |b| {
        b.iter_batched(
            populated,
            |mut m| {
                for i in 0..ELECTIONS {
                    m.delete_election(&election_key(i));
                }
                black_box(m)
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_populate, bench_sorted_by_votes, bench_search_by_name, bench_delete_elections
}

criterion_main!(benches);
