use ballot_ledger::ProbeTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_put_fresh_100k(c: &mut Criterion) {
    c.bench_function("probe::put_fresh_100k", |b| {
        b.iter_batched(
            ProbeTable::<String, u64>::new,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.put(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_put_after_churn_100k(c: &mut Criterion) {
    c.bench_function("probe::put_after_churn_100k", |b| {
        b.iter_batched(
            || {
                // Pre-grow, then leave every slot either empty or tombstoned.
                let mut t = ProbeTable::new();
                let keys: Vec<String> = lcg(2).take(110_000).map(key).collect();
                for (i, k) in keys.iter().enumerate() {
                    t.put(k.clone(), i as u64);
                }
                for k in &keys {
                    t.remove(k.as_str());
                }
                t
            },
            |mut t| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    t.put(key(x), i as u64);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("probe::get_hit_10k_on_100k", |b| {
        let mut t = ProbeTable::new();
        let keys: Vec<_> = lcg(7).take(100_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.put(k.clone(), i as u64);
        }
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.get(k.as_str()));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("probe::get_miss_10k_on_100k", |b| {
        let mut t = ProbeTable::new();
        for (i, x) in lcg(11).take(100_000).enumerate() {
            t.put(key(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(t.get(k.as_str()));
            }
        })
    });
}

fn bench_index_scan_100k(c: &mut Criterion) {
    c.bench_function("probe::index_scan_100k", |b| {
        let mut t = ProbeTable::new();
        for (i, x) in lcg(999).take(100_000).enumerate() {
            t.put(key(x), i as u64);
        }
        b.iter(|| {
            let mut sum = 0u64;
            for i in 0..t.capacity() {
                if let Some(v) = t.get_from_index(i) {
                    sum = sum.wrapping_add(*v);
                }
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_put;
    config = bench_config();
    targets = bench_put_fresh_100k, bench_put_after_churn_100k
}

criterion_group! {
    name = benches_lookup;
    config = bench_config();
    targets = bench_get_hit_10k, bench_get_miss_10k, bench_index_scan_100k
}

criterion_main!(benches_put, benches_lookup);
