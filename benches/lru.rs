use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use lrukit::policy::lru::{LruCache, LruCore};
use rand::Rng;

fn filled_core(capacity: usize) -> LruCore<u64, u64> {
    let mut cache = LruCore::new(capacity).unwrap();
    for i in 0..capacity as u64 {
        cache.put(i, i);
    }
    cache
}

fn bench_lru_put_get(c: &mut Criterion) {
    c.bench_function("lru_put_get", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.put(black_box(i + 10_000), i);
                    let _ = black_box(cache.get(&black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    let _ = black_box(cache.put(black_box(10_000 + i), i));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_get_hotset(c: &mut Criterion) {
    let mut rng = rand::rng();
    let keys: Vec<u64> = (0..4096).map(|_| rng.random_range(0..4096)).collect();

    c.bench_function("lru_get_hotset", |b| {
        b.iter_batched(
            || filled_core(4096),
            |mut cache| {
                for key in &keys {
                    let _ = black_box(cache.get(black_box(key)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_delete_reinsert(c: &mut Criterion) {
    c.bench_function("lru_delete_reinsert", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    let _ = black_box(cache.delete(&i));
                    cache.put(i, i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_concurrent_mixed(c: &mut Criterion) {
    c.bench_function("lru_concurrent_mixed_4t", |b| {
        b.iter_batched(
            || {
                let cache = LruCache::new(1024).unwrap();
                for i in 0..1024u64 {
                    cache.put(i, i);
                }
                cache
            },
            |cache| {
                let handles: Vec<_> = (0..4u64)
                    .map(|t| {
                        let cache = cache.clone();
                        thread::spawn(move || {
                            for i in 0..1024u64 {
                                if i % 4 == 0 {
                                    cache.put_arc(t * 10_000 + i, Arc::new(i));
                                } else {
                                    let _ = black_box(cache.get(&i));
                                }
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_lru_put_get,
    bench_lru_eviction_churn,
    bench_lru_get_hotset,
    bench_lru_delete_reinsert,
    bench_lru_concurrent_mixed
);
criterion_main!(benches);
