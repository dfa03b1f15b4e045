// ==============================================
// LRU CONCURRENCY TESTS (integration)
// ==============================================
//
// Multi-threaded checks that the single lock keeps index and order in
// step. These need real threads and cannot live inline.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use lrukit::policy::lru::LruCache;

// ==============================================
// Distinct Puts Beyond Capacity
// ==============================================

#[test]
fn concurrent_distinct_puts_settle_at_capacity() {
    let capacity = 64;
    let num_threads = 8;
    let puts_per_thread = 500;

    let cache: LruCache<u64, u64> = LruCache::new(capacity).unwrap();
    let barrier = Arc::new(Barrier::new(num_threads));
    let evictions = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            let evictions = Arc::clone(&evictions);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..puts_per_thread {
                    let key = (thread_id * puts_per_thread + i) as u64;
                    if cache.put(key, key).is_some() {
                        evictions.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = num_threads * puts_per_thread;
    assert_eq!(cache.len(), capacity);
    assert_eq!(evictions.load(Ordering::Relaxed), total - capacity);
    cache.check_invariants().unwrap();

    let keys: Vec<u64> = cache.iter().map(|(k, _)| k).collect();
    let unique: HashSet<u64> = keys.iter().copied().collect();
    assert_eq!(keys.len(), unique.len(), "duplicate key in recency order");
    for (key, value) in cache.snapshot() {
        assert_eq!(key, *value);
    }
}

// ==============================================
// Mixed Workload
// ==============================================

#[test]
fn mixed_operations_preserve_invariants() {
    let capacity = 32;
    let cache: LruCache<u32, String> = LruCache::new(capacity).unwrap();
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6u32)
        .map(|thread_id| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..2_000u32 {
                    let key = (i * 7 + thread_id) % 96;
                    match i % 5 {
                        0 | 1 => {
                            cache.put(key, format!("{thread_id}:{i}"));
                        },
                        2 => {
                            let _ = cache.get(&key);
                        },
                        3 => {
                            let _ = cache.delete(&key);
                        },
                        _ => {
                            let _ = cache.iter().count();
                        },
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= capacity);
    cache.check_invariants().unwrap();
}

// ==============================================
// Readers During Writes
// ==============================================

#[test]
fn enumeration_never_sees_a_torn_state() {
    let capacity = 16;
    let cache: LruCache<u64, u64> = LruCache::new(capacity).unwrap();
    for k in 0..capacity as u64 {
        cache.put(k, k);
    }

    let writer = {
        let cache = cache.clone();
        thread::spawn(move || {
            for k in 0..5_000u64 {
                cache.put(k % 40, k);
                let _ = cache.get(&(k % 13));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = cache.snapshot();
                    assert!(snapshot.len() <= capacity);
                    let unique: HashSet<u64> = snapshot.iter().map(|(k, _)| *k).collect();
                    assert_eq!(unique.len(), snapshot.len());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    cache.check_invariants().unwrap();
}

// ==============================================
// Reads Inside An Enumeration With A Queued Writer
// ==============================================

#[test]
fn reads_during_enumeration_do_not_wait_on_queued_writer() {
    let cache: LruCache<u64, u64> = LruCache::new(4).unwrap();
    cache.put(1, 1);

    let (tx, rx) = mpsc::channel();
    let reader_cache = cache.clone();
    let reader = thread::spawn(move || {
        let iter = reader_cache.iter();

        let writer_cache = reader_cache.clone();
        let writer = thread::spawn(move || {
            writer_cache.put(2, 2);
        });
        // Give the writer time to park on the lock.
        thread::sleep(Duration::from_millis(100));

        let len = reader_cache.len();
        let peeked = reader_cache.peek(&1).map(|v| *v);
        let shown = reader_cache.to_string();
        let nested = reader_cache.snapshot().len();
        tx.send((len, peeked, shown, nested)).unwrap();

        drop(iter);
        writer.join().unwrap();
    });

    let (len, peeked, shown, nested) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("read-only calls blocked behind the queued writer");
    assert_eq!(len, 1);
    assert_eq!(peeked, Some(1));
    assert_eq!(shown, "1: 1\n");
    assert_eq!(nested, 1);

    reader.join().unwrap();
    assert_eq!(cache.len(), 2);
    cache.check_invariants().unwrap();
}
