use lrukit::policy::lru::LruCache;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), lrukit::error::CacheError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cache = LruCache::new(3)?;

    cache.put("A", 1);
    cache.put("B", 2);
    cache.put("C", 3);
    println!("{cache}");

    cache.get("A"); // A becomes most recently used
    if let Some((key, value)) = cache.put("D", 4) {
        println!("evicted {key}: {value}");
    }
    println!("{cache}");

    cache.delete("A");
    println!("{cache}");

    Ok(())
}

// Expected output:
// C: 3
// B: 2
// A: 1
//
// evicted B: 2
// D: 4
// A: 1
// C: 3
//
// D: 4
// C: 3
//
// Run with RUST_LOG=lrukit=trace to see construction and eviction events.
