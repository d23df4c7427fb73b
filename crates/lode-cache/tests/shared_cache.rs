use std::sync::Arc;
use std::time::Duration;

use lode_cache::{MemoryCache, ResultCache, SizeGuardedCache, fingerprint};
use lode_core::fixtures::sample_request;
use serde_json::json;

#[tokio::test]
async fn guarded_cache_is_shareable_across_tasks() {
    let cache: Arc<dyn ResultCache> =
        Arc::new(SizeGuardedCache::new(MemoryCache::new(), 1024));
    let fp = fingerprint(&sample_request(), "research-large", &json!({}));

    let writers: Vec<_> = (0..4u8)
        .map(|n| {
            let cache = Arc::clone(&cache);
            let fp = fp.clone();
            tokio::spawn(async move {
                cache
                    .set(&fp, &[n; 16], Duration::from_secs(60))
                    .await
                    .expect("write fits");
            })
        })
        .collect();
    for writer in writers {
        writer.await.expect("task completes");
    }

    // Last writer wins; each write is whole.
    let stored = cache.get(&fp).await.unwrap().expect("entry present");
    assert_eq!(stored.len(), 16);
    assert!(stored.iter().all(|b| *b == stored[0]));
}
