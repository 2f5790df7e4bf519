//! Conformance checks for [`Cache`] implementations.
//!
//! Each check panics on violation, so they can be called straight from a
//! `#[tokio::test]`. Keys are namespaced under `conformance:` (apart from the
//! edge-case keys) and every check writes its own keys, so the checks can
//! share one backend.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Cache, CacheExt, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

/// Sample value type stored by the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
}

impl Profile {
    pub fn sample(id: u64) -> Self {
        Self {
            id,
            name: format!("user-{id}"),
            tags: vec!["cached".to_string(), format!("shard-{}", id % 4)],
        }
    }
}

/// A key that was never written resolves to absent.
pub async fn check_missing_key_is_absent(cache: &dyn Cache) {
    let token = CancellationToken::new();
    let loaded: Option<Profile> = cache
        .get("conformance:never-set", &token)
        .await
        .expect("get on a missing key should not fail");
    assert!(loaded.is_none(), "missing key must be absent");
}

/// An accepted write is returned unchanged by the next get.
pub async fn check_set_then_get(cache: &dyn Cache) {
    let token = CancellationToken::new();
    let profile = Profile::sample(1);

    let accepted = cache
        .set("conformance:round-trip", &profile, None, &token)
        .await
        .expect("set should not fail");
    assert!(accepted, "set should accept a small value");

    let loaded: Option<Profile> = cache
        .get("conformance:round-trip", &token)
        .await
        .expect("get should not fail");
    assert_eq!(loaded, Some(profile));
}

/// Overwriting a key replaces the stored value.
pub async fn check_overwrite(cache: &dyn Cache) {
    let token = CancellationToken::new();
    cache
        .set("conformance:overwrite", &Profile::sample(1), None, &token)
        .await
        .expect("first set should not fail");
    cache
        .set("conformance:overwrite", &Profile::sample(2), None, &token)
        .await
        .expect("second set should not fail");

    let loaded: Option<Profile> = cache
        .get("conformance:overwrite", &token)
        .await
        .expect("get should not fail");
    assert_eq!(loaded, Some(Profile::sample(2)));
}

/// A value written with `expiry` is gone once that much time has passed.
pub async fn check_expiry_is_honored(cache: &dyn Cache, expiry: Duration) {
    let token = CancellationToken::new();
    let accepted = cache
        .set("conformance:expiring", &Profile::sample(3), Some(expiry), &token)
        .await
        .expect("set with expiry should not fail");
    assert!(accepted, "set with expiry should be accepted");

    let before: Option<Profile> = cache
        .get("conformance:expiring", &token)
        .await
        .expect("get before expiry should not fail");
    assert!(before.is_some(), "value should be present before expiry");

    tokio::time::sleep(expiry * 2).await;

    let after: Option<Profile> = cache
        .get("conformance:expiring", &token)
        .await
        .expect("get after expiry should not fail");
    assert!(after.is_none(), "value should be absent after expiry");
}

/// A cancelled token makes both operations report cancellation, and a
/// cancelled set leaves nothing behind.
pub async fn check_cancellation(cache: &dyn Cache) {
    let cancelled = CancellationToken::new();
    cancelled.cancel();

    let set_result = cache
        .set("conformance:cancelled", &Profile::sample(4), None, &cancelled)
        .await;
    assert!(
        matches!(set_result, Err(CacheError::Cancelled)),
        "cancelled set must report cancellation, got {set_result:?}"
    );

    let get_result = cache
        .get::<Profile>("conformance:cancelled", &cancelled)
        .await;
    assert!(
        matches!(get_result, Err(CacheError::Cancelled)),
        "cancelled get must report cancellation, got {get_result:?}"
    );

    let token = CancellationToken::new();
    let loaded: Option<Profile> = cache
        .get("conformance:cancelled", &token)
        .await
        .expect("get should not fail");
    assert!(loaded.is_none(), "cancelled set must not write");
}

/// Concurrent writers to one key leave exactly one of their values behind.
pub async fn check_concurrent_sets(cache: Arc<dyn Cache>, writers: u64) {
    let mut tasks = JoinSet::new();
    for id in 0..writers {
        let cache = Arc::clone(&cache);
        tasks.spawn(async move {
            let token = CancellationToken::new();
            cache
                .set("conformance:contended", &Profile::sample(id), None, &token)
                .await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let accepted = joined
            .expect("writer task panicked")
            .expect("concurrent set should not fail");
        assert!(accepted, "concurrent set should be accepted");
    }

    let token = CancellationToken::new();
    let loaded: Profile = cache
        .get("conformance:contended", &token)
        .await
        .expect("get should not fail")
        .expect("one of the writes should be visible");
    assert!(loaded.id < writers, "unexpected writer id {}", loaded.id);
    assert_eq!(loaded, Profile::sample(loaded.id), "value must not be torn");
}

/// A payload of the wrong shape is a decode error, not a miss.
pub async fn check_type_mismatch_is_error(cache: &dyn Cache) {
    let token = CancellationToken::new();
    cache
        .set("conformance:mismatch", "plain text", None, &token)
        .await
        .expect("set should not fail");

    let result = cache.get::<Profile>("conformance:mismatch", &token).await;
    assert!(
        matches!(result, Err(CacheError::Decode { .. })),
        "type mismatch must be a decode error, got {result:?}"
    );
}

/// A stored `null` is a present value, distinct from absent.
pub async fn check_null_is_not_absent(cache: &dyn Cache) {
    let token = CancellationToken::new();
    cache
        .set("conformance:null", &Option::<Profile>::None, None, &token)
        .await
        .expect("set should not fail");

    let loaded: Option<Option<Profile>> = cache
        .get("conformance:null", &token)
        .await
        .expect("get should not fail");
    assert_eq!(loaded, Some(None));
}

/// Keys that are awkward for some transports still round-trip.
///
/// Covers dot segments, URL delimiters, non-ASCII text and a key of exactly
/// [`MAX_KEY_LENGTH`] bytes.
pub async fn check_edge_case_keys(cache: &dyn Cache) {
    let token = CancellationToken::new();
    let longest = "k".repeat(MAX_KEY_LENGTH);
    let keys = [
        ".",
        "..",
        "../conformance",
        "a/b?c=d&e#f",
        "100% + space",
        "ключ:日本語:✓",
        longest.as_str(),
    ];

    for (id, key) in keys.into_iter().enumerate() {
        let profile = Profile::sample(id as u64);
        let accepted = cache
            .set(key, &profile, None, &token)
            .await
            .unwrap_or_else(|e| panic!("set on key {key:?} should not fail: {e}"));
        assert!(accepted, "set on key {key:?} should be accepted");

        let loaded: Option<Profile> = cache
            .get(key, &token)
            .await
            .unwrap_or_else(|e| panic!("get on key {key:?} should not fail: {e}"));
        assert_eq!(loaded, Some(profile), "key {key:?} must round-trip");
    }
}

/// Values at the edges of the JSON number range and the size limit
/// round-trip unchanged.
pub async fn check_edge_case_values(cache: &dyn Cache) {
    let token = CancellationToken::new();

    for (key, number) in [
        ("conformance:u128-wide", 1u128 << 70),
        ("conformance:u128-max", u128::MAX),
    ] {
        assert!(cache
            .set(key, &number, None, &token)
            .await
            .expect("set of a wide integer should not fail"));
        let loaded: Option<u128> = cache
            .get(key, &token)
            .await
            .expect("get of a wide integer should not fail");
        assert_eq!(loaded, Some(number), "{key} must round-trip exactly");
    }

    let negative = i128::MIN;
    assert!(cache
        .set("conformance:i128-min", &negative, None, &token)
        .await
        .expect("set of a wide negative integer should not fail"));
    let loaded: Option<i128> = cache
        .get("conformance:i128-min", &token)
        .await
        .expect("get of a wide negative integer should not fail");
    assert_eq!(loaded, Some(negative));

    // Leaves room for the quotes the JSON encoding adds.
    let large = "x".repeat(MAX_VALUE_SIZE - 64);
    let accepted = cache
        .set("conformance:large", &large, None, &token)
        .await
        .expect("set of a large value should not fail");
    assert!(accepted, "a value just under the size limit should be accepted");
    let loaded: Option<String> = cache
        .get("conformance:large", &token)
        .await
        .expect("get of a large value should not fail");
    assert!(
        loaded.as_deref() == Some(large.as_str()),
        "large value must round-trip"
    );
}

/// Runs every check against one backend.
pub async fn run_all(cache: Arc<dyn Cache>, expiry: Duration) {
    check_missing_key_is_absent(cache.as_ref()).await;
    check_set_then_get(cache.as_ref()).await;
    check_overwrite(cache.as_ref()).await;
    check_expiry_is_honored(cache.as_ref(), expiry).await;
    check_cancellation(cache.as_ref()).await;
    check_type_mismatch_is_error(cache.as_ref()).await;
    check_null_is_not_absent(cache.as_ref()).await;
    check_edge_case_keys(cache.as_ref()).await;
    check_edge_case_values(cache.as_ref()).await;
    check_concurrent_sets(cache, 16).await;
    debug!("all conformance checks passed");
}
