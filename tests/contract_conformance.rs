//! Runs the conformance checks against every backend, including the HTTP
//! client talking to a live server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cache_contract::{
    api::create_router, contract::conformance, AppState, Cache, CacheError, CacheExt,
    CancellationToken, HttpCache, MemoryCache,
};
use tokio::net::TcpListener;

/// Serves a fresh memory cache and returns its address plus the server state.
async fn spawn_server() -> (SocketAddr, AppState) {
    let state = AppState::new(MemoryCache::new(1000, None));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

#[tokio::test(start_paused = true)]
async fn memory_cache_conforms() {
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(1000, None));
    conformance::run_all(cache, Duration::from_secs(30)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_cache_conforms() {
    let (addr, _state) = spawn_server().await;
    let cache: Arc<dyn Cache> = Arc::new(HttpCache::new(&format!("http://{addr}")).unwrap());
    conformance::run_all(cache, Duration::from_millis(200)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_writes_are_visible_to_server_side_cache() {
    let (addr, state) = spawn_server().await;
    let client = HttpCache::new(&format!("http://{addr}")).unwrap();
    let token = CancellationToken::new();

    assert!(client
        .set("shared:key", &vec![1, 2, 3], None, &token)
        .await
        .unwrap());

    let local: Option<Vec<u32>> = state.cache.get("shared:key", &token).await.unwrap();
    assert_eq!(local, Some(vec![1, 2, 3]));

    assert!(client.remove("shared:key", &token).await.unwrap());
    assert!(!client.remove("shared:key", &token).await.unwrap());
    assert!(state.cache.is_empty().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_and_memory_agree_on_awkward_keys_and_values() {
    let (addr, _state) = spawn_server().await;
    let remote = HttpCache::new(&format!("http://{addr}")).unwrap();
    let local = MemoryCache::new(100, None);
    let token = CancellationToken::new();
    let wide = 1u128 << 70;

    for key in [".", "..", "./x", "a/../b"] {
        for cache in [&remote as &dyn Cache, &local as &dyn Cache] {
            assert!(cache.set(key, &wide, None, &token).await.unwrap());
            let loaded: Option<u128> = cache.get(key, &token).await.unwrap();
            assert_eq!(loaded, Some(wide), "key {key:?}");
        }
    }

    assert!(remote.remove("..", &token).await.unwrap());
    assert_eq!(remote.get::<u128>("..", &token).await.unwrap(), None);
    assert_eq!(remote.get::<u128>(".", &token).await.unwrap(), Some(wide));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_declined_write_reports_false() {
    let (addr, _state) = spawn_server().await;
    let client = HttpCache::new(&format!("http://{addr}")).unwrap();
    let token = CancellationToken::new();

    let accepted = client
        .set("zero", "gone", Some(Duration::ZERO), &token)
        .await
        .unwrap();
    assert!(!accepted);
    assert_eq!(client.get::<String>("zero", &token).await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_cancel_aborts_in_flight_request() {
    // Accepts connections but never answers, so the request hangs.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = HttpCache::new(&format!("http://{addr}")).unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.get::<String>("hanging", &token),
    )
    .await
    .expect("cancellation should end the request");
    assert!(matches!(result, Err(CacheError::Cancelled)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn http_unreachable_server_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = HttpCache::new(&format!("http://{addr}")).unwrap();
    let token = CancellationToken::new();
    let result = client.get::<String>("anything", &token).await;
    assert!(matches!(result, Err(CacheError::Transport(_))));
}
