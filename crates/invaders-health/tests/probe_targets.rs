//! Monitor behaviour against live local HTTP targets.
//!
//! Each test serves a fixed (or switchable) status code from an axum server
//! bound to an ephemeral port and watches the monitor's status converge.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use invaders_health::{HttpProber, MonitorError, MonitorManager, MonitorState};
use tokio::net::TcpListener;
use tokio::time::Instant;

async fn serve(code: Arc<AtomicU16>) -> String {
    let app = Router::new().fallback(move || {
        let code = code.clone();
        async move {
            StatusCode::from_u16(code.load(Ordering::SeqCst))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn serve_status(status: u16) -> String {
    serve(Arc::new(AtomicU16::new(status))).await
}

fn manager() -> MonitorManager {
    MonitorManager::new(HttpProber::new(Duration::from_secs(5)).unwrap())
}

async fn wait_for(monitor: &MonitorManager, id: &str, want: MonitorState, within: Duration) {
    let deadline = Instant::now() + within;
    loop {
        let status = monitor.status(id).unwrap();
        if status.status == want {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "monitor {id} stuck at {} waiting for {want}",
            status.status
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[tokio::test]
async fn ok_target_is_up() {
    let url = serve_status(200).await;
    let monitor = manager();
    let id = monitor.start(&url).unwrap();
    wait_for(&monitor, &id, MonitorState::Up, Duration::from_secs(6)).await;
}

#[tokio::test]
async fn redirect_target_is_up() {
    let url = serve_status(302).await;
    let monitor = manager();
    let id = monitor.start(&url).unwrap();
    wait_for(&monitor, &id, MonitorState::Up, Duration::from_secs(6)).await;
}

#[tokio::test]
async fn not_found_target_is_up() {
    let url = serve_status(404).await;
    let monitor = manager();
    let id = monitor.start(&url).unwrap();
    wait_for(&monitor, &id, MonitorState::Up, Duration::from_secs(6)).await;
}

#[tokio::test]
async fn server_error_target_is_down() {
    let url = serve_status(500).await;
    let monitor = manager();
    let id = monitor.start(&url).unwrap();
    wait_for(&monitor, &id, MonitorState::Down, Duration::from_secs(6)).await;
}

#[tokio::test]
async fn refused_connection_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let monitor = manager();
    let id = monitor.start(&format!("http://{addr}/")).unwrap();
    wait_for(&monitor, &id, MonitorState::Down, Duration::from_secs(6)).await;
}

#[tokio::test]
async fn status_follows_target_on_each_tick() {
    let code = Arc::new(AtomicU16::new(500));
    let url = serve(code.clone()).await;
    let monitor = manager().with_interval(Duration::from_millis(200));
    let id = monitor.start(&url).unwrap();

    wait_for(&monitor, &id, MonitorState::Down, Duration::from_secs(3)).await;
    code.store(200, Ordering::SeqCst);
    wait_for(&monitor, &id, MonitorState::Up, Duration::from_secs(3)).await;
    code.store(503, Ordering::SeqCst);
    wait_for(&monitor, &id, MonitorState::Down, Duration::from_secs(3)).await;
}

#[tokio::test]
async fn stop_then_status_is_not_found() {
    let url = serve_status(200).await;
    let monitor = manager();
    let id = monitor.start(&url).unwrap();
    monitor.stop(&id).unwrap();
    assert!(matches!(monitor.status(&id), Err(MonitorError::NotFound(_))));

    // A probe already in flight must not resurrect the entry.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(matches!(monitor.status(&id), Err(MonitorError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_yield_distinct_ids() {
    const MONITORS: usize = 8;

    let url = serve_status(200).await;
    let monitor = Arc::new(manager());

    let handles: Vec<_> = (0..MONITORS)
        .map(|_| {
            let monitor = monitor.clone();
            let url = url.clone();
            tokio::spawn(async move { monitor.start(&url).unwrap() })
        })
        .collect();

    let mut ids = Vec::with_capacity(MONITORS);
    for handle in handles {
        ids.push(handle.await.unwrap());
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), MONITORS);

    for id in &ids {
        assert_eq!(monitor.status(id).unwrap().id, *id);
        wait_for(&monitor, id, MonitorState::Up, Duration::from_secs(6)).await;
    }

    let stops: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let monitor = monitor.clone();
            tokio::spawn(async move { monitor.stop(&id) })
        })
        .collect();
    for stop in stops {
        stop.await.unwrap().unwrap();
    }

    assert!(monitor.is_empty());
    for id in &ids {
        assert!(monitor.status(id).is_err());
    }
}
