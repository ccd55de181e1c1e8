use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use station_api::{
    ApiError, ConfigCallback, Directory, ObserverRegistry, Share, StationApi, SubscriptionToken,
};
use station_app::PathSelector;
use station_core::{ConnectionSettings, NodePresentation, Task};
use tokio::sync::{mpsc, oneshot};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(station_logging::initialize_for_tests);
}

type ShareGate = oneshot::Receiver<Result<Vec<Share>, ApiError>>;

/// API double whose share listings can be gated on oneshot channels to
/// control resolution order.
struct MockApi {
    registry: ObserverRegistry,
    share_gates: Mutex<VecDeque<ShareGate>>,
    share_started: mpsc::UnboundedSender<()>,
    share_calls: AtomicUsize,
    directories: Mutex<Vec<Directory>>,
    directory_calls: AtomicUsize,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
}

impl MockApi {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<()>) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let mock = Arc::new(Self {
            registry: ObserverRegistry::new(),
            share_gates: Mutex::new(VecDeque::new()),
            share_started: started_tx,
            share_calls: AtomicUsize::new(0),
            directories: Mutex::new(Vec::new()),
            directory_calls: AtomicUsize::new(0),
            subscribes: AtomicUsize::new(0),
            unsubscribes: AtomicUsize::new(0),
        });
        (mock, started_rx)
    }

    /// Queues a gated share listing; the returned sender resolves it.
    fn gate_shares(&self) -> oneshot::Sender<Result<Vec<Share>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.share_gates
            .lock()
            .expect("lock gates")
            .push_back(rx);
        tx
    }

    fn set_directories(&self, directories: Vec<Directory>) {
        *self.directories.lock().expect("lock directories") = directories;
    }
}

fn share(name: &str, path: &str) -> Share {
    Share {
        name: name.to_string(),
        path: path.to_string(),
    }
}

#[async_trait]
impl StationApi for MockApi {
    fn reconfigure(&self, _settings: &ConnectionSettings) -> bool {
        false
    }

    fn subscribe_config_changes(&self, callback: ConfigCallback) -> SubscriptionToken {
        self.subscribes.fetch_add(1, Ordering::Relaxed);
        self.registry.subscribe(callback)
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        self.unsubscribes.fetch_add(1, Ordering::Relaxed);
        self.registry.unsubscribe(token);
    }

    async fn list_shares(&self) -> Result<Vec<Share>, ApiError> {
        self.share_calls.fetch_add(1, Ordering::Relaxed);
        let gate = self.share_gates.lock().expect("lock gates").pop_front();
        let _ = self.share_started.send(());
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Connection("gate dropped".to_string()))),
            None => Ok(vec![share("video", "/video")]),
        }
    }

    async fn list_directory(&self, _path: &str) -> Result<Vec<Directory>, ApiError> {
        self.directory_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.directories.lock().expect("lock directories").clone())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        Ok(Vec::new())
    }

    async fn add_task(&self, _url: &str, _destination: Option<&str>) -> Result<(), ApiError> {
        Ok(())
    }

    async fn pause_task(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn resume_task(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_tasks(&self, _ids: &[String]) -> Result<(), ApiError> {
        Ok(())
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

#[tokio::test]
async fn stale_share_listing_is_discarded() {
    init_logging();
    let (mock, mut started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    let resolve_first = mock.gate_shares();
    let first = {
        let selector = selector.clone();
        tokio::spawn(async move { selector.load_top_level().await })
    };
    started_rx.recv().await.expect("first fetch started");

    let resolve_second = mock.gate_shares();
    let second = {
        let selector = selector.clone();
        tokio::spawn(async move { selector.load_top_level().await })
    };
    started_rx.recv().await.expect("second fetch started");

    // The newer request resolves first and is applied.
    resolve_second
        .send(Ok(vec![share("fresh", "/fresh")]))
        .expect("resolve second");
    second.await.expect("second load");
    match selector.presentation("/").expect("root") {
        NodePresentation::Rows(rows) => assert_eq!(rows[0].path, "/fresh"),
        other => panic!("unexpected presentation: {other:?}"),
    }

    // The older request resolves late and must change nothing.
    resolve_first
        .send(Ok(vec![share("stale", "/stale")]))
        .expect("resolve first");
    first.await.expect("first load");
    match selector.presentation("/").expect("root") {
        NodePresentation::Rows(rows) => assert_eq!(rows[0].path, "/fresh"),
        other => panic!("unexpected presentation: {other:?}"),
    }
}

#[tokio::test]
async fn failed_listing_presents_the_translated_message() {
    init_logging();
    let (mock, _started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    let resolve = mock.gate_shares();
    resolve
        .send(Err(ApiError::Connection("boom".to_string())))
        .expect("resolve with error");
    selector.load_top_level().await;

    match selector.presentation("/").expect("root") {
        NodePresentation::Failed(message) => {
            assert!(message.contains("Could not connect"), "{message}");
        }
        other => panic!("unexpected presentation: {other:?}"),
    }
}

#[tokio::test]
async fn nested_load_before_top_level_is_a_noop() {
    init_logging();
    let (mock, _started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    selector.load_nested("/video").await;

    assert_eq!(mock.directory_calls.load(Ordering::Relaxed), 0);
    assert!(matches!(
        selector.presentation("/"),
        Some(NodePresentation::Loading)
    ));
}

#[tokio::test]
async fn nested_load_populates_child_rows() {
    init_logging();
    let (mock, _started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    selector.load_top_level().await;
    mock.set_directories(vec![Directory {
        name: "movies".to_string(),
        path: "/video/movies".to_string(),
    }]);
    selector.load_nested("/video").await;

    match selector.presentation("/video").expect("video node") {
        NodePresentation::Rows(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].path, "/video/movies");
        }
        other => panic!("unexpected presentation: {other:?}"),
    }
}

#[tokio::test]
async fn empty_directory_presents_the_empty_state() {
    init_logging();
    let (mock, _started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    selector.load_top_level().await;
    selector.load_nested("/video").await;

    assert!(matches!(
        selector.presentation("/video"),
        Some(NodePresentation::Empty)
    ));
}

#[tokio::test]
async fn activation_subscribes_once_and_reloads_on_config_change() {
    init_logging();
    let (mock, _started_rx) = MockApi::new();
    let selector = PathSelector::new(mock.clone());

    selector.activate().await;
    assert_eq!(mock.subscribes.load(Ordering::Relaxed), 1);
    assert_eq!(mock.share_calls.load(Ordering::Relaxed), 1);

    // Re-activation replaces the previous subscription instead of stacking.
    selector.activate().await;
    assert_eq!(mock.subscribes.load(Ordering::Relaxed), 2);
    assert_eq!(mock.unsubscribes.load(Ordering::Relaxed), 1);
    assert_eq!(mock.share_calls.load(Ordering::Relaxed), 2);

    // A configuration change triggers exactly one reload.
    mock.registry.notify_all();
    let calls = || mock.share_calls.load(Ordering::Relaxed);
    wait_until(|| calls() == 3).await;

    selector.deactivate();
    assert_eq!(mock.unsubscribes.load(Ordering::Relaxed), 2);
    mock.registry.notify_all();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(calls(), 3);
}
