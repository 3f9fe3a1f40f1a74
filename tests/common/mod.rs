#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use shortify::application::services::LinkService;
use shortify::domain::click_event::ClickEvent;
use shortify::domain::entities::{Link, NewLink};
use shortify::domain::rate_limiter::RateLimiter;
use shortify::domain::repositories::LinkRepository;
use shortify::error::AppError;
use shortify::routes::app_router;
use shortify::state::AppState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// Link store kept in memory, with the same dedup and collision rules as the
/// PostgreSQL table.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn seed(
        &self,
        original_url: &str,
        short_code: &str,
        expires_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Link {
        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            original_url.to_string(),
            short_code.to_string(),
            0,
            expires_at,
            created_at,
        );
        self.links.lock().unwrap().push(link.clone());
        link
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn click_count(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .map(|l| l.click_count)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::storage("in-memory store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        self.check()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.original_url == original_url)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == code)
            .cloned())
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check()?;
        let mut links = self.links.lock().unwrap();

        if let Some(existing) = links.iter().find(|l| l.original_url == new_link.original_url) {
            return Ok(existing.clone());
        }
        if links.iter().any(|l| l.short_code == new_link.short_code) {
            return Err(AppError::DuplicateCode);
        }

        let link = Link::new(
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            new_link.original_url,
            new_link.short_code,
            0,
            new_link.expires_at,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        self.check()?;
        if let Some(link) = self
            .links
            .lock()
            .unwrap()
            .iter_mut()
            .find(|l| l.short_code == code)
        {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.check()?;
        let mut links = self.links.lock().unwrap().clone();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

pub struct TestOptions {
    pub rate_limit_max: usize,
    pub behind_proxy: bool,
    pub queue_capacity: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            rate_limit_max: 5,
            behind_proxy: false,
            queue_capacity: 100,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryLinkRepository>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_state(
    repository: Arc<InMemoryLinkRepository>,
    options: &TestOptions,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(options.queue_capacity);

    let link_service = LinkService::new(repository, BASE_URL);
    let rate_limiter = RateLimiter::new(Duration::from_secs(60), options.rate_limit_max);

    let state = AppState::new(
        Arc::new(link_service),
        Arc::new(rate_limiter),
        tx,
        options.behind_proxy,
    );

    (state, rx)
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default())
}

pub fn spawn_app_with(options: TestOptions) -> TestApp {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let (state, clicks) = create_test_state(repository.clone(), &options);

    let app = app_router(state, "public").layer(MockConnectInfoLayer::new(
        PEER_ADDR.parse().unwrap(),
    ));

    TestApp {
        server: TestServer::new(app).unwrap(),
        repository,
        clicks,
    }
}

/// Waits until the click counter of `code` reaches `expected`.
pub async fn wait_for_clicks(repository: &InMemoryLinkRepository, code: &str, expected: i64) {
    for _ in 0..200 {
        if repository.click_count(code) == Some(expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "click count for {code} is {:?}, expected {expected}",
        repository.click_count(code)
    );
}

/// Extracts the short code from a returned short URL.
pub fn code_of(short_url: &str) -> String {
    short_url
        .strip_prefix(BASE_URL)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_else(|| panic!("unexpected short URL {short_url}"))
        .to_string()
}
