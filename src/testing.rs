//! Test doubles shared by the unit tests.

use crate::api::{HttpResponse, HttpTransport};
use crate::error::{Error, Result, TransportError};
use crate::events::{Menu, MenuAction};
use crate::storage::{PersistedState, StateStore};
use crate::ui::TraySurface;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// The 50-asset CoinCap catalog.
pub fn catalog_fixture() -> &'static str {
    include_str!("../tests/fixtures/assets.json")
}

/// In-memory [`StateStore`] that records every save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    initial: PersistedState,
    saves: Mutex<Vec<PersistedState>>,
    delay: Duration,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose load returns `state`.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            initial: state,
            ..Self::default()
        }
    }

    /// Store that sleeps before every save.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Store whose load and save always fail.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Last saved state.
    pub fn current(&self) -> Option<PersistedState> {
        lock(&self.saves).last().cloned()
    }

    /// Every saved state, oldest first.
    pub fn saves(&self) -> Vec<PersistedState> {
        lock(&self.saves).clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<PersistedState> {
        if self.failing {
            return Err(Error::application("store unavailable"));
        }
        Ok(self.current().unwrap_or_else(|| self.initial.clone()))
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing {
            return Err(Error::application("store unavailable"));
        }
        lock(&self.saves).push(state.clone());
        Ok(())
    }
}

struct Route {
    needle: String,
    status: u16,
    body: String,
    delay: Duration,
    remaining: Option<AtomicUsize>,
}

impl Route {
    /// Take one use of the route. Limited routes run out.
    fn take(&self) -> bool {
        match &self.remaining {
            None => true,
            Some(remaining) => remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok(),
        }
    }
}

/// [`HttpTransport`] answering by URL substring, with per-route latency.
///
/// Routes are tried in the order they were added. Tracks how many requests
/// were in flight at once.
#[derive(Default)]
pub struct StubTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(mut self, needle: String, status: u16, body: String, delay: Duration, limit: Option<usize>) -> Self {
        self.routes.push(Route {
            needle,
            status,
            body,
            delay,
            remaining: limit.map(AtomicUsize::new),
        });
        self
    }

    /// Answer `/assets/<id>` with a CoinCap asset.
    pub fn coincap_asset(self, id: &str, symbol: &str, price: &str, delay: Duration) -> Self {
        let body = format!(
            r#"{{"data":{{"id":"{id}","symbol":"{symbol}","name":"{symbol}","priceUsd":"{price}","changePercent24Hr":"0"}},"timestamp":0}}"#
        );
        self.route(format!("/assets/{id}"), 200, body, delay, None)
    }

    /// Answer the Binance average price of `symbol`.
    pub fn binance_price(self, symbol: &str, price: &str, delay: Duration) -> Self {
        let body = format!(r#"{{"mins":5,"price":"{price}"}}"#);
        self.route(
            format!("symbol={}USDT", symbol.to_uppercase()),
            200,
            body,
            delay,
            None,
        )
    }

    /// Answer the catalog request with the fixture.
    pub fn catalog(self) -> Self {
        self.route(
            "/assets?limit=".to_string(),
            200,
            catalog_fixture().to_string(),
            Duration::ZERO,
            None,
        )
    }

    /// Answer URLs containing `needle` with an error status.
    pub fn fail(self, needle: &str, status: u16, delay: Duration) -> Self {
        self.route(needle.to_string(), status, String::new(), delay, None)
    }

    /// Like [`fail`](Self::fail), but only for the first `times` requests.
    pub fn fail_times(self, needle: &str, status: u16, times: usize) -> Self {
        self.route(needle.to_string(), status, String::new(), Duration::ZERO, Some(times))
    }

    /// Requested URLs in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    /// Highest number of concurrent requests seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str) -> std::result::Result<HttpResponse, TransportError> {
        lock(&self.requests).push(url.to_string());

        let Some(route) = self
            .routes
            .iter()
            .find(|route| url.contains(&route.needle) && route.take())
        else {
            return Err(TransportError(format!("no route for {url}")));
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(HttpResponse {
            status: route.status,
            body: route.body.clone().into_bytes(),
        })
    }
}

/// [`TraySurface`] that records every pushed text.
#[derive(Debug, Default)]
pub struct RecordingTray {
    frames: Mutex<Vec<String>>,
    menu: Mutex<Option<Menu>>,
}

impl RecordingTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every pushed text, blanks included.
    pub fn frames(&self) -> Vec<String> {
        lock(&self.frames).clone()
    }

    /// Last pushed text.
    pub fn last(&self) -> Option<String> {
        lock(&self.frames).last().cloned()
    }

    pub fn has_menu(&self) -> bool {
        lock(&self.menu).is_some()
    }

    /// Click the installed item for `action`.
    pub fn click(&self, action: &MenuAction) -> bool {
        lock(&self.menu)
            .as_ref()
            .and_then(|menu| menu.item_for(action))
            .map(|item| item.click())
            .unwrap_or(false)
    }
}

impl TraySurface for RecordingTray {
    fn set_display_text(&self, text: &str) {
        lock(&self.frames).push(text.to_string());
    }

    fn install_menu(&self, menu: Menu) {
        *lock(&self.menu) = Some(menu);
    }
}
