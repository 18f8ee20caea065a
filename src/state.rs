//! Application state
//!
//! Cart, wallet and sign-in state per storefront session, behind one
//! explicit store that request handlers share.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use crate::config::Config;
use crate::domain::aggregates::{Cart, CartLine, Order};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Money;
use crate::pricing::wallet::{apply_wallet, Payable};
use crate::pricing::PriceBreakdown;
use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub cart: Cart,
    pub auth_token: Option<String>,
    pub customer: Option<String>,
    pub wallet_balance: Money,
    pub use_wallet: bool,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool { self.auth_token.is_some() }

    /// Nothing worth keeping: reads of a blank session and a missing one agree.
    pub fn is_blank(&self) -> bool {
        self.cart.is_empty() && !self.is_signed_in() && self.wallet_balance.is_zero() && !self.use_wallet
    }

    pub fn checkout(&self) -> Checkout {
        let breakdown = self.cart.breakdown();
        let payable = apply_wallet(&breakdown, self.use_wallet, self.wallet_balance);
        Checkout { lines: self.cart.lines().to_vec(), breakdown, payable, wallet_balance: self.wallet_balance, use_wallet: self.use_wallet }
    }
}

/// What the checkout screen shows.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub lines: Vec<CartLine>,
    pub breakdown: PriceBreakdown,
    pub payable: Payable,
    pub wallet_balance: Money,
    pub use_wallet: bool,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self { Self::default() }

    /// Copy of the session; unknown sessions read as empty.
    pub async fn snapshot(&self, session: &str) -> Session {
        self.sessions.read().await.get(session).cloned().unwrap_or_default()
    }

    pub async fn session_count(&self) -> usize { self.sessions.read().await.len() }

    /// Runs `f` against the session's cart and logs whatever it changed.
    pub async fn update_cart<T>(&self, session: &str, f: impl FnOnce(&mut Cart) -> std::result::Result<T, crate::domain::aggregates::CartError>) -> Result<T> {
        let (out, _) = self.with_session(session, |s| f(&mut s.cart)).await;
        Ok(out?)
    }

    pub async fn replace_cart(&self, session: &str, lines: Vec<CartLine>) -> Session {
        self.update_session(session, |s| s.cart.replace(lines)).await
    }

    pub async fn set_wallet_balance(&self, session: &str, balance: Money) -> Session {
        self.update_session(session, |s| s.wallet_balance = balance.clamp_non_negative()).await
    }

    pub async fn toggle_wallet(&self, session: &str, use_wallet: bool) -> Session {
        self.update_session(session, |s| s.use_wallet = use_wallet).await
    }

    pub async fn sign_in(&self, session: &str, token: String, customer: Option<String>) -> Session {
        self.update_session(session, |s| {
            s.auth_token = Some(token);
            s.customer = customer;
        })
        .await
    }

    /// Forgets the token, the customer and the wallet; the cart stays.
    pub async fn sign_out(&self, session: &str) -> Session {
        self.update_session(session, |s| {
            s.auth_token = None;
            s.customer = None;
            s.wallet_balance = Money::ZERO;
            s.use_wallet = false;
        })
        .await
    }

    pub async fn checkout(&self, session: &str) -> Checkout {
        self.snapshot(session).await.checkout()
    }

    pub async fn place_order(&self, session: &str) -> Result<Order> {
        let s = self.snapshot(session).await;
        let mut order = Order::place(&s.cart, s.customer.clone(), s.use_wallet, s.wallet_balance)?;
        log_events(session, order.take_events());
        Ok(order)
    }

    /// Drops sessions not written to within `max_idle` of `now`.
    pub async fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen <= max_idle);
        before - sessions.len()
    }

    async fn update_session(&self, session: &str, f: impl FnOnce(&mut Session)) -> Session {
        self.with_session(session, f).await.1
    }

    /// Every write goes through here. Blank sessions are removed afterwards
    /// so that unknown ids never accumulate.
    async fn with_session<T>(&self, session: &str, f: impl FnOnce(&mut Session) -> T) -> (T, Session) {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(session.to_string()).or_default();
        let out = f(entry);
        log_events(session, entry.cart.take_events());
        entry.last_seen = Utc::now();
        let snapshot = entry.clone();
        if snapshot.is_blank() {
            sessions.remove(session);
        }
        (out, snapshot)
    }
}

/// Periodically evicts idle sessions from `store`.
pub fn spawn_idle_sweeper(store: SessionStore, max_idle: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            tick.tick().await;
            let evicted = store.evict_idle(Utc::now(), max_idle).await;
            if evicted > 0 {
                tracing::info!(evicted, "evicted idle sessions");
            }
        }
    })
}

fn log_events(session: &str, events: Vec<DomainEvent>) {
    for event in events {
        tracing::info!(session, ?event, "domain event");
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: SessionStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config), store: SessionStore::new() }
    }
}
