//! Session state — credential, profile, connection lifecycle, and the
//! position ledger, all behind a single lock.
//!
//! The store is a pure state container: it validates nothing and is written
//! to only by the auth and trade sub-clients. Keeping the ledger inside the
//! same locked state as the profile is what makes the fill invariant
//! structural: a reader holding the lock either sees the new position
//! together with the new balance, or neither.

use std::sync::Arc;

use async_lock::RwLock;
use rust_decimal::Decimal;

use crate::auth::{Credential, Profile};
use crate::domain::position::{Position, PositionLedger};

/// Balance every session starts with before (and without) authentication.
pub fn demo_balance() -> Decimal {
    Decimal::from(10_000u32)
}

/// Explicit session lifecycle. Entering `Authenticating` bumps the login
/// generation, which is how results of an abandoned attempt are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Authenticating,
    Authenticated,
}

/// Coherent read of the trade-relevant state, taken under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: ConnectionStatus,
    pub balance: Decimal,
    pub positions: Vec<Position>,
}

#[derive(Debug)]
struct SessionState {
    status: ConnectionStatus,
    credential: Option<Credential>,
    profile: Profile,
    ledger: PositionLedger,
    login_generation: u64,
}

impl SessionState {
    fn initial() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            credential: None,
            profile: Profile {
                balance: demo_balance(),
            },
            ledger: PositionLedger::new(),
            login_generation: 0,
        }
    }
}

/// Shared, cloneable handle to the session state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::initial())),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub async fn status(&self) -> ConnectionStatus {
        self.inner.read().await.status
    }

    pub async fn is_authenticated(&self) -> bool {
        let state = self.inner.read().await;
        state.status == ConnectionStatus::Authenticated && state.credential.is_some()
    }

    pub async fn balance(&self) -> Decimal {
        self.inner.read().await.profile.balance
    }

    pub async fn profile(&self) -> Profile {
        self.inner.read().await.profile.clone()
    }

    pub async fn positions(&self) -> Vec<Position> {
        self.inner.read().await.ledger.all().to_vec()
    }

    /// Balance + positions read under one lock acquisition.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.read().await;
        SessionSnapshot {
            status: state.status,
            balance: state.profile.balance,
            positions: state.ledger.all().to_vec(),
        }
    }

    // ── Login lifecycle ──────────────────────────────────────────────────

    /// Enter `Authenticating` and claim a new login generation.
    ///
    /// Any earlier in-flight attempt is implicitly abandoned: its
    /// generation no longer matches, so its completion will be refused.
    pub(crate) async fn begin_login(&self) -> u64 {
        let mut state = self.inner.write().await;
        state.login_generation += 1;
        state.status = ConnectionStatus::Authenticating;
        state.credential = None;
        state.login_generation
    }

    /// Commit a finished handshake. Returns `false` when `generation` is
    /// stale, in which case nothing is written.
    pub(crate) async fn complete_login(&self, generation: u64, credential: Credential) -> bool {
        let mut state = self.inner.write().await;
        if state.login_generation != generation {
            tracing::debug!(
                generation,
                current = state.login_generation,
                "Discarding superseded login attempt"
            );
            return false;
        }
        state.credential = Some(credential);
        state.status = ConnectionStatus::Authenticated;
        true
    }

    /// Record a failed handshake. A stale generation is ignored.
    pub(crate) async fn fail_login(&self, generation: u64) {
        let mut state = self.inner.write().await;
        if state.login_generation == generation {
            state.status = ConnectionStatus::Disconnected;
            state.credential = None;
        }
    }

    /// Install a freshly fetched profile if `generation` is still current.
    /// Returns `false` when the write was refused as stale.
    pub(crate) async fn set_profile(&self, generation: u64, profile: Profile) -> bool {
        let mut state = self.inner.write().await;
        if state.login_generation != generation {
            return false;
        }
        state.profile = profile;
        true
    }

    /// Install a refetched profile outside of a login handshake. Refused
    /// while unauthenticated so a late refresh cannot resurrect a torn-down
    /// session's balance.
    pub(crate) async fn update_profile(&self, profile: Profile) -> bool {
        let mut state = self.inner.write().await;
        if state.status != ConnectionStatus::Authenticated {
            return false;
        }
        state.profile = profile;
        true
    }

    // ── Trade reconciliation ─────────────────────────────────────────────

    /// Apply a trade fill: append the position and install the new balance
    /// under one write guard. This is the critical section that keeps
    /// concurrent submissions from interleaving their updates.
    pub(crate) async fn apply_fill(&self, position: Position, new_balance: Decimal) {
        let mut state = self.inner.write().await;
        state.ledger.add(position);
        state.profile.balance = new_balance;
    }

    /// Apply an authoritative full-entry replacement (e.g. a settlement
    /// pushed from a future backend channel). Unknown ids are dropped.
    pub async fn apply_settlement(&self, position: Position) -> bool {
        self.inner.write().await.ledger.replace(position)
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    /// Clear credential and profile on wallet disconnect/logout, and claim
    /// a new login generation so any attempt still in flight can no longer
    /// commit. Returns the claimed generation for the caller to tag its own
    /// cleanup writes with (e.g. clearing the HTTP token slot).
    ///
    /// Positions deliberately survive: they are display-only state and may
    /// remain on screen until the next mount.
    pub(crate) async fn teardown(&self) -> u64 {
        let mut state = self.inner.write().await;
        state.login_generation += 1;
        state.status = ConnectionStatus::Disconnected;
        state.credential = None;
        state.profile = Profile {
            balance: demo_balance(),
        };
        state.login_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::PositionStatus;
    use crate::shared::{Direction, Leverage, PositionId};

    fn make_position(id: &str) -> Position {
        Position {
            id: PositionId::from(id),
            direction: Direction::Short,
            amount: Decimal::from(250),
            entry_price: Decimal::from(64_000),
            leverage: Leverage::X500,
            status: PositionStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_demo() {
        let store = SessionStore::new();
        assert_eq!(store.status().await, ConnectionStatus::Disconnected);
        assert!(!store.is_authenticated().await);
        assert_eq!(store.balance().await, demo_balance());
        assert!(store.positions().await.is_empty());
    }

    #[tokio::test]
    async fn test_login_lifecycle_commits_current_generation() {
        let store = SessionStore::new();
        let generation = store.begin_login().await;
        assert_eq!(store.status().await, ConnectionStatus::Authenticating);

        assert!(store.complete_login(generation, Credential::new("tok".into())).await);
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_stale_login_attempt_is_discarded() {
        let store = SessionStore::new();
        let first = store.begin_login().await;
        let second = store.begin_login().await;

        // The first (abandoned) attempt finishes late — refused.
        assert!(!store.complete_login(first, Credential::new("stale".into())).await);
        assert!(!store.is_authenticated().await);

        // Its failure path must not knock out the newer attempt either.
        store.fail_login(first).await;
        assert_eq!(store.status().await, ConnectionStatus::Authenticating);

        assert!(store.complete_login(second, Credential::new("fresh".into())).await);
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_stale_profile_write_refused() {
        let store = SessionStore::new();
        let first = store.begin_login().await;
        let _second = store.begin_login().await;

        let stale = Profile {
            balance: Decimal::from(1),
        };
        assert!(!store.set_profile(first, stale).await);
        assert_eq!(store.balance().await, demo_balance());
    }

    #[tokio::test]
    async fn test_apply_fill_updates_balance_and_ledger_together() {
        let store = SessionStore::new();
        store.apply_fill(make_position("p1"), Decimal::from(9_750)).await;

        let snap = store.snapshot().await;
        assert_eq!(snap.balance, Decimal::from(9_750));
        assert_eq!(snap.positions.len(), 1);
        assert_eq!(snap.positions[0].id, PositionId::from("p1"));
    }

    #[tokio::test]
    async fn test_apply_settlement_replaces_entry() {
        let store = SessionStore::new();
        store.apply_fill(make_position("p1"), Decimal::from(9_750)).await;

        let mut settled = make_position("p1");
        settled.status = PositionStatus::Closed;
        assert!(store.apply_settlement(settled).await);

        let positions = store.positions().await;
        assert_eq!(positions[0].status, PositionStatus::Closed);
    }

    #[tokio::test]
    async fn test_login_begun_before_teardown_cannot_complete() {
        let store = SessionStore::new();
        let generation = store.begin_login().await;
        store.teardown().await;

        assert!(!store.complete_login(generation, Credential::new("late".into())).await);
        assert!(!store.is_authenticated().await);
        assert_eq!(store.status().await, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_teardown_clears_session_but_keeps_positions() {
        let store = SessionStore::new();
        let generation = store.begin_login().await;
        store.complete_login(generation, Credential::new("tok".into())).await;
        store.apply_fill(make_position("p1"), Decimal::from(9_000)).await;

        store.teardown().await;
        assert_eq!(store.status().await, ConnectionStatus::Disconnected);
        assert!(!store.is_authenticated().await);
        assert_eq!(store.balance().await, demo_balance());
        assert_eq!(store.positions().await.len(), 1);
    }
}
