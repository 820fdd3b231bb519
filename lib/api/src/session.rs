//! Per-user browsing state.
//!
//! Each session owns its own selection; the store only maps ids to sessions.
//! Lookups never read this state implicitly: a [`Session`] is turned into an
//! explicit [`RecommendRequest`] before the engine is called.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use skinmatch_core::{Error, RecommendRequest, Result};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Allowed recommendation counts for a product-list selection
pub const TOP_N_RANGE: RangeInclusive<usize> = 3..=10;
pub const DEFAULT_TOP_N: usize = 5;
/// Sessions untouched for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseMode {
    #[default]
    IngredientSearch,
    ProductList,
}

/// A product picked from the list, with the filters active at the time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub product: usize,
    pub top_n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Selection {
    pub fn new(product: usize, top_n: usize, category: Option<String>) -> Result<Self> {
        if !TOP_N_RANGE.contains(&top_n) {
            return Err(Error::InvalidRequest(format!(
                "top_n must be between {} and {}, got {}",
                TOP_N_RANGE.start(),
                TOP_N_RANGE.end(),
                top_n
            )));
        }
        Ok(Self {
            product,
            top_n,
            category,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub mode: BrowseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    pub show_recommendations: bool,
    #[serde(skip)]
    last_seen: Instant,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            mode: BrowseMode::default(),
            selection: None,
            show_recommendations: false,
            last_seen: Instant::now(),
        }
    }

    #[inline]
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= timeout
    }

    /// Switching mode hides any recommendations on screen
    pub fn set_mode(&mut self, mode: BrowseMode) {
        if self.mode != mode {
            self.mode = mode;
            self.show_recommendations = false;
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.mode = BrowseMode::ProductList;
        self.selection = Some(selection);
        self.show_recommendations = true;
    }

    pub fn reset(&mut self) {
        self.selection = None;
        self.show_recommendations = false;
    }

    /// The lookup the current screen should show, if any. Product-list
    /// selections never carry a brand filter.
    pub fn recommend_request(&self) -> Option<RecommendRequest> {
        if !self.show_recommendations || self.mode != BrowseMode::ProductList {
            return None;
        }
        let selection = self.selection.as_ref()?;
        let mut request = RecommendRequest::new(selection.product).top(selection.top_n);
        request.category = selection.category.clone();
        Some(request)
    }
}

/// Session table. Every read or update refreshes a session; idle ones are
/// invisible immediately and purged on the next `create`.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    #[inline]
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn create(&self) -> Session {
        let session = Session::new(Uuid::new_v4());
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        let now = session.last_seen;
        sessions.retain(|_, s| !s.is_idle(now, self.idle_timeout));
        if sessions.len() < before {
            debug!("Evicted {} idle session(s)", before - sessions.len());
        }
        sessions.insert(session.id, session.clone());
        session
    }

    pub fn get(&self, id: &Uuid) -> Option<Session> {
        self.update(id, |_| {})
    }

    /// Apply `f` to one live session and return the updated copy
    pub fn update<F>(&self, id: &Uuid, f: F) -> Option<Session>
    where
        F: FnOnce(&mut Session),
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(id)?;
        if session.is_idle(now, self.idle_timeout) {
            return None;
        }
        session.last_seen = now;
        f(session);
        Some(session.clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinmatch_core::Limit;

    #[test]
    fn test_new_session_shows_nothing() {
        let store = SessionStore::new();
        let session = store.create();
        assert_eq!(session.mode, BrowseMode::IngredientSearch);
        assert!(session.recommend_request().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_selection_builds_request() {
        let store = SessionStore::new();
        let id = store.create().id;
        let selection = Selection::new(4, 7, Some("Serum".to_string())).unwrap();
        let session = store.update(&id, |s| s.select(selection)).unwrap();

        let request = session.recommend_request().unwrap();
        assert_eq!(request.product, 4);
        assert_eq!(request.limit, Limit::Top(7));
        assert_eq!(request.category.as_deref(), Some("Serum"));
        assert!(request.brand.is_none());
        assert!(!request.same_brand_only);
    }

    #[test]
    fn test_reset_and_mode_switch_hide_recommendations() {
        let mut session = Session::new(Uuid::new_v4());
        session.select(Selection::new(0, 5, None).unwrap());
        session.set_mode(BrowseMode::IngredientSearch);
        assert!(session.recommend_request().is_none());

        session.select(Selection::new(1, 5, None).unwrap());
        assert!(session.recommend_request().is_some());
        session.reset();
        assert!(session.selection.is_none());
        assert!(session.recommend_request().is_none());
    }

    #[test]
    fn test_top_n_bounds() {
        assert!(Selection::new(0, 2, None).is_err());
        assert!(Selection::new(0, 11, None).is_err());
        assert!(Selection::new(0, 3, None).is_ok());
        assert!(Selection::new(0, 10, None).is_ok());
    }

    #[test]
    fn test_idle_session_evicted() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(20));
        let idle = store.create().id;
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.get(&idle).is_none());

        let fresh = store.create().id;
        assert_eq!(store.len(), 1);
        assert!(store.get(&fresh).is_some());
        assert!(!store.remove(&idle));
    }

    #[test]
    fn test_access_keeps_session_alive() {
        let store = SessionStore::with_idle_timeout(Duration::from_millis(500));
        let id = store.create().id;
        std::thread::sleep(Duration::from_millis(300));
        assert!(store.get(&id).is_some());
        std::thread::sleep(Duration::from_millis(300));
        store.create();
        assert_eq!(store.len(), 2);
        assert!(store.get(&id).is_some());
    }

    #[test]
    fn test_remove_unknown() {
        let store = SessionStore::new();
        assert!(!store.remove(&Uuid::new_v4()));
        assert!(store.update(&Uuid::new_v4(), |s| s.reset()).is_none());
    }
}
