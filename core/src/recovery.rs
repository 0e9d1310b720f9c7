//! Session recovery after the backend rejects the bearer token.
//!
//! # Design
//! Recovery clears every registered state store, drops the persisted token
//! and hard-navigates to the login entry point. Each step is best-effort: a
//! failing or panicking step is logged and the next one still runs, so the
//! user never stays on a protected view with a dead session. Every step is
//! idempotent, which makes concurrent or repeated recovery harmless.
//!
//! Stores are held weakly. The stores own services that own the API client,
//! which owns this handle; strong references would form a cycle.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::session::TokenStore;

/// Application state that must be wiped when the session ends.
pub trait StateStore: Send + Sync {
    fn name(&self) -> &'static str;
    fn reset(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// In-app transition that keeps in-memory state.
    Soft,
    /// Full reload that discards all in-memory state.
    Hard,
}

/// The host's navigation primitive.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str, mode: NavigationMode);
}

/// Navigator that only records where it was sent.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<(String, NavigationMode)>>,
    current: Mutex<String>,
}

impl MemoryNavigator {
    pub fn new(start: &str) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            current: Mutex::new(start.to_string()),
        }
    }

    pub fn history(&self) -> Vec<(String, NavigationMode)> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, path: &str, mode: NavigationMode) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_string(), mode));
    }
}

pub struct SessionRecovery {
    stores: RwLock<Vec<Weak<dyn StateStore>>>,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionRecovery {
    pub fn new(tokens: TokenStore, navigator: Arc<dyn Navigator>, login_path: &str) -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
            tokens,
            navigator,
            login_path: login_path.to_string(),
        }
    }

    /// Add a store to the set recovery resets. The caller keeps ownership.
    pub fn register(&self, store: Arc<dyn StateStore>) {
        self.stores
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&store));
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn current_path(&self) -> String {
        self.navigator.current_path()
    }

    /// Whether the user is already somewhere under the login entry point.
    pub fn on_login_section(&self) -> bool {
        self.current_path().starts_with(&self.login_path)
    }

    /// Run recovery to completion on the current thread.
    pub fn recover(&self) {
        for store in self.live_stores() {
            match catch_unwind(AssertUnwindSafe(|| store.reset())) {
                Ok(Ok(())) => debug!(store = store.name(), "state store reset"),
                Ok(Err(error)) => {
                    warn!(store = store.name(), %error, "failed to reset state store during session recovery")
                }
                Err(_) => warn!(store = store.name(), "state store panicked during session recovery"),
            }
        }

        if let Err(error) = self.tokens.clear() {
            warn!(%error, "failed to remove session token during session recovery");
        }

        match catch_unwind(AssertUnwindSafe(|| self.navigator.current_path())) {
            Ok(current) if current == self.login_path => {}
            _ => self.navigator.navigate(&self.login_path, NavigationMode::Hard),
        }
    }

    /// Start recovery without waiting for it.
    ///
    /// Inside a tokio runtime the work runs as a detached task and its handle
    /// is returned; outside one it runs inline and `None` is returned.
    pub fn spawn(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let recovery = Arc::clone(self);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(async move { recovery.recover() })),
            Err(_) => {
                recovery.recover();
                None
            }
        }
    }

    fn live_stores(&self) -> Vec<Arc<dyn StateStore>> {
        self.stores
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingStore {
        resets: AtomicUsize,
    }

    impl StateStore for CountingStore {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn reset(&self) -> Result<(), StoreError> {
            self.resets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingStore;

    impl StateStore for FailingStore {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn reset(&self) -> Result<(), StoreError> {
            Err(StoreError::Poisoned("failing"))
        }
    }

    struct PanickingStore;

    impl StateStore for PanickingStore {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn reset(&self) -> Result<(), StoreError> {
            panic!("reset exploded")
        }
    }

    fn recovery_at(path: &str) -> (Arc<SessionRecovery>, Arc<MemoryNavigator>, TokenStore) {
        let tokens = TokenStore::in_memory();
        tokens.set("stale").unwrap();
        let navigator = Arc::new(MemoryNavigator::new(path));
        let recovery = Arc::new(SessionRecovery::new(tokens.clone(), navigator.clone(), "/auth/login"));
        (recovery, navigator, tokens)
    }

    #[test]
    fn recover_clears_everything_and_hard_navigates() {
        let (recovery, navigator, tokens) = recovery_at("/properties");
        let store = Arc::new(CountingStore::default());
        recovery.register(store.clone());

        recovery.recover();

        assert_eq!(store.resets.load(Ordering::SeqCst), 1);
        assert!(tokens.get().is_none());
        assert_eq!(
            navigator.history(),
            vec![("/auth/login".to_string(), NavigationMode::Hard)]
        );
    }

    #[test]
    fn recover_skips_navigation_on_login_page() {
        let (recovery, navigator, tokens) = recovery_at("/auth/login");
        recovery.recover();
        assert!(tokens.get().is_none());
        assert!(navigator.history().is_empty());
    }

    #[test]
    fn failing_steps_do_not_stop_recovery() {
        let (recovery, navigator, tokens) = recovery_at("/profile");
        let failing: Arc<dyn StateStore> = Arc::new(FailingStore);
        let panicking: Arc<dyn StateStore> = Arc::new(PanickingStore);
        let counting = Arc::new(CountingStore::default());
        recovery.register(failing.clone());
        recovery.register(panicking.clone());
        recovery.register(counting.clone());

        recovery.recover();

        assert_eq!(counting.resets.load(Ordering::SeqCst), 1);
        assert!(tokens.get().is_none());
        assert_eq!(navigator.history().len(), 1);
    }

    #[test]
    fn repeated_recovery_is_idempotent() {
        let (recovery, navigator, tokens) = recovery_at("/properties");
        recovery.recover();
        recovery.recover();
        assert!(tokens.get().is_none());
        assert_eq!(navigator.history().len(), 1);
    }

    #[test]
    fn dropped_stores_are_skipped() {
        let (recovery, _navigator, _tokens) = recovery_at("/properties");
        recovery.register(Arc::new(CountingStore::default()));
        assert!(recovery.live_stores().is_empty());
        recovery.recover();
    }

    #[test]
    fn login_section_includes_nested_paths() {
        let (recovery, _navigator, _tokens) = recovery_at("/auth/login?next=/profile");
        assert!(recovery.on_login_section());
        let (recovery, _navigator, _tokens) = recovery_at("/auth/register");
        assert!(!recovery.on_login_section());
    }

    #[test]
    fn spawn_outside_runtime_runs_inline() {
        let (recovery, navigator, _tokens) = recovery_at("/properties");
        assert!(recovery.spawn().is_none());
        assert_eq!(navigator.history().len(), 1);
    }

    #[tokio::test]
    async fn spawn_inside_runtime_detaches() {
        let (recovery, navigator, tokens) = recovery_at("/properties");
        let handle = recovery.spawn().expect("runtime handle");
        handle.await.unwrap();
        assert!(tokens.get().is_none());
        assert_eq!(navigator.history().len(), 1);
    }
}
