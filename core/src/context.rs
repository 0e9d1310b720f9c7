//! Composition root.
//!
//! `AppContext` builds every service object once and wires them together:
//! token store, recovery, API client, reporter, services and the three
//! state stores, which it registers with recovery. Hosts construct one per
//! process and hand out the pieces they need.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::recovery::{Navigator, SessionRecovery};
use crate::report::{ErrorReporter, Notifier};
use crate::services::{AuthService, PropertyService};
use crate::session::{Storage, TokenStore};
use crate::stores::{AuthStore, OnboardingStore, PropertyStore};
use crate::transport::Transport;

pub struct AppContext {
    config: ClientConfig,
    tokens: TokenStore,
    recovery: Arc<SessionRecovery>,
    client: ApiClient,
    reporter: Arc<ErrorReporter>,
    auth: Arc<AuthStore>,
    onboarding: Arc<OnboardingStore>,
    properties: Arc<PropertyStore>,
}

impl AppContext {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tokens = TokenStore::new(storage);
        let recovery = Arc::new(SessionRecovery::new(tokens.clone(), navigator, config.login_path()));
        let client = ApiClient::new(transport, tokens.clone(), Arc::clone(&recovery));
        let reporter = Arc::new(ErrorReporter::new(notifier, Arc::clone(&recovery)));
        let routes = config.routes();

        let auth = Arc::new(AuthStore::new(
            AuthService::new(client.clone(), routes.clone(), Arc::clone(&reporter)),
            tokens.clone(),
        ));
        let onboarding = Arc::new(OnboardingStore::new());
        let properties = Arc::new(PropertyStore::new(PropertyService::new(
            client.clone(),
            routes,
            Arc::clone(&reporter),
        )));

        recovery.register(auth.clone());
        recovery.register(onboarding.clone());
        recovery.register(properties.clone());

        Self {
            config,
            tokens,
            recovery,
            client,
            reporter,
            auth,
            onboarding,
            properties,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn recovery(&self) -> &Arc<SessionRecovery> {
        &self.recovery
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn reporter(&self) -> &Arc<ErrorReporter> {
        &self.reporter
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn onboarding(&self) -> &Arc<OnboardingStore> {
        &self.onboarding
    }

    pub fn properties(&self) -> &Arc<PropertyStore> {
        &self.properties
    }
}
