//! Application state stores.
//!
//! # Design
//! Each store owns plain state behind a mutex and exposes small actions
//! over it. Locks are never held across an `.await`. A poisoned lock is
//! recovered rather than reported because the state is plain data that is
//! valid after any partial update. All three stores implement `StateStore`
//! so session recovery can wipe them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::{ApiError, StoreError};
use crate::recovery::StateStore;
use crate::services::{AuthService, PropertyService};
use crate::session::TokenStore;
use crate::types::{LoginCredentials, LoginResponse, ProfileUpdate, Property, PropertyFilters, User};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct AuthStore {
    state: Mutex<AuthState>,
    service: AuthService,
    tokens: TokenStore,
}

impl AuthStore {
    /// Starts authenticated if a token is already persisted.
    pub fn new(service: AuthService, tokens: TokenStore) -> Self {
        let token = tokens.get();
        let state = AuthState {
            is_authenticated: token.is_some(),
            token,
            ..AuthState::default()
        };
        Self {
            state: Mutex::new(state),
            service,
            tokens,
        }
    }

    pub fn snapshot(&self) -> AuthState {
        lock(&self.state).clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.begin();
        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.service.login_with_email(&credentials).await;
        self.finish_login(result)
    }

    pub async fn login_with_google(&self, id_token: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.service.login_with_google(id_token).await;
        self.finish_login(result)
    }

    /// Send a partial profile update and keep the returned user.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.begin();
        let result = self.service.update_profile(update).await;
        let mut state = lock(&self.state);
        state.is_loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user);
                Ok(())
            }
            Err(error) => {
                state.error = Some(error.message().to_string());
                Err(error)
            }
        }
    }

    fn begin(&self) {
        let mut state = lock(&self.state);
        state.is_loading = true;
        state.error = None;
    }

    fn finish_login(&self, result: Result<LoginResponse, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(response) => {
                if let Err(error) = self.tokens.set(&response.token) {
                    warn!(%error, "failed to persist session token");
                }
                *lock(&self.state) = AuthState {
                    user: Some(response.user),
                    token: Some(response.token),
                    is_authenticated: true,
                    is_loading: false,
                    error: None,
                };
                Ok(())
            }
            Err(error) => {
                let mut state = lock(&self.state);
                state.is_loading = false;
                state.is_authenticated = false;
                state.error = Some(error.message().to_string());
                Err(error)
            }
        }
    }

    /// Drop the persisted token and forget the user.
    pub fn logout(&self) -> Result<(), StoreError> {
        let cleared = self.tokens.clear();
        let mut state = lock(&self.state);
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        state.error = None;
        cleared
    }

    pub fn clear_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn set_loading(&self, loading: bool) {
        lock(&self.state).is_loading = loading;
    }
}

impl StateStore for AuthStore {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.logout()
    }
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingRole {
    Landlord,
    Tenant,
}

impl OnboardingRole {
    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingRole::Landlord => "landlord",
            OnboardingRole::Tenant => "tenant",
        }
    }
}

/// Wizard step: 1 picks a role, 2 asks about the profile, 3 wraps up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OnboardingStep {
    Role = 1,
    Profile = 2,
    Finish = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingMessage {
    pub id: String,
    pub speaker: Speaker,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    pub selected_role: Option<OnboardingRole>,
    pub wants_to_complete_profile: Option<bool>,
    pub is_complete: bool,
    pub messages: Vec<OnboardingMessage>,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            step: OnboardingStep::Role,
            selected_role: None,
            wants_to_complete_profile: None,
            is_complete: false,
            messages: Vec::new(),
        }
    }
}

const WELCOME: &str = "Welcome to RentFit! Let's get you started.";
const ASK_ROLE: &str = "What describes you the best?";
const ASK_PROFILE: &str = "Would you like to complete your profile?";
const ACCEPT_PROFILE: &str = "Yes, complete my profile";
const DEFER_PROFILE: &str = "I'll do this later";
const ASK_READY: &str = "Ready to get started?";

#[derive(Debug, Default)]
pub struct OnboardingStore {
    state: Mutex<OnboardingState>,
}

impl OnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OnboardingState {
        lock(&self.state).clone()
    }

    pub fn set_step(&self, step: OnboardingStep) {
        lock(&self.state).step = step;
    }

    pub fn select_role(&self, role: OnboardingRole) {
        lock(&self.state).selected_role = Some(role);
    }

    pub fn set_wants_to_complete_profile(&self, wants: bool) {
        lock(&self.state).wants_to_complete_profile = Some(wants);
    }

    pub fn add_message(&self, message: OnboardingMessage) {
        lock(&self.state).messages.push(message);
    }

    /// Rebuild the conversation from the answers given so far. No-op when a
    /// conversation is already present.
    pub fn initialize_messages(&self) {
        let mut state = lock(&self.state);
        if !state.messages.is_empty() {
            return;
        }

        let mut lines = vec![(Speaker::Bot, WELCOME.to_string())];
        match state.selected_role {
            None => lines.push((Speaker::Bot, ASK_ROLE.to_string())),
            Some(role) => {
                lines.push((Speaker::Bot, ASK_ROLE.to_string()));
                lines.push((Speaker::User, format!("I am a {}", role.as_str())));
                lines.push((Speaker::Bot, ASK_PROFILE.to_string()));
                if let Some(wants) = state.wants_to_complete_profile {
                    let answer = if wants { ACCEPT_PROFILE } else { DEFER_PROFILE };
                    lines.push((Speaker::User, answer.to_string()));
                    if state.step == OnboardingStep::Finish && !wants {
                        lines.push((Speaker::Bot, ASK_READY.to_string()));
                    }
                }
            }
        }

        state.messages = lines
            .into_iter()
            .enumerate()
            .map(|(index, (speaker, content))| OnboardingMessage {
                id: (index + 1).to_string(),
                speaker,
                content,
            })
            .collect();
    }

    pub fn complete(&self) {
        let mut state = lock(&self.state);
        state.is_complete = true;
        state.step = OnboardingStep::Finish;
    }
}

impl StateStore for OnboardingStore {
    fn name(&self) -> &'static str {
        "onboarding"
    }

    fn reset(&self) -> Result<(), StoreError> {
        *lock(&self.state) = OnboardingState::default();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyState {
    pub properties: Vec<Property>,
    pub selected: Option<Property>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct PropertyStore {
    state: Mutex<PropertyState>,
    service: PropertyService,
}

impl PropertyStore {
    pub fn new(service: PropertyService) -> Self {
        Self {
            state: Mutex::new(PropertyState::default()),
            service,
        }
    }

    pub fn snapshot(&self) -> PropertyState {
        lock(&self.state).clone()
    }

    pub async fn load(&self, filters: &PropertyFilters) -> Result<(), ApiError> {
        self.begin();
        let result = self.service.list(filters).await;
        let mut state = lock(&self.state);
        state.is_loading = false;
        match result {
            Ok(properties) => {
                state.properties = properties;
                Ok(())
            }
            Err(error) => {
                state.error = Some(error.message().to_string());
                Err(error)
            }
        }
    }

    pub async fn load_one(&self, id: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.service.get(id).await;
        let mut state = lock(&self.state);
        state.is_loading = false;
        match result {
            Ok(property) => {
                state.selected = Some(property);
                Ok(())
            }
            Err(error) => {
                state.error = Some(error.message().to_string());
                Err(error)
            }
        }
    }

    pub fn clear_selected(&self) {
        lock(&self.state).selected = None;
    }

    pub fn clear_error(&self) {
        lock(&self.state).error = None;
    }

    pub fn set_loading(&self, loading: bool) {
        lock(&self.state).is_loading = loading;
    }

    fn begin(&self) {
        let mut state = lock(&self.state);
        state.is_loading = true;
        state.error = None;
    }
}

impl StateStore for PropertyStore {
    fn name(&self) -> &'static str {
        "properties"
    }

    fn reset(&self) -> Result<(), StoreError> {
        *lock(&self.state) = PropertyState::default();
        Ok(())
    }
}
