//! Async API client core for the tenant/landlord rentals backend.
//!
//! # Overview
//! Call sites speak camelCase; the backend speaks snake_case and wraps every
//! response in a `{success, data, message, error}` envelope. This crate sits
//! between the two: it converts keys in both directions, attaches the bearer
//! token, unwraps the envelope, normalizes failures, and recovers the
//! session when the backend answers 401.
//!
//! # Design
//! - `ApiClient` keeps the `build_request` / `parse_response` halves pure;
//!   the `Transport` trait is the only I/O seam.
//! - Shared state (token storage, state stores, navigation) is held by
//!   explicitly constructed service objects, wired once in `AppContext`.
//! - Recovery is started as a detached task and never delays the error the
//!   caller is waiting for.

pub mod case;
pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod http;
pub mod recovery;
pub mod report;
pub mod routes;
pub mod services;
pub mod session;
pub mod stores;
pub mod transport;
pub mod types;

pub use case::{to_camel, to_snake, Mapping, Shape, Tree};
pub use client::{ApiClient, ApiResponse, RequestSpec};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{ApiError, ConfigError, StoreError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use recovery::{MemoryNavigator, NavigationMode, Navigator, SessionRecovery, StateStore};
pub use report::{ErrorReporter, Notifier, Reportable, TracingNotifier};
pub use routes::Routes;
pub use services::{AuthService, PropertyService};
pub use session::{MemoryStorage, Storage, TokenStore};
pub use stores::{AuthStore, OnboardingStore, PropertyStore};
pub use transport::{Transport, UreqTransport};
