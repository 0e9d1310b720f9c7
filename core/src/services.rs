//! Typed calls for each backend resource.
//!
//! Services report every failure through the `ErrorReporter` with a
//! resource-specific fallback message, then hand the error back so the
//! caller can still react to it.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::case::Tree;
use crate::client::{ApiClient, RequestSpec};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::report::ErrorReporter;
use crate::routes::Routes;
use crate::types::{
    GoogleLogin, LoginCredentials, LoginResponse, ProfileUpdate, PropertiesResponse, Property,
    PropertyFilters, PropertyResponse, User,
};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
pub const GOOGLE_LOGIN_FAILED_MESSAGE: &str = "Google login failed. Please try again.";
pub const UPDATE_PROFILE_FAILED_MESSAGE: &str = "Failed to update profile. Please try again.";
pub const FETCH_USER_FAILED_MESSAGE: &str = "Failed to fetch your account. Please try again.";
pub const FETCH_PROPERTIES_FAILED_MESSAGE: &str = "Failed to fetch properties. Please try again.";
pub const FETCH_PROPERTY_FAILED_MESSAGE: &str = "Failed to fetch property. Please try again.";

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    routes: Routes,
    reporter: Arc<ErrorReporter>,
}

impl AuthService {
    pub fn new(client: ApiClient, routes: Routes, reporter: Arc<ErrorReporter>) -> Self {
        Self {
            client,
            routes,
            reporter,
        }
    }

    pub async fn login_with_email(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let result = self
            .send::<LoginResponse, _>(HttpMethod::Post, self.routes.auth_login(), credentials)
            .await;
        reported(&self.reporter, result, LOGIN_FAILED_MESSAGE)
    }

    /// Exchange an identity token from Google sign-in for a backend session.
    pub async fn login_with_google(&self, id_token: &str) -> Result<LoginResponse, ApiError> {
        let login = GoogleLogin {
            id_token: id_token.to_string(),
        };
        let result = self
            .send::<LoginResponse, _>(HttpMethod::Post, self.routes.auth_firebase(), &login)
            .await;
        reported(&self.reporter, result, GOOGLE_LOGIN_FAILED_MESSAGE)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let result = self
            .send::<User, _>(HttpMethod::Put, self.routes.auth_profile(), update)
            .await;
        reported(&self.reporter, result, UPDATE_PROFILE_FAILED_MESSAGE)
    }

    /// The account the current token belongs to.
    pub async fn me(&self) -> Result<User, ApiError> {
        let result = self.client.call::<User>(RequestSpec::get(self.routes.auth_me())).await;
        reported(&self.reporter, result.map(|response| response.data), FETCH_USER_FAILED_MESSAGE)
    }

    async fn send<T, B>(&self, method: HttpMethod, url: String, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Tree::from_serialize(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let spec = RequestSpec::new(method, url).with_body(body);
        Ok(self.client.call::<T>(spec).await?.data)
    }
}

#[derive(Clone)]
pub struct PropertyService {
    client: ApiClient,
    routes: Routes,
    reporter: Arc<ErrorReporter>,
}

impl PropertyService {
    pub fn new(client: ApiClient, routes: Routes, reporter: Arc<ErrorReporter>) -> Self {
        Self {
            client,
            routes,
            reporter,
        }
    }

    pub async fn list(&self, filters: &PropertyFilters) -> Result<Vec<Property>, ApiError> {
        let spec = RequestSpec::get(self.routes.properties()).with_query(filters.to_query());
        let result = self.client.call::<PropertiesResponse>(spec).await;
        reported(
            &self.reporter,
            result.map(|response| response.data.properties),
            FETCH_PROPERTIES_FAILED_MESSAGE,
        )
    }

    pub async fn get(&self, id: &str) -> Result<Property, ApiError> {
        let result = self
            .client
            .call::<PropertyResponse>(RequestSpec::get(self.routes.property(id)))
            .await;
        reported(
            &self.reporter,
            result.map(|response| response.data.property),
            FETCH_PROPERTY_FAILED_MESSAGE,
        )
    }
}

fn reported<T>(reporter: &ErrorReporter, result: Result<T, ApiError>, fallback: &str) -> Result<T, ApiError> {
    result.inspect_err(|error| reporter.report(error, Some(fallback)))
}
