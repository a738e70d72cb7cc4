use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::services::settle;
use crate::types::{AdminUser, LoginRequest, LoginResponse};

#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist it in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidArgument(
                "email and password are required".to_string(),
            ));
        }

        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let response: LoginResponse = self
            .client
            .send(Method::POST, "/admin/login", Some(body), &[])
            .await
            .map_err(|e| match e {
                ApiError::Http { status, message } if matches!(status, 200..=299 | 400 | 401) => {
                    ApiError::InvalidCredentials(message)
                }
                other => other,
            })
            .inspect_err(|e| warn!("Login failed for {}: {}", email, e))?;

        let Some(token) = response.token.filter(|t| !t.is_empty()) else {
            let message = response
                .message
                .unwrap_or_else(|| "Login failed".to_string());
            warn!("Login for {} returned no token: {}", email, message);
            return Err(ApiError::InvalidCredentials(message));
        };

        let user = response.user.unwrap_or_else(|| AdminUser {
            id: None,
            full_name: String::new(),
            email: email.to_string(),
            role: None,
        });

        if let Err(e) = self.client.session().establish(token, Some(user.clone())) {
            // The in-memory session is live; only persistence failed.
            warn!("Logged in but could not persist credentials: {}", e);
        }
        info!("Admin {} logged in", user.email);
        Ok(user)
    }

    pub fn logout(&self) {
        self.client.session().clear();
        info!("Admin logged out");
    }

    /// Check a protected endpoint. `Ok(false)` means the token is gone or was
    /// rejected; other failures are returned so the caller can tell an
    /// unreachable server from an expired session.
    pub async fn validate_token(&self) -> Result<bool, ApiError> {
        if !self.is_authenticated() {
            return Ok(false);
        }

        let result = self.client.get::<Value>("/admin/dashboard", &[]).await;
        match settle("validate token", result) {
            Ok(_) => Ok(true),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn current_user(&self) -> Option<AdminUser> {
        self.client.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }
}
