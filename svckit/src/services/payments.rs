use std::sync::Arc;

use tracing::info;

use crate::errors::ApiError;
use crate::http::ApiClient;
use crate::services::settle;
use crate::types::PaymentVerification;

#[derive(Clone)]
pub struct PaymentService {
    client: Arc<ApiClient>,
}

impl PaymentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Ask the gateway for the current state of a payment reference.
    pub async fn verify(&self, reference: &str) -> Result<PaymentVerification, ApiError> {
        let reference = validate_reference(reference)?;
        let path = format!("/payment/verify/{}", reference);

        let result = self
            .client
            .post::<Option<PaymentVerification>, ()>(&path, None)
            .await;
        let mut verification = settle("verify payment", result)?.unwrap_or_default();
        if verification.reference.is_none() {
            verification.reference = Some(reference.to_string());
        }

        info!(
            "Payment {} verified: {}",
            reference,
            verification.status.as_deref().unwrap_or("unknown")
        );
        Ok(verification)
    }
}

/// References go into the URL path verbatim, so only a conservative
/// character set is accepted.
fn validate_reference(reference: &str) -> Result<&str, ApiError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ApiError::InvalidArgument("payment reference is required".to_string()));
    }
    if !reference
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ApiError::InvalidArgument(format!(
            "invalid payment reference: {}",
            reference
        )));
    }
    // "." and ".." would resolve to another path segment.
    if reference.chars().all(|c| c == '.') {
        return Err(ApiError::InvalidArgument(format!(
            "invalid payment reference: {}",
            reference
        )));
    }
    Ok(reference)
}
