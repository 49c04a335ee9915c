// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Enforcement
//!
//! Provides enforcement functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements enforcement

use serde::Deserialize;

/// Region used when the request body omits one
pub const DEFAULT_REGION: &str = "eu-west-2";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Incoming enforcement request, wire-shaped.
///
/// Missing string fields deserialize to empty strings so that the
/// enforcer (not the JSON layer) rejects them with `InvalidRequest`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnforcementRequest {
    /// Target account id
    #[serde(rename = "account", default)]
    pub account_id: String,

    /// Name of the Lambda function whose execution role is mutated
    #[serde(rename = "lambda_function_name", default)]
    pub function_name: String,

    /// "add" or "remove"
    #[serde(default)]
    pub action: String,

    /// Region the Lambda function lives in
    #[serde(default = "default_region")]
    pub region: String,
}

impl EnforcementRequest {
    /// Presence checks plus action parsing. Anything else about the
    /// request shape is deliberately not validated.
    pub fn validate(&self) -> Result<BoundaryAction, EnforceError> {
        if self.account_id.is_empty() || self.function_name.is_empty() {
            return Err(EnforceError::InvalidRequest);
        }
        BoundaryAction::parse(&self.action).ok_or(EnforceError::InvalidRequest)
    }
}

/// What to do with the permissions boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAction {
    Add,
    Remove,
}

impl BoundaryAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnforcementStatus {
    Success,
    Error,
}

/// Outcome of a single enforcement call. Ephemeral, one per invocation.
#[derive(Debug, Clone)]
pub struct EnforcementResult {
    pub status: EnforcementStatus,
    pub message: String,
    pub http_status: u16,
}

impl EnforcementResult {
    pub fn success(message: String) -> Self {
        Self {
            status: EnforcementStatus::Success,
            message,
            http_status: 200,
        }
    }

    pub fn failure(err: EnforceError) -> Self {
        Self {
            status: EnforcementStatus::Error,
            http_status: err.http_status(),
            message: err.to_string(),
        }
    }
}

/// Errors that can terminate an enforcement request. All are terminal —
/// nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnforceError {
    #[error("Invalid request parameters")]
    InvalidRequest,

    #[error("AWS credentials are not set in environment variables")]
    MissingCredentials,

    #[error("Unable to retrieve Lambda function role.")]
    RoleResolutionFailed,

    #[error("Failed to add permissions boundary to role: {0}")]
    BoundaryAttachFailed(String),

    #[error("Failed to remove permissions boundary from role: {0}")]
    BoundaryDetachFailed(String),
}

impl EnforceError {
    /// HTTP status the error maps to: 400 for input, credential, and
    /// resolution problems, 500 for mutation failures.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest | Self::MissingCredentials | Self::RoleResolutionFailed => 400,
            Self::BoundaryAttachFailed(_) | Self::BoundaryDetachFailed(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(account: &str, function: &str, action: &str) -> EnforcementRequest {
        EnforcementRequest {
            account_id: account.to_string(),
            function_name: function.to_string(),
            action: action.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_add_and_remove() {
        assert_eq!(
            request("123", "fn1", "add").validate(),
            Ok(BoundaryAction::Add)
        );
        assert_eq!(
            request("123", "fn1", "remove").validate(),
            Ok(BoundaryAction::Remove)
        );
    }

    #[test]
    fn test_validate_rejects_missing_fields_and_unknown_actions() {
        assert_eq!(
            request("", "fn1", "add").validate(),
            Err(EnforceError::InvalidRequest)
        );
        assert_eq!(
            request("123", "", "add").validate(),
            Err(EnforceError::InvalidRequest)
        );
        assert_eq!(
            request("123", "fn1", "").validate(),
            Err(EnforceError::InvalidRequest)
        );
        assert_eq!(
            request("123", "fn1", "toggle").validate(),
            Err(EnforceError::InvalidRequest)
        );
    }

    #[test]
    fn test_missing_json_fields_deserialize_to_empty_strings() {
        let parsed: EnforcementRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.account_id, "");
        assert_eq!(parsed.function_name, "");
        assert_eq!(parsed.action, "");
        assert_eq!(parsed.region, DEFAULT_REGION);
    }

    #[test]
    fn test_region_override_is_honored() {
        let parsed: EnforcementRequest = serde_json::from_str(
            r#"{"account":"123","lambda_function_name":"fn1","action":"add","region":"us-west-1"}"#,
        )
        .unwrap();
        assert_eq!(parsed.region, "us-west-1");
        assert_eq!(parsed.account_id, "123");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(EnforceError::InvalidRequest.http_status(), 400);
        assert_eq!(EnforceError::MissingCredentials.http_status(), 400);
        assert_eq!(EnforceError::RoleResolutionFailed.http_status(), 400);
        assert_eq!(
            EnforceError::BoundaryAttachFailed("r".to_string()).http_status(),
            500
        );
        assert_eq!(
            EnforceError::BoundaryDetachFailed("r".to_string()).http_status(),
            500
        );
    }
}
