// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Cloud
//!
//! Provides cloud functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Implements cloud

// Cloud Provider Domain Interfaces (Anti-Corruption Layer)
//
// Defines domain interfaces for the compute and identity services so the
// enforcement logic never touches a vendor SDK directly.
//
// Implementations in infrastructure/ directory.

use async_trait::async_trait;

/// Resolves the execution role ARN of a named compute function
#[async_trait]
pub trait ComputeRoleResolver: Send + Sync {
    /// Look up the role ARN attached to `function_name` in `region`
    async fn get_role(&self, function_name: &str, region: &str) -> Result<String, CloudApiError>;
}

/// Mutates the permissions boundary on an identity-service role
#[async_trait]
pub trait IdentityPolicyManager: Send + Sync {
    /// Set `policy_arn` as the permissions boundary of `role_name`
    async fn attach_boundary(&self, role_name: &str, policy_arn: &str)
        -> Result<(), CloudApiError>;

    /// Remove the permissions boundary from `role_name`
    async fn detach_boundary(&self, role_name: &str) -> Result<(), CloudApiError>;
}

/// Errors that can occur talking to the cloud provider APIs
#[derive(Debug, thiserror::Error)]
pub enum CloudApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Service error: {0}")]
    Service(String),
}
