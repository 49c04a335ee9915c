// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::cloud::{ComputeRoleResolver, IdentityPolicyManager};
use crate::domain::enforcement::{
    BoundaryAction, EnforceError, EnforcementRequest, EnforcementResult,
};
use crate::domain::role::RoleReference;
use std::sync::Arc;
use tracing::{info, warn};

/// Permissions-boundary policy applied to execution roles. Fixed, not
/// configurable per request.
pub const PERMISSIONS_BOUNDARY_ARN: &str =
    "arn:aws:iam::aws:policy/AWSPriceListServiceFullAccess";

/// Immutable enforcer configuration, injected at construction
#[derive(Debug, Clone)]
pub struct EnforcerConfig {
    pub boundary_policy_arn: String,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            boundary_policy_arn: PERMISSIONS_BOUNDARY_ARN.to_string(),
        }
    }
}

/// Credentialed cloud clients the enforcer works through
pub struct CloudClients {
    pub roles: Arc<dyn ComputeRoleResolver>,
    pub boundaries: Arc<dyn IdentityPolicyManager>,
}

/// Toggles the IAM permissions boundary on a Lambda function's
/// execution role.
///
/// `clients` is `None` when AWS credentials were absent at startup; every
/// request is then rejected with `MissingCredentials` before any network
/// call is attempted.
pub struct BoundaryEnforcer {
    config: EnforcerConfig,
    clients: Option<CloudClients>,
}

impl BoundaryEnforcer {
    pub fn new(config: EnforcerConfig, clients: Option<CloudClients>) -> Self {
        Self { config, clients }
    }

    /// Run one enforcement request to completion. Control flow is linear:
    /// validate → resolve role → mutate policy. Each external call is
    /// attempted exactly once.
    pub async fn enforce(&self, request: &EnforcementRequest) -> EnforcementResult {
        match self.run(request).await {
            Ok(message) => EnforcementResult::success(message),
            Err(err) => EnforcementResult::failure(err),
        }
    }

    async fn run(&self, request: &EnforcementRequest) -> Result<String, EnforceError> {
        // 1. Validate request shape
        let action = request.validate()?;

        // 2. Credentials must have been present at startup
        let clients = self
            .clients
            .as_ref()
            .ok_or(EnforceError::MissingCredentials)?;

        // 3. Resolve the function's execution role
        let role_arn = clients
            .roles
            .get_role(&request.function_name, &request.region)
            .await
            .map_err(|err| {
                warn!(
                    function = %request.function_name,
                    account = %request.account_id,
                    "Error retrieving Lambda function role: {err}"
                );
                EnforceError::RoleResolutionFailed
            })?;
        if role_arn.is_empty() {
            return Err(EnforceError::RoleResolutionFailed);
        }
        let role = RoleReference::from_arn(role_arn);
        info!(role_arn = %role.arn(), "Lambda function role resolved");

        // 4. Apply or remove the boundary
        match action {
            BoundaryAction::Add => {
                clients
                    .boundaries
                    .attach_boundary(role.name(), &self.config.boundary_policy_arn)
                    .await
                    .map_err(|err| {
                        warn!(role = %role.name(), "Error applying permissions boundary: {err}");
                        EnforceError::BoundaryAttachFailed(role.name().to_string())
                    })?;
                Ok(format!(
                    "Permissions boundary added to role: {}",
                    role.name()
                ))
            }
            BoundaryAction::Remove => {
                clients
                    .boundaries
                    .detach_boundary(role.name())
                    .await
                    .map_err(|err| {
                        warn!(role = %role.name(), "Error deleting permissions boundary: {err}");
                        EnforceError::BoundaryDetachFailed(role.name().to_string())
                    })?;
                Ok(format!(
                    "Permissions boundary removed from role: {}",
                    role.name()
                ))
            }
        }
    }
}
