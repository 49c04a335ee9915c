// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod enforcer;

pub use enforcer::{BoundaryEnforcer, CloudClients, EnforcerConfig, PERMISSIONS_BOUNDARY_ARN};
