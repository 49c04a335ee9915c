// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod credentials;
pub mod sigv4;
pub mod lambda;
pub mod iam;

pub use credentials::{AwsCredentials, CredentialsError};
