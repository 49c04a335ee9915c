// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Credentials
//!
//! Provides credentials functionality for the system.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Implements credentials

use std::env;
use std::fmt;

/// Static AWS credentials sourced from the environment, read once at
/// startup.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("{0} is not set in environment variables")]
    Missing(&'static str),
}

impl AwsCredentials {
    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
    /// `AWS_SESSION_TOKEN`. Absence of either required key is a typed
    /// error, never a silent `None`.
    pub fn from_env() -> Result<Self, CredentialsError> {
        let access_key_id = required("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = required("AWS_SECRET_ACCESS_KEY")?;
        let session_token = env::var("AWS_SESSION_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}

fn required(name: &'static str) -> Result<String, CredentialsError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(CredentialsError::Missing(name))
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}
