// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

/// Execution role resolved for a Lambda function. Derived per request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleReference {
    arn: String,
    name: String,
}

impl RoleReference {
    /// The role name is the substring after the final `/` of the ARN.
    /// An ARN with no `/` yields the whole string as the name — the
    /// upstream behavior is preserved as-is rather than hardened.
    pub fn from_arn(arn: String) -> Self {
        let name = arn.rsplit('/').next().unwrap_or(arn.as_str()).to_string();
        Self { arn, name }
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_suffix_after_last_slash() {
        let role = RoleReference::from_arn("arn:aws:iam::123:role/fn1-exec-role".to_string());
        assert_eq!(role.name(), "fn1-exec-role");
        assert_eq!(role.arn(), "arn:aws:iam::123:role/fn1-exec-role");
    }

    #[test]
    fn test_nested_path_takes_final_segment() {
        let role =
            RoleReference::from_arn("arn:aws:iam::123:role/service/team/fn1-exec".to_string());
        assert_eq!(role.name(), "fn1-exec");
    }

    #[test]
    fn test_arn_without_delimiter_is_used_whole() {
        let role = RoleReference::from_arn("not-an-arn".to_string());
        assert_eq!(role.name(), "not-an-arn");
    }
}
