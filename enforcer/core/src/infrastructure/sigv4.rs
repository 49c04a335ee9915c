// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// AWS Signature Version 4 request signing.
//
// Canonical request → string-to-sign → HMAC-SHA256 key derivation chain,
// per the AWS sigv4 specification. Only what the Lambda and IAM adapters
// need: header-based signing with an unsigned-optional query string and
// an in-memory payload.

use super::credentials::AwsCredentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

pub struct SigV4Signer {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

/// One request to sign. `timestamp` is caller-supplied so tests can pin
/// the published AWS test vectors.
pub struct SigningRequest<'a> {
    pub method: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub host: &'a str,
    /// Absolute path, already normalized and segment-encoded
    pub path: &'a str,
    /// Pre-encoded query string, empty when none
    pub query: &'a str,
    /// Additional headers to include in the signature (e.g. content-type)
    pub headers: &'a [(&'a str, &'a str)],
    pub payload: &'a [u8],
    pub timestamp: DateTime<Utc>,
}

impl SigV4Signer {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            access_key_id: credentials.access_key_id.clone(),
            secret_access_key: credentials.secret_access_key.clone(),
            session_token: credentials.session_token.clone(),
        }
    }

    /// Produce the headers to attach to the outgoing request:
    /// `authorization`, `x-amz-date`, and `x-amz-security-token` when a
    /// session token is present. Headers passed in `request.headers` are
    /// signed but must be set on the request by the caller.
    pub fn sign(&self, request: &SigningRequest<'_>) -> Vec<(String, String)> {
        let amz_date = request.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = request.timestamp.format("%Y%m%d").to_string();

        let mut headers: Vec<(String, String)> = vec![
            ("host".to_string(), request.host.to_string()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        for (name, value) in request.headers {
            headers.push((name.to_ascii_lowercase(), value.trim().to_string()));
        }
        if let Some(token) = &self.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let payload_hash = hex::encode(Sha256::digest(request.payload));

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            request.method,
            request.path,
            canonical_query(request.query),
            canonical_headers,
            signed_headers,
            payload_hash,
        );

        let scope = format!(
            "{date_stamp}/{}/{}/aws4_request",
            request.region, request.service
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes())),
        );

        let k_date = hmac(
            format!("AWS4{}", self.secret_access_key).as_bytes(),
            date_stamp.as_bytes(),
        );
        let k_region = hmac(&k_date, request.region.as_bytes());
        let k_service = hmac(&k_region, request.service.as_bytes());
        let k_signing = hmac(&k_service, b"aws4_request");
        let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id,
        );

        let mut out = vec![
            ("authorization".to_string(), authorization),
            ("x-amz-date".to_string(), amz_date),
        ];
        if let Some(token) = &self.session_token {
            out.push(("x-amz-security-token".to_string(), token.clone()));
        }
        out
    }
}

/// Query parameters must be sorted by name in the canonical request
fn canonical_query(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }
    let mut pairs: Vec<&str> = query.split('&').collect();
    pairs.sort_unstable();
    pairs.join("&")
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credentials() -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: None,
        }
    }

    // Published AWS sigv4 test vector: GET iam.amazonaws.com ListUsers,
    // 2015-08-30T12:36:00Z.
    #[test]
    fn test_official_iam_list_users_vector() {
        let signer = SigV4Signer::new(&example_credentials());
        let timestamp = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
        let headers = signer.sign(&SigningRequest {
            method: "GET",
            service: "iam",
            region: "us-east-1",
            host: "iam.amazonaws.com",
            path: "/",
            query: "Action=ListUsers&Version=2010-05-08",
            headers: &[(
                "content-type",
                "application/x-www-form-urlencoded; charset=utf-8",
            )],
            payload: b"",
            timestamp,
        });

        let authorization = headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .map(|(_, value)| value.as_str())
            .unwrap();
        assert_eq!(
            authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
        );
        assert!(headers
            .iter()
            .any(|(name, value)| name == "x-amz-date" && value == "20150830T123600Z"));
    }

    #[test]
    fn test_session_token_is_signed_and_emitted() {
        let credentials = AwsCredentials {
            session_token: Some("FQoGZXIvYXdzEXAMPLE".to_string()),
            ..example_credentials()
        };
        let signer = SigV4Signer::new(&credentials);
        let headers = signer.sign(&SigningRequest {
            method: "GET",
            service: "lambda",
            region: "eu-west-2",
            host: "lambda.eu-west-2.amazonaws.com",
            path: "/2015-03-31/functions/fn1",
            query: "",
            headers: &[],
            timestamp: Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
            payload: b"",
        });

        let authorization = headers
            .iter()
            .find(|(name, _)| name == "authorization")
            .map(|(_, value)| value.as_str())
            .unwrap();
        assert!(authorization.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
        assert!(headers
            .iter()
            .any(|(name, value)| name == "x-amz-security-token" && value == "FQoGZXIvYXdzEXAMPLE"));
    }

    #[test]
    fn test_canonical_query_sorts_pairs() {
        assert_eq!(
            canonical_query("Version=2010-05-08&Action=ListUsers"),
            "Action=ListUsers&Version=2010-05-08"
        );
        assert_eq!(canonical_query(""), "");
    }
}
