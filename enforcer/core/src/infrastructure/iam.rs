// IAM Identity Adapter
//
// Anti-Corruption Layer for the AWS IAM role-policy query API

use crate::domain::cloud::{CloudApiError, IdentityPolicyManager};
use crate::infrastructure::credentials::AwsCredentials;
use crate::infrastructure::lambda::host_header;
use crate::infrastructure::sigv4::{SigV4Signer, SigningRequest};
use async_trait::async_trait;
use chrono::Utc;
use url::Url;

const IAM_ENDPOINT: &str = "https://iam.amazonaws.com";
const IAM_API_VERSION: &str = "2010-05-08";
// IAM is a global service; requests are signed for us-east-1 regardless
// of where the Lambda function lives.
const IAM_SIGNING_REGION: &str = "us-east-1";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub struct IamBoundaryClient {
    client: reqwest::Client,
    signer: SigV4Signer,
    endpoint: String,
}

impl IamBoundaryClient {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self::with_endpoint(credentials, IAM_ENDPOINT)
    }

    /// Point the client at a non-default endpoint (tests, localstack)
    pub fn with_endpoint(credentials: &AwsCredentials, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer: SigV4Signer::new(credentials),
            endpoint: endpoint.into(),
        }
    }

    async fn call(&self, parameters: &[(&str, &str)]) -> Result<(), CloudApiError> {
        let body = {
            let mut body = url::form_urlencoded::Serializer::new(String::new());
            for (name, value) in parameters {
                body.append_pair(name, value);
            }
            body.finish()
        };

        let parsed = Url::parse(&self.endpoint)
            .map_err(|err| CloudApiError::Network(format!("{}: {err}", self.endpoint)))?;
        let host = host_header(&parsed)
            .ok_or_else(|| CloudApiError::Network(format!("invalid endpoint: {}", self.endpoint)))?;

        let signed = self.signer.sign(&SigningRequest {
            method: "POST",
            service: "iam",
            region: IAM_SIGNING_REGION,
            host: &host,
            path: parsed.path(),
            query: "",
            headers: &[("content-type", FORM_CONTENT_TYPE)],
            payload: body.as_bytes(),
            timestamp: Utc::now(),
        });

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", FORM_CONTENT_TYPE)
            .body(body);
        for (name, value) in signed {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|err| CloudApiError::Network(err.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(if status == 401 || status == 403 {
            CloudApiError::Authentication(error_text)
        } else if status == 404 {
            CloudApiError::NotFound(error_text)
        } else {
            CloudApiError::Service(format!("HTTP {status}: {error_text}"))
        })
    }
}

#[async_trait]
impl IdentityPolicyManager for IamBoundaryClient {
    async fn attach_boundary(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> Result<(), CloudApiError> {
        self.call(&[
            ("Action", "PutRolePermissionsBoundary"),
            ("RoleName", role_name),
            ("PermissionsBoundary", policy_arn),
            ("Version", IAM_API_VERSION),
        ])
        .await
    }

    async fn detach_boundary(&self, role_name: &str) -> Result<(), CloudApiError> {
        self.call(&[
            ("Action", "DeleteRolePermissionsBoundary"),
            ("RoleName", role_name),
            ("Version", IAM_API_VERSION),
        ])
        .await
    }
}
