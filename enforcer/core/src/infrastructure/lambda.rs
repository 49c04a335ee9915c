// Lambda Compute Adapter
//
// Anti-Corruption Layer for the AWS Lambda GetFunction API

use crate::domain::cloud::{CloudApiError, ComputeRoleResolver};
use crate::infrastructure::credentials::AwsCredentials;
use crate::infrastructure::sigv4::{SigV4Signer, SigningRequest};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use url::Url;

pub struct LambdaRoleResolver {
    client: reqwest::Client,
    signer: SigV4Signer,
    endpoint: Option<String>,
}

#[derive(Deserialize)]
struct GetFunctionResponse {
    #[serde(rename = "Configuration", default)]
    configuration: Option<FunctionConfiguration>,
}

#[derive(Deserialize)]
struct FunctionConfiguration {
    #[serde(rename = "Role", default)]
    role: Option<String>,
}

impl LambdaRoleResolver {
    pub fn new(credentials: &AwsCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer: SigV4Signer::new(credentials),
            endpoint: None,
        }
    }

    /// Point the resolver at a non-default endpoint (tests, localstack)
    pub fn with_endpoint(credentials: &AwsCredentials, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer: SigV4Signer::new(credentials),
            endpoint: Some(endpoint.into()),
        }
    }

    fn endpoint_for(&self, region: &str) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://lambda.{region}.amazonaws.com"))
    }
}

#[async_trait]
impl ComputeRoleResolver for LambdaRoleResolver {
    async fn get_role(&self, function_name: &str, region: &str) -> Result<String, CloudApiError> {
        let url = format!(
            "{}/2015-03-31/functions/{function_name}",
            self.endpoint_for(region)
        );
        let parsed =
            Url::parse(&url).map_err(|err| CloudApiError::Network(format!("{url}: {err}")))?;
        let host = host_header(&parsed)
            .ok_or_else(|| CloudApiError::Network(format!("invalid endpoint: {url}")))?;

        let signed = self.signer.sign(&SigningRequest {
            method: "GET",
            service: "lambda",
            region,
            host: &host,
            path: parsed.path(),
            query: "",
            headers: &[],
            payload: b"",
            timestamp: Utc::now(),
        });

        let mut request = self.client.get(url);
        for (name, value) in signed {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|err| CloudApiError::Network(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(if status == 401 || status == 403 {
                CloudApiError::Authentication(error_text)
            } else if status == 404 {
                CloudApiError::NotFound(function_name.to_string())
            } else {
                CloudApiError::Service(format!("HTTP {status}: {error_text}"))
            });
        }

        let body: GetFunctionResponse = response.json().await.map_err(|err| {
            CloudApiError::Service(format!("Failed to parse GetFunction response: {err}"))
        })?;

        body.configuration
            .and_then(|configuration| configuration.role)
            .ok_or_else(|| {
                CloudApiError::Service("GetFunction response is missing the execution role".into())
            })
    }
}

/// Host header value including a non-default port, as signed and sent
pub(crate) fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
