//! HTTP client wrapper for the admin API.

use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::api::ConnectionConfig;
use crate::error::{ImportError, ImportResult};
use crate::types::{Permission, Policy};

/// Envelope the CMS wraps every response payload in.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Session {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PolicyRecord {
    id: String,
}

/// Authenticated client for the admin API.
///
/// Constructed by [`CmsClient::login`]; every subsequent request carries the
/// session's bearer token.
#[derive(Debug)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CmsClient {
    /// Authenticate against `{base}/auth/login` and return a client bound
    /// to the session token.
    ///
    /// Credential rejection is fatal to the whole run: nothing downstream
    /// can succeed without a valid session.
    pub async fn login(config: &ConnectionConfig) -> ImportResult<Self> {
        let http = reqwest::Client::new();
        let response = http
            .post(format!("{}/auth/login", config.base_url))
            .json(&json!({"email": config.email, "password": config.password}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImportError::Authentication {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let session: Envelope<Session> = response.json().await?;
        debug!("Authenticated against {}", config.base_url);
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: session.data.access_token,
        })
    }

    /// Create a policy and return the identifier the instance assigned.
    /// The template identifier never reaches the wire.
    pub async fn create_policy(&self, policy: &Policy) -> ImportResult<String> {
        let response = self
            .http
            .post(format!("{}/policies", self.base_url))
            .bearer_auth(&self.token)
            .json(policy)
            .send()
            .await?;

        let response = check(response, "/policies").await?;
        let created: Envelope<PolicyRecord> = response.json().await?;
        Ok(created.data.id)
    }

    /// Look up an existing policy by exact name.
    pub async fn find_policy_by_name(&self, name: &str) -> ImportResult<Option<String>> {
        let response = self
            .http
            .get(format!("{}/policies", self.base_url))
            .bearer_auth(&self.token)
            .query(&[("filter[name][_eq]", name)])
            .send()
            .await?;

        let response = check(response, "/policies").await?;
        let found: Envelope<Vec<PolicyRecord>> = response.json().await?;
        Ok(found.data.into_iter().next().map(|record| record.id))
    }

    /// Submit a permission rule with its policy reference rewritten to the
    /// real identifier. The permissions endpoint answers 204 on some
    /// versions; any 2xx counts as success.
    pub async fn create_permission(&self, rule: &Permission, policy_id: &str) -> ImportResult<()> {
        let mut payload = serde_json::to_value(rule)?;
        payload["policy"] = serde_json::Value::String(policy_id.to_string());

        let response = self
            .http
            .post(format!("{}/permissions", self.base_url))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        check(response, "/permissions").await?;
        Ok(())
    }
}

/// Map a non-success status to an API error carrying the response body.
async fn check(response: reqwest::Response, endpoint: &str) -> ImportResult<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ImportError::Api {
            endpoint: endpoint.to_string(),
            status: response.status(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}
