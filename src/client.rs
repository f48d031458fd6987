//! Authenticated Zendesk REST client.
//!
//! Thin wrapper over `ureq`: assembles the Basic-auth header from the
//! instance credential pair (`email/token:api_token`, base64-encoded),
//! targets the subdomain-derived base URL, and decodes JSON. Non-2xx
//! responses become [`ZendeskError::Api`] with the body text captured
//! verbatim; transport failures become [`ZendeskError::Network`]. No retry,
//! no backoff: every call is fire-once-report-result.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use tracing::debug;
use ureq::Agent;

use crate::config::Instance;
use crate::error::{Result, ZendeskError};

/// Global timeout per request. Searches are interactive; anything slower
/// than this reads as a hang in the palette.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct ZendeskClient {
    agent: Agent,
    instance: Instance,
    auth_header: String,
}

impl ZendeskClient {
    /// Build a client for one instance. Fails if no API token can be
    /// resolved (inline or keychain).
    pub fn new(instance: Instance) -> Result<Self> {
        let token = instance.resolve_token()?;
        let auth_header = format!("Basic {}", encode_credentials(&instance.email, &token));

        // Non-2xx must come back as a readable response, not a transport
        // error, so the body can be carried into the API error.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();

        Ok(ZendeskClient {
            agent,
            instance,
            auth_header,
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn subdomain(&self) -> &str {
        &self.instance.subdomain
    }

    /// API root: `https://{subdomain}.zendesk.com/api/v2`
    pub fn base_url(&self) -> String {
        format!("https://{}.zendesk.com/api/v2", self.instance.subdomain)
    }

    pub(crate) fn auth_header(&self) -> &str {
        &self.auth_header
    }

    /// GET an API path (leading slash), e.g. `get("/groups.json", &[])`.
    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url(), path);
        debug!(url = %url, params = query.len(), "Zendesk GET");

        let mut request = self
            .agent
            .get(&url)
            .header("Authorization", &self.auth_header);
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        decode(request.call()?)
    }

    /// GET an absolute URL. Used to follow `next_page` pagination links,
    /// which Zendesk returns fully qualified.
    pub fn get_url(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "Zendesk GET (absolute)");
        decode(
            self.agent
                .get(url)
                .header("Authorization", &self.auth_header)
                .call()?,
        )
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url(), path);
        debug!(url = %url, "Zendesk POST");
        decode(
            self.agent
                .post(&url)
                .header("Authorization", &self.auth_header)
                .send_json(body)?,
        )
    }

    pub fn put(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url(), path);
        debug!(url = %url, "Zendesk PUT");
        decode(
            self.agent
                .put(&url)
                .header("Authorization", &self.auth_header)
                .send_json(body)?,
        )
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base_url(), path);
        debug!(url = %url, "Zendesk DELETE");
        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.auth_header)
            .call()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(ZendeskError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Decode a response: non-2xx carries the body text into the API error,
/// success parses as JSON (empty bodies, e.g. 204, become `Null`).
fn decode(response: ureq::http::Response<ureq::Body>) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.into_body().read_to_string().unwrap_or_default();
        return Err(ZendeskError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.into_body().read_to_string()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Zendesk API-token Basic auth: `base64("{email}/token:{api_token}")`.
pub fn encode_credentials(email: &str, api_token: &str) -> String {
    BASE64.encode(format!("{}/token:{}", email, api_token))
}
