//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZendeskError};

use super::defaults::*;

/// One configured Zendesk target: a subdomain plus the credential pair used
/// to talk to it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instance {
    /// Zendesk subdomain, the `acme` in `acme.zendesk.com`
    pub subdomain: String,
    /// Agent email the API token belongs to
    pub email: String,
    /// API token (may be empty when the token lives in the OS keychain).
    /// Never log or display this value.
    #[serde(default)]
    api_token: String,
    /// Optional accent color for the instance switcher (e.g. "#03363D")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Instance {
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Instance {
            subdomain: subdomain.into(),
            email: email.into(),
            api_token: api_token.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The inline API token from the preferences file, if any.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Resolve the API token: the inline token wins; otherwise look it up in
    /// the OS keychain under the `zendesk-palette` service, keyed by
    /// `email@subdomain`.
    pub fn resolve_token(&self) -> Result<String> {
        if !self.api_token.is_empty() {
            return Ok(self.api_token.clone());
        }

        let account = format!("{}@{}", self.email, self.subdomain);
        let entry = keyring::Entry::new(KEYRING_SERVICE, &account).map_err(|e| {
            ZendeskError::Config(format!("keychain unavailable for '{}': {}", account, e))
        })?;
        entry.get_password().map_err(|e| {
            ZendeskError::Config(format!("no API token for '{}' in keychain: {}", account, e))
        })
    }

    /// Validate the instance shape. Token presence is checked lazily by
    /// `resolve_token` so a keychain-backed instance still validates.
    pub fn validate(&self) -> Result<()> {
        if self.subdomain.is_empty()
            || !self
                .subdomain
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ZendeskError::Config(format!(
                "invalid subdomain '{}' (expected lowercase letters, digits, or '-')",
                self.subdomain
            )));
        }
        if !self.email.contains('@') {
            return Err(ZendeskError::Config(format!(
                "invalid email '{}'",
                self.email
            )));
        }
        Ok(())
    }
}

// Manual Debug so a stray `{:?}` can never leak the token into logs.
impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("color", &self.color)
            .finish()
    }
}

/// Host-managed preferences for the extension.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    /// All configured instances, in switcher order
    #[serde(default)]
    pub instances: Vec<Instance>,
    /// Subdomain of the active instance; falls back to the first instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_subdomain: Option<String>,
    /// Debounce window for search keystrokes (default: 500)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

impl Preferences {
    /// The instance searches run against. An unknown `active_subdomain`
    /// falls back to the first configured instance; an empty instance list
    /// yields None (the palette shows onboarding instead).
    pub fn active_instance(&self) -> Option<&Instance> {
        match &self.active_subdomain {
            Some(subdomain) => self
                .instances
                .iter()
                .find(|i| &i.subdomain == subdomain)
                .or_else(|| self.instances.first()),
            None => self.instances.first(),
        }
    }

    pub fn instance(&self, subdomain: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.subdomain == subdomain)
    }
}
