//! RPC provider configuration.
//!
//! A provider is either one of the hosted services with a known URL template,
//! in which case only the API key is stored, or a custom endpoint URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::validate_entry_name;
use crate::error::{EnsmError, Result};

/// URL schemes accepted for custom endpoints.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// Type of RPC provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Infura hosted node
    Infura,
    /// Alchemy hosted node
    Alchemy,
    /// QuickNode hosted node
    QuickNode,
    /// Any other endpoint, given as a full URL
    Custom,
}

impl ProviderKind {
    /// All provider kinds, in menu order.
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Infura,
        ProviderKind::Alchemy,
        ProviderKind::QuickNode,
        ProviderKind::Custom,
    ];

    /// URL template with an `{api_key}` placeholder, or `None` for custom endpoints.
    pub fn url_template(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Infura => Some("https://mainnet.infura.io/v3/{api_key}"),
            ProviderKind::Alchemy => Some("https://eth-mainnet.alchemyapi.io/v2/{api_key}"),
            ProviderKind::QuickNode => Some("https://api.quicknode.com/{api_key}"),
            ProviderKind::Custom => None,
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Infura => "Infura",
            ProviderKind::Alchemy => "Alchemy",
            ProviderKind::QuickNode => "QuickNode",
            ProviderKind::Custom => "Custom",
        }
    }

    /// One-line description for prompts.
    pub fn description(&self) -> &'static str {
        match self {
            ProviderKind::Infura => "Infura is a popular Ethereum infrastructure provider.",
            ProviderKind::Alchemy => "Alchemy provides powerful APIs for Ethereum.",
            ProviderKind::QuickNode => "QuickNode offers fast and reliable Ethereum nodes.",
            ProviderKind::Custom => "Enter a custom Ethereum provider URL.",
        }
    }

    /// True if the provider is configured from an API key rather than a URL.
    pub fn uses_api_key(&self) -> bool {
        self.url_template().is_some()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProviderKind {
    type Err = EnsmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infura" => Ok(ProviderKind::Infura),
            "alchemy" => Ok(ProviderKind::Alchemy),
            "quicknode" => Ok(ProviderKind::QuickNode),
            "custom" => Ok(ProviderKind::Custom),
            other => Err(EnsmError::InvalidProvider(format!(
                "unknown provider type '{}'",
                other
            ))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER ENDPOINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Connection data for one provider, one variant per [`ProviderKind`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEndpoint {
    /// Infura, keyed by project ID
    Infura {
        /// Project ID
        api_key: String,
    },
    /// Alchemy, keyed by API key
    Alchemy {
        /// API key
        api_key: String,
    },
    /// QuickNode, keyed by endpoint token
    QuickNode {
        /// Endpoint token
        api_key: String,
    },
    /// Custom endpoint
    Custom {
        /// Full RPC URL
        url: String,
    },
}

impl ProviderEndpoint {
    /// Builds an endpoint from a provider kind and the user's input.
    ///
    /// For template kinds `url_or_key` is the API key; for [`ProviderKind::Custom`]
    /// it is the full URL.
    pub fn new(kind: ProviderKind, url_or_key: &str) -> Result<Self> {
        let value = url_or_key.trim();
        let endpoint = match kind {
            ProviderKind::Infura => ProviderEndpoint::Infura {
                api_key: validate_api_key(value)?,
            },
            ProviderKind::Alchemy => ProviderEndpoint::Alchemy {
                api_key: validate_api_key(value)?,
            },
            ProviderKind::QuickNode => ProviderEndpoint::QuickNode {
                api_key: validate_api_key(value)?,
            },
            ProviderKind::Custom => ProviderEndpoint::Custom {
                url: validate_url(value)?,
            },
        };

        // Template output must itself be a usable URL
        validate_url(&endpoint.url())?;
        Ok(endpoint)
    }

    /// Provider kind of this endpoint.
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderEndpoint::Infura { .. } => ProviderKind::Infura,
            ProviderEndpoint::Alchemy { .. } => ProviderKind::Alchemy,
            ProviderEndpoint::QuickNode { .. } => ProviderKind::QuickNode,
            ProviderEndpoint::Custom { .. } => ProviderKind::Custom,
        }
    }

    /// API key for template kinds.
    pub fn api_key(&self) -> Option<&str> {
        match self {
            ProviderEndpoint::Infura { api_key }
            | ProviderEndpoint::Alchemy { api_key }
            | ProviderEndpoint::QuickNode { api_key } => Some(api_key),
            ProviderEndpoint::Custom { .. } => None,
        }
    }

    /// Effective RPC URL.
    pub fn url(&self) -> String {
        match self {
            ProviderEndpoint::Custom { url } => url.clone(),
            _ => {
                let template = self.kind().url_template().unwrap_or_default();
                template.replace("{api_key}", self.api_key().unwrap_or_default())
            }
        }
    }

    /// URL safe for display: host only, since paths and queries often carry keys.
    pub fn redacted_url(&self) -> String {
        let url = self.url();
        match Url::parse(&url) {
            Ok(parsed) => format!(
                "{}://{}/…",
                parsed.scheme(),
                parsed.host_str().unwrap_or("?")
            ),
            Err(_) => "[invalid url]".to_string(),
        }
    }
}

impl fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("kind", &self.kind())
            .field("url", &self.redacted_url())
            .finish()
    }
}

fn validate_api_key(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(EnsmError::InvalidProvider("API key is empty".into()));
    }
    if key.contains("://") {
        return Err(EnsmError::InvalidProvider(
            "expected an API key, not a URL (use the custom type for URLs)".into(),
        ));
    }
    if key
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '@'))
    {
        return Err(EnsmError::InvalidProvider(
            "API key contains invalid characters".into(),
        ));
    }
    Ok(key.to_string())
}

pub(crate) fn validate_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| EnsmError::InvalidProvider(format!("invalid URL: {}", e)))?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(EnsmError::InvalidProvider(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(EnsmError::InvalidProvider("URL has no host".into()));
    }
    Ok(raw.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// A named provider entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Unique name
    pub name: String,
    /// Connection data
    #[serde(flatten)]
    pub endpoint: ProviderEndpoint,
}

impl Provider {
    /// Creates a validated provider.
    pub fn new(name: &str, kind: ProviderKind, url_or_key: &str) -> Result<Self> {
        validate_entry_name(name)?;
        Ok(Self {
            name: name.to_string(),
            endpoint: ProviderEndpoint::new(kind, url_or_key)?,
        })
    }

    /// Provider kind.
    pub fn kind(&self) -> ProviderKind {
        self.endpoint.kind()
    }

    /// Effective RPC URL.
    pub fn url(&self) -> String {
        self.endpoint.url()
    }

    /// API key, for template kinds.
    pub fn api_key(&self) -> Option<&str> {
        self.endpoint.api_key()
    }
}
