//! Named chain networks: an RPC URL plus the chain ID it serves.

use serde::{Deserialize, Serialize};

use super::names::validate_entry_name;
use super::provider::validate_url;
use crate::error::{EnsmError, Result};

/// A named network entry, e.g. `mainnet` on chain 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Unique name
    pub name: String,
    /// RPC endpoint for this chain
    pub provider_url: String,
    /// EIP-155 chain ID
    pub chain_id: u64,
}

impl Network {
    /// Creates a validated network.
    ///
    /// # Errors
    /// [`EnsmError::InvalidName`] for a bad name, [`EnsmError::InvalidNetwork`]
    /// for a zero chain ID or a URL that is not http(s) or ws(s).
    pub fn new(name: &str, provider_url: &str, chain_id: u64) -> Result<Self> {
        validate_entry_name(name)?;
        if chain_id == 0 {
            return Err(EnsmError::InvalidNetwork("chain ID must be non-zero".into()));
        }
        let provider_url = validate_url(provider_url.trim()).map_err(|e| match e {
            EnsmError::InvalidProvider(reason) => EnsmError::InvalidNetwork(reason),
            other => other,
        })?;
        Ok(Self {
            name: name.to_string(),
            provider_url,
            chain_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_new_network() {
        let network = Network::new("mainnet", " https://rpc.example/v1 ", 1).unwrap();
        assert_eq!(network.provider_url, "https://rpc.example/v1");
        assert_eq!(network.chain_id, 1);
    }

    #[test_case("https://rpc.example", 0 ; "zero chain id")]
    #[test_case("ftp://rpc.example", 1 ; "bad scheme")]
    #[test_case("not a url", 5 ; "unparseable url")]
    fn test_network_rejects(url: &str, chain_id: u64) {
        assert!(matches!(
            Network::new("goerli", url, chain_id),
            Err(EnsmError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_network_rejects_bad_name() {
        assert!(matches!(
            Network::new(" mainnet", "https://rpc.example", 1),
            Err(EnsmError::InvalidName(_))
        ));
    }

    #[test]
    fn test_network_serde_shape() {
        let network = Network::new("goerli", "https://goerli.rpc.example", 5).unwrap();
        let value = serde_json::to_value(&network).unwrap();
        assert_eq!(value["provider_url"], "https://goerli.rpc.example");
        assert_eq!(value["chain_id"], 5);
    }
}
