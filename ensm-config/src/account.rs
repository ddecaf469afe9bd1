//! Signing accounts.

use serde::{Deserialize, Serialize};

use ensm_core::error::{EnsmError, Result};
use ensm_core::types::{validate_entry_name, EthAddress, PrivateKey};
use ensm_crypto::derive_address;

/// A named account: a private key and the address it controls.
///
/// The address is always derived from the key; there is no way to build an
/// `Account` whose address disagrees with its key, including through
/// deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord")]
pub struct Account {
    name: String,
    private_key: PrivateKey,
    address: EthAddress,
}

impl Account {
    /// Creates an account, deriving its address.
    ///
    /// # Errors
    /// [`EnsmError::InvalidName`] for a bad name, [`EnsmError::InvalidKey`] if
    /// the key is not a usable secp256k1 scalar.
    pub fn new(name: &str, private_key: PrivateKey) -> Result<Self> {
        validate_entry_name(name)?;
        let address = derive_address(&private_key)?;
        Ok(Self {
            name: name.to_string(),
            private_key,
            address,
        })
    }

    /// Creates an account from a hex private key (optional `0x` prefix).
    pub fn from_hex(name: &str, private_key_hex: &str) -> Result<Self> {
        Self::new(name, PrivateKey::from_hex(private_key_hex)?)
    }

    /// Account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Address derived from the key.
    pub fn address(&self) -> EthAddress {
        self.address
    }
}

/// On-disk shape of an account, checked on the way in.
#[derive(Deserialize)]
struct AccountRecord {
    name: String,
    private_key: PrivateKey,
    address: EthAddress,
}

impl TryFrom<AccountRecord> for Account {
    type Error = EnsmError;

    fn try_from(record: AccountRecord) -> Result<Self> {
        let account = Account::new(&record.name, record.private_key)?;
        if account.address != record.address {
            return Err(EnsmError::CorruptData(format!(
                "stored address of account '{}' does not match its private key",
                record.name
            )));
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const KNOWN_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const KNOWN_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

    #[test]
    fn test_address_derived_from_key() {
        let account = Account::from_hex("main", KNOWN_KEY).unwrap();
        assert_eq!(account.name(), "main");
        assert_eq!(account.address().to_string(), KNOWN_ADDRESS);
    }

    #[test_case("" ; "empty")]
    #[test_case("0x1234" ; "too short")]
    #[test_case("zz0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318" ; "not hex")]
    #[test_case("0x0000000000000000000000000000000000000000000000000000000000000000" ; "zero scalar")]
    #[test_case("0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff" ; "above group order")]
    fn test_malformed_keys_rejected(key: &str) {
        assert!(matches!(
            Account::from_hex("main", key),
            Err(EnsmError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_bad_name_rejected() {
        assert!(matches!(
            Account::from_hex(" main", KNOWN_KEY),
            Err(EnsmError::InvalidName(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let account = Account::from_hex("main", KNOWN_KEY).unwrap();
        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains(KNOWN_ADDRESS));

        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_mismatched_address_rejected() {
        let account = Account::from_hex("main", KNOWN_KEY).unwrap();
        let json = serde_json::to_string(&account)
            .unwrap()
            .replace(KNOWN_ADDRESS, "0x0000000000000000000000000000000000000001");

        assert!(serde_json::from_str::<Account>(&json).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_hex("main", KNOWN_KEY).unwrap();
        let debug = format!("{:?}", account);
        assert!(!debug.contains("4c0883a6"));
        assert!(debug.contains("REDACTED"));
    }
}
