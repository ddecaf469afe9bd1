//! In-memory configuration store.
//!
//! Holds providers, accounts, networks, the active selections, tracked ENS
//! names and notification settings. Every mutator either succeeds completely
//! or leaves the store untouched, and the active and default pointers never
//! name a missing entry.
//!
//! # Record Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "providers": { "<name>": { "name", "type", "api_key" | "url" } },
//!   "accounts": { "<name>": { "name", "private_key", "address" } },
//!   "active_provider": "<name>" | null,
//!   "active_account": "<name>" | null,
//!   "networks": { "<name>": { "name", "provider_url", "chain_id" } },
//!   "default_network": "<name>" | null,
//!   "tracked_names": { "<name>": { "name", "expires_on" } },
//!   "notifications": { "email"?, "phone"?, "threshold_days" }
//! }
//! ```
//!
//! Deserializing a [`ConfigStore`] always goes through the versioned record
//! and runs the same version and invariant checks as `ConfigStore::deserialize`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;
use zeroize::Zeroizing;

use ensm_core::constants::STORE_RECORD_VERSION;
use ensm_core::error::{EnsmError, EntryKind, Result};
use ensm_core::types::{
    validate_ens_name, Network, NotificationSettings, Provider, ProviderKind, TrackedName,
};

use crate::account::Account;

/// Providers, accounts, networks and settings, keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "StoreRecord")]
pub struct ConfigStore {
    providers: BTreeMap<String, Provider>,
    accounts: BTreeMap<String, Account>,
    active_provider: Option<String>,
    active_account: Option<String>,
    networks: BTreeMap<String, Network>,
    default_network: Option<String>,
    tracked_names: BTreeMap<String, TrackedName>,
    notifications: NotificationSettings,
}

#[derive(Serialize)]
struct StoreRecordRef<'a> {
    version: u32,
    providers: &'a BTreeMap<String, Provider>,
    accounts: &'a BTreeMap<String, Account>,
    active_provider: &'a Option<String>,
    active_account: &'a Option<String>,
    networks: &'a BTreeMap<String, Network>,
    default_network: &'a Option<String>,
    tracked_names: &'a BTreeMap<String, TrackedName>,
    notifications: &'a NotificationSettings,
}

#[derive(Deserialize)]
struct StoreRecord {
    version: u32,
    #[serde(default)]
    providers: BTreeMap<String, Provider>,
    #[serde(default)]
    accounts: BTreeMap<String, Account>,
    #[serde(default)]
    active_provider: Option<String>,
    #[serde(default)]
    active_account: Option<String>,
    #[serde(default)]
    networks: BTreeMap<String, Network>,
    #[serde(default)]
    default_network: Option<String>,
    #[serde(default)]
    tracked_names: BTreeMap<String, TrackedName>,
    #[serde(default)]
    notifications: NotificationSettings,
}

impl TryFrom<StoreRecord> for ConfigStore {
    type Error = String;

    fn try_from(record: StoreRecord) -> std::result::Result<Self, String> {
        if record.version != STORE_RECORD_VERSION {
            return Err(format!("unsupported store record version {}", record.version));
        }
        let store = Self {
            providers: record.providers,
            accounts: record.accounts,
            active_provider: record.active_provider,
            active_account: record.active_account,
            networks: record.networks,
            default_network: record.default_network,
            tracked_names: record.tracked_names,
            notifications: record.notifications,
        };
        store.validate()?;
        Ok(store)
    }
}

impl Serialize for ConfigStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Serializes the store to JSON.
    ///
    /// The output holds private keys, so it is zeroized on drop.
    pub fn serialize(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(&self.record())
            .map(Zeroizing::new)
            .map_err(|e| EnsmError::CorruptData(format!("failed to encode store: {}", e)))
    }

    /// Parses and validates a serialized store.
    ///
    /// # Errors
    /// [`EnsmError::CorruptData`] for malformed JSON, an unknown record
    /// version, or a record that breaks any store invariant.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| EnsmError::CorruptData(e.to_string()))
    }

    fn record(&self) -> StoreRecordRef<'_> {
        StoreRecordRef {
            version: STORE_RECORD_VERSION,
            providers: &self.providers,
            accounts: &self.accounts,
            active_provider: &self.active_provider,
            active_account: &self.active_account,
            networks: &self.networks,
            default_network: &self.default_network,
            tracked_names: &self.tracked_names,
            notifications: &self.notifications,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for (key, provider) in &self.providers {
            if key != &provider.name {
                return Err(format!("provider '{}' stored under key '{}'", provider.name, key));
            }
            let input = match provider.api_key() {
                Some(api_key) => api_key.to_string(),
                None => provider.url(),
            };
            Provider::new(&provider.name, provider.kind(), &input).map_err(|e| e.to_string())?;
        }

        for (key, account) in &self.accounts {
            if key != account.name() {
                return Err(format!("account '{}' stored under key '{}'", account.name(), key));
            }
        }

        for (key, network) in &self.networks {
            if key != &network.name {
                return Err(format!("network '{}' stored under key '{}'", network.name, key));
            }
            Network::new(&network.name, &network.provider_url, network.chain_id)
                .map_err(|e| e.to_string())?;
        }

        for (key, tracked) in &self.tracked_names {
            if key != &tracked.name {
                return Err(format!("tracked name '{}' stored under key '{}'", tracked.name, key));
            }
            validate_ens_name(&tracked.name).map_err(|e| e.to_string())?;
        }

        if let Some(name) = &self.active_provider {
            if !self.providers.contains_key(name) {
                return Err(format!("active provider '{}' does not exist", name));
            }
        }
        if let Some(name) = &self.active_account {
            if !self.accounts.contains_key(name) {
                return Err(format!("active account '{}' does not exist", name));
            }
        }
        if let Some(name) = &self.default_network {
            if !self.networks.contains_key(name) {
                return Err(format!("default network '{}' does not exist", name));
            }
        }

        self.notifications.validate().map_err(|e| e.to_string())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROVIDERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a provider. An existing name is rejected, never overwritten.
    pub fn add_provider(&mut self, name: &str, kind: ProviderKind, url_or_key: &str) -> Result<()> {
        if self.providers.contains_key(name) {
            return Err(EnsmError::duplicate(EntryKind::Provider, name));
        }
        let provider = Provider::new(name, kind, url_or_key)?;
        self.providers.insert(name.to_string(), provider);
        debug!(name, %kind, "Added provider");
        Ok(())
    }

    /// Removes a provider, clearing the active pointer if it named it.
    pub fn remove_provider(&mut self, name: &str) -> Result<Provider> {
        let provider = self
            .providers
            .remove(name)
            .ok_or_else(|| EnsmError::not_found(EntryKind::Provider, name))?;
        if self.active_provider.as_deref() == Some(name) {
            self.active_provider = None;
        }
        Ok(provider)
    }

    /// Marks a provider as active.
    pub fn set_active_provider(&mut self, name: &str) -> Result<()> {
        if !self.providers.contains_key(name) {
            return Err(EnsmError::not_found(EntryKind::Provider, name));
        }
        self.active_provider = Some(name.to_string());
        Ok(())
    }

    /// Looks up a provider by name.
    pub fn get_provider(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    /// All providers, ordered by name.
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Name of the active provider.
    pub fn active_provider_name(&self) -> Option<&str> {
        self.active_provider.as_deref()
    }

    /// The active provider.
    pub fn active_provider(&self) -> Option<&Provider> {
        self.active_provider
            .as_deref()
            .and_then(|name| self.providers.get(name))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCOUNTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds an account from a hex private key and returns it.
    ///
    /// The address is derived here; a malformed key fails with
    /// [`EnsmError::InvalidKey`] and nothing is stored.
    pub fn add_account(&mut self, name: &str, private_key_hex: &str) -> Result<&Account> {
        if self.accounts.contains_key(name) {
            return Err(EnsmError::duplicate(EntryKind::Account, name));
        }
        let account = Account::from_hex(name, private_key_hex)?;
        debug!(name, address = %account.address(), "Added account");
        Ok(self.accounts.entry(name.to_string()).or_insert(account))
    }

    /// Removes an account, clearing the active pointer if it named it.
    pub fn remove_account(&mut self, name: &str) -> Result<Account> {
        let account = self
            .accounts
            .remove(name)
            .ok_or_else(|| EnsmError::not_found(EntryKind::Account, name))?;
        if self.active_account.as_deref() == Some(name) {
            self.active_account = None;
        }
        Ok(account)
    }

    /// Marks an account as active.
    pub fn set_active_account(&mut self, name: &str) -> Result<()> {
        if !self.accounts.contains_key(name) {
            return Err(EnsmError::not_found(EntryKind::Account, name));
        }
        self.active_account = Some(name.to_string());
        Ok(())
    }

    /// Looks up an account by name.
    pub fn get_account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    /// All accounts, ordered by name.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Name of the active account.
    pub fn active_account_name(&self) -> Option<&str> {
        self.active_account.as_deref()
    }

    /// The active account.
    pub fn active_account(&self) -> Option<&Account> {
        self.active_account
            .as_deref()
            .and_then(|name| self.accounts.get(name))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORKS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a network, or replaces the URL and chain ID of an existing one.
    ///
    /// Returns true if the network did not exist before.
    pub fn set_network(&mut self, name: &str, provider_url: &str, chain_id: u64) -> Result<bool> {
        let network = Network::new(name, provider_url, chain_id)?;
        debug!(name, chain_id, "Set network");
        Ok(self.networks.insert(name.to_string(), network).is_none())
    }

    /// Removes a network, clearing the default pointer if it named it.
    pub fn remove_network(&mut self, name: &str) -> Result<Network> {
        let network = self
            .networks
            .remove(name)
            .ok_or_else(|| EnsmError::not_found(EntryKind::Network, name))?;
        if self.default_network.as_deref() == Some(name) {
            self.default_network = None;
        }
        Ok(network)
    }

    /// Marks a network as the default.
    pub fn set_default_network(&mut self, name: &str) -> Result<()> {
        if !self.networks.contains_key(name) {
            return Err(EnsmError::not_found(EntryKind::Network, name));
        }
        self.default_network = Some(name.to_string());
        Ok(())
    }

    /// Looks up a network by name.
    pub fn get_network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }

    /// All networks, ordered by name.
    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    /// Name of the default network.
    pub fn default_network_name(&self) -> Option<&str> {
        self.default_network.as_deref()
    }

    /// The default network.
    pub fn default_network(&self) -> Option<&Network> {
        self.default_network
            .as_deref()
            .and_then(|name| self.networks.get(name))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRACKED NAMES & NOTIFICATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Tracks an ENS name, or updates the expiry of one already tracked.
    ///
    /// Returns true if the name was not tracked before.
    pub fn track_name(&mut self, name: &str, expires_on: NaiveDate) -> Result<bool> {
        let tracked = TrackedName::new(name, expires_on)?;
        Ok(self.tracked_names.insert(name.to_string(), tracked).is_none())
    }

    /// Stops tracking an ENS name.
    pub fn untrack_name(&mut self, name: &str) -> Result<TrackedName> {
        self.tracked_names
            .remove(name)
            .ok_or_else(|| EnsmError::not_found(EntryKind::TrackedName, name))
    }

    /// All tracked names, ordered by name.
    pub fn tracked_names(&self) -> impl Iterator<Item = &TrackedName> {
        self.tracked_names.values()
    }

    /// Tracked names within the notification threshold of `today`, soonest first.
    pub fn expiring_names(&self, today: NaiveDate) -> Vec<&TrackedName> {
        let threshold = self.notifications.threshold_days;
        let mut expiring: Vec<&TrackedName> = self
            .tracked_names
            .values()
            .filter(|t| t.is_expiring(today, threshold))
            .collect();
        expiring.sort_by(|a, b| a.expires_on.cmp(&b.expires_on).then_with(|| a.name.cmp(&b.name)));
        expiring
    }

    /// Current notification settings.
    pub fn notification_settings(&self) -> &NotificationSettings {
        &self.notifications
    }

    /// Replaces the notification settings after validating them.
    pub fn set_notification_settings(&mut self, settings: NotificationSettings) -> Result<()> {
        settings.validate()?;
        self.notifications = settings;
        Ok(())
    }
}
