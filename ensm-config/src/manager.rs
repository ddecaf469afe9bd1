//! Configuration lifecycle and persistence.
//!
//! [`ConfigManager`] is the only type the rest of the application talks to.
//! It decides between bootstrap and unlock, holds the derived key for the
//! lifetime of the process, and re-encrypts and persists the store after
//! every mutation.
//!
//! ## States
//!
//! ```text
//! Uninitialized ──initialize()──► Bootstrapping ──bootstrap(pw)──► Ready
//!                      │
//!                      └────────► Unlocking ──unlock(pw)──► Ready
//!                                    ▲  │
//!                                    └──┘ wrong password
//! ```

use std::fmt;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use ensm_core::error::{EnsmError, EntryKind, Result};
use ensm_core::traits::ConfigBackend;
use ensm_core::types::{
    ConnectionInfo, EthAddress, Network, NotificationSettings, Provider, ProviderKind,
    TrackedName,
};
use ensm_crypto::{CipherKey, KdfParams, SecretCipher};

use crate::account::Account;
use crate::envelope::ConfigFile;
use crate::store::ConfigStore;

/// Lifecycle state of a [`ConfigManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagerState {
    /// Storage has not been inspected yet.
    Uninitialized,
    /// No config exists; waiting for a new password.
    Bootstrapping,
    /// A config exists; waiting for its password.
    Unlocking,
    /// Unlocked and usable.
    Ready,
}

impl fmt::Display for ManagerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerState::Uninitialized => write!(f, "uninitialized"),
            ManagerState::Bootstrapping => write!(f, "bootstrapping"),
            ManagerState::Unlocking => write!(f, "locked"),
            ManagerState::Ready => write!(f, "ready"),
        }
    }
}

/// Snapshot for status output. Counts are zero until the manager is ready.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigSummary {
    /// Current state
    pub state: ManagerState,
    /// Backend location
    pub location: String,
    /// Active provider name
    pub active_provider: Option<String>,
    /// Active account name
    pub active_account: Option<String>,
    /// Number of providers
    pub providers: usize,
    /// Number of accounts
    pub accounts: usize,
    /// Default network name
    pub default_network: Option<String>,
    /// Number of networks
    pub networks: usize,
    /// Number of tracked ENS names
    pub tracked_names: usize,
}

struct Session {
    cipher: SecretCipher,
    key: CipherKey,
    store: ConfigStore,
}

struct Inner {
    state: ManagerState,
    /// Envelope read at initialization, kept for unlock attempts
    pending: Option<ConfigFile>,
    session: Option<Session>,
}

impl Inner {
    fn session(&self, operation: &'static str) -> Result<&Session> {
        match (&self.state, &self.session) {
            (ManagerState::Ready, Some(session)) => Ok(session),
            _ => Err(self.invalid_state(operation)),
        }
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut Session> {
        let err = self.invalid_state(operation);
        match (&self.state, &mut self.session) {
            (ManagerState::Ready, Some(session)) => Ok(session),
            _ => Err(err),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> EnsmError {
        EnsmError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}

/// Encrypted configuration manager.
///
/// All access goes through one mutex; a mutation and its persistence form a
/// single critical section, and a failed write rolls the mutation back.
///
/// # Example
///
/// ```rust,ignore
/// let manager = ConfigManager::new(FileBackend::open_default()?);
/// match manager.initialize()? {
///     ManagerState::Bootstrapping => manager.bootstrap(&new_password)?,
///     ManagerState::Unlocking => manager.unlock(&password)?,
///     _ => {}
/// }
/// manager.add_provider("infura1", ProviderKind::Infura, "abc123")?;
/// ```
pub struct ConfigManager<B: ConfigBackend> {
    backend: B,
    kdf_params: KdfParams,
    inner: Mutex<Inner>,
}

impl<B: ConfigBackend> ConfigManager<B> {
    /// Creates a manager with the default KDF parameters.
    pub fn new(backend: B) -> Self {
        Self::with_kdf_params(backend, KdfParams::default())
    }

    /// Creates a manager that bootstraps new configs with `kdf_params`.
    ///
    /// Existing configs are always unlocked with the parameters stored in
    /// their header.
    pub fn with_kdf_params(backend: B, kdf_params: KdfParams) -> Self {
        Self {
            backend,
            kdf_params,
            inner: Mutex::new(Inner {
                state: ManagerState::Uninitialized,
                pending: None,
                session: None,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ManagerState {
        self.inner.lock().state
    }

    /// Where the config is stored.
    pub fn location(&self) -> String {
        self.backend.location()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Inspects storage and moves to `Bootstrapping` or `Unlocking`.
    ///
    /// Calling it again after the first transition returns the current state.
    ///
    /// # Errors
    /// [`EnsmError::CorruptData`] or [`EnsmError::VersionMismatch`] if the
    /// stored file is not a readable envelope; I/O errors from the backend.
    #[instrument(skip(self), fields(location = %self.backend.location()))]
    pub fn initialize(&self) -> Result<ManagerState> {
        let mut inner = self.inner.lock();
        if inner.state != ManagerState::Uninitialized {
            return Ok(inner.state);
        }

        if self.backend.exists()? {
            let file = ConfigFile::decode(&self.backend.read()?)?;
            inner.pending = Some(file);
            inner.state = ManagerState::Unlocking;
            info!("Existing configuration found");
        } else {
            inner.state = ManagerState::Bootstrapping;
            info!("No configuration found, bootstrap required");
        }

        Ok(inner.state)
    }

    /// Creates a new, empty configuration protected by `password`.
    ///
    /// On failure the manager stays in `Bootstrapping` and nothing is kept.
    #[instrument(skip(self, password))]
    pub fn bootstrap(&self, password: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != ManagerState::Bootstrapping {
            return Err(inner.invalid_state("bootstrap"));
        }
        if password.is_empty() {
            return Err(EnsmError::InvalidSetting("password must not be empty".into()));
        }

        let cipher = SecretCipher::generate(self.kdf_params);
        let key = cipher.derive_key(password)?;
        let session = Session {
            cipher,
            key,
            store: ConfigStore::new(),
        };
        self.persist(&session)?;

        inner.session = Some(session);
        inner.state = ManagerState::Ready;
        info!("Configuration created");
        Ok(())
    }

    /// Unlocks the existing configuration.
    ///
    /// # Errors
    /// [`EnsmError::Authentication`] for a wrong password or a tampered file;
    /// [`EnsmError::CorruptData`] if the decrypted store is invalid. Either
    /// way the manager stays in `Unlocking` and storage is not touched.
    #[instrument(skip(self, password))]
    pub fn unlock(&self, password: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != ManagerState::Unlocking {
            return Err(inner.invalid_state("unlock"));
        }
        let file = inner
            .pending
            .as_ref()
            .ok_or_else(|| inner.invalid_state("unlock"))?;

        let key = file.cipher.derive_key(password)?;
        let plaintext = match SecretCipher::decrypt(&key, &file.sealed) {
            Ok(plaintext) => plaintext,
            Err(EnsmError::Integrity) => {
                warn!("Unlock failed");
                return Err(EnsmError::Authentication);
            }
            Err(e) => return Err(e),
        };
        let store = ConfigStore::deserialize(&plaintext)?;

        let cipher = file.cipher.clone();
        inner.pending = None;
        inner.session = Some(Session { cipher, key, store });
        inner.state = ManagerState::Ready;
        info!("Configuration unlocked");
        Ok(())
    }

    /// Summary of the current state, available in every state.
    pub fn summary(&self) -> ConfigSummary {
        let inner = self.inner.lock();
        let store = inner.session.as_ref().map(|s| &s.store);
        ConfigSummary {
            state: inner.state,
            location: self.backend.location(),
            active_provider: store.and_then(|s| s.active_provider_name().map(str::to_string)),
            active_account: store.and_then(|s| s.active_account_name().map(str::to_string)),
            providers: store.map_or(0, |s| s.providers().count()),
            accounts: store.map_or(0, |s| s.accounts().count()),
            default_network: store.and_then(|s| s.default_network_name().map(str::to_string)),
            networks: store.map_or(0, |s| s.networks().count()),
            tracked_names: store.map_or(0, |s| s.tracked_names().count()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNALS
    // ═══════════════════════════════════════════════════════════════════════════

    fn persist(&self, session: &Session) -> Result<()> {
        let plaintext = session.store.serialize()?;
        let sealed = SecretCipher::encrypt(&session.key, &plaintext)?;
        let file = ConfigFile {
            cipher: session.cipher.clone(),
            sealed,
        };

        self.backend
            .write_atomic(&file.encode())
            .map_err(|e| match e {
                EnsmError::Persistence(_) => e,
                other => EnsmError::Persistence(other.to_string()),
            })
    }

    fn read<T>(&self, operation: &'static str, f: impl FnOnce(&ConfigStore) -> T) -> Result<T> {
        let inner = self.inner.lock();
        Ok(f(&inner.session(operation)?.store))
    }

    /// Applies `f` and persists; rolls back the store if persisting fails.
    fn mutate<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut ConfigStore) -> Result<T>,
    ) -> Result<T> {
        let mut inner = self.inner.lock();
        let session = inner.session_mut(operation)?;

        let snapshot = session.store.clone();
        let value = f(&mut session.store)?;

        if let Err(e) = self.persist(session) {
            warn!(operation, error = %e, "Persist failed, rolling back");
            session.store = snapshot;
            return Err(e);
        }

        debug!(operation, "Configuration saved");
        Ok(value)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACTIVE SELECTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// The active provider, if any.
    pub fn get_provider(&self) -> Result<Option<Provider>> {
        self.read("get_provider", |s| s.active_provider().cloned())
    }

    /// The active account, if any.
    pub fn get_account(&self) -> Result<Option<Account>> {
        self.read("get_account", |s| s.active_account().cloned())
    }

    /// Name of the active provider.
    pub fn active_provider_name(&self) -> Result<Option<String>> {
        self.read("active_provider_name", |s| {
            s.active_provider_name().map(str::to_string)
        })
    }

    /// Name of the active account.
    pub fn active_account_name(&self) -> Result<Option<String>> {
        self.read("active_account_name", |s| {
            s.active_account_name().map(str::to_string)
        })
    }

    /// Provider URL and signing key for the name-service client.
    ///
    /// `None` unless both a provider and an account are active.
    pub fn connection(&self) -> Result<Option<ConnectionInfo>> {
        self.read("connection", |s| {
            let provider = s.active_provider()?;
            let account = s.active_account()?;
            Some(ConnectionInfo {
                provider_name: provider.name.clone(),
                provider_url: provider.url(),
                account_name: account.name().to_string(),
                private_key: account.private_key().clone(),
                address: account.address(),
            })
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PROVIDERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a provider. `url_or_key` is the API key for template kinds and
    /// the full URL for [`ProviderKind::Custom`].
    #[instrument(skip(self, url_or_key))]
    pub fn add_provider(&self, name: &str, kind: ProviderKind, url_or_key: &str) -> Result<()> {
        self.mutate("add_provider", |s| s.add_provider(name, kind, url_or_key))?;
        info!("Provider added");
        Ok(())
    }

    /// Removes a provider.
    #[instrument(skip(self))]
    pub fn remove_provider(&self, name: &str) -> Result<()> {
        self.mutate("remove_provider", |s| s.remove_provider(name).map(|_| ()))?;
        info!("Provider removed");
        Ok(())
    }

    /// Makes a provider active.
    #[instrument(skip(self))]
    pub fn set_active_provider(&self, name: &str) -> Result<()> {
        self.mutate("set_active_provider", |s| s.set_active_provider(name))
    }

    /// All providers, ordered by name.
    pub fn list_providers(&self) -> Result<Vec<Provider>> {
        self.read("list_providers", |s| s.providers().cloned().collect())
    }

    /// A provider by name.
    pub fn get_provider_info(&self, name: &str) -> Result<Provider> {
        self.read("get_provider_info", |s| s.get_provider(name).cloned())?
            .ok_or_else(|| EnsmError::not_found(EntryKind::Provider, name))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCOUNTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds an account from a hex private key and returns its address.
    #[instrument(skip(self, private_key_hex))]
    pub fn add_account(&self, name: &str, private_key_hex: &str) -> Result<EthAddress> {
        let address = self.mutate("add_account", |s| {
            s.add_account(name, private_key_hex).map(Account::address)
        })?;
        info!(%address, "Account added");
        Ok(address)
    }

    /// Removes an account.
    #[instrument(skip(self))]
    pub fn remove_account(&self, name: &str) -> Result<()> {
        self.mutate("remove_account", |s| s.remove_account(name).map(|_| ()))?;
        info!("Account removed");
        Ok(())
    }

    /// Makes an account active.
    #[instrument(skip(self))]
    pub fn set_active_account(&self, name: &str) -> Result<()> {
        self.mutate("set_active_account", |s| s.set_active_account(name))
    }

    /// All accounts, ordered by name.
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.read("list_accounts", |s| s.accounts().cloned().collect())
    }

    /// An account by name.
    pub fn get_account_info(&self, name: &str) -> Result<Account> {
        self.read("get_account_info", |s| s.get_account(name).cloned())?
            .ok_or_else(|| EnsmError::not_found(EntryKind::Account, name))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORKS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a network or replaces its URL and chain ID. Returns true if new.
    #[instrument(skip(self, provider_url))]
    pub fn set_network_config(&self, name: &str, provider_url: &str, chain_id: u64) -> Result<bool> {
        let created = self.mutate("set_network_config", |s| {
            s.set_network(name, provider_url, chain_id)
        })?;
        info!(created, "Network saved");
        Ok(created)
    }

    /// A network by name.
    pub fn get_network_config(&self, name: &str) -> Result<Network> {
        self.read("get_network_config", |s| s.get_network(name).cloned())?
            .ok_or_else(|| EnsmError::not_found(EntryKind::Network, name))
    }

    /// Removes a network.
    #[instrument(skip(self))]
    pub fn remove_network(&self, name: &str) -> Result<()> {
        self.mutate("remove_network", |s| s.remove_network(name).map(|_| ()))?;
        info!("Network removed");
        Ok(())
    }

    /// All networks, ordered by name.
    pub fn list_networks(&self) -> Result<Vec<Network>> {
        self.read("list_networks", |s| s.networks().cloned().collect())
    }

    /// Makes a network the default.
    #[instrument(skip(self))]
    pub fn set_default_network(&self, name: &str) -> Result<()> {
        self.mutate("set_default_network", |s| s.set_default_network(name))
    }

    /// The default network, if one is set.
    pub fn get_default_network(&self) -> Result<Option<Network>> {
        self.read("get_default_network", |s| s.default_network().cloned())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRACKED NAMES & NOTIFICATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Tracks an ENS name or updates its expiry. Returns true if newly tracked.
    #[instrument(skip(self))]
    pub fn track_name(&self, name: &str, expires_on: NaiveDate) -> Result<bool> {
        self.mutate("track_name", |s| s.track_name(name, expires_on))
    }

    /// Stops tracking an ENS name.
    #[instrument(skip(self))]
    pub fn untrack_name(&self, name: &str) -> Result<()> {
        self.mutate("untrack_name", |s| s.untrack_name(name).map(|_| ()))
    }

    /// All tracked names, ordered by name.
    pub fn list_tracked_names(&self) -> Result<Vec<TrackedName>> {
        self.read("list_tracked_names", |s| s.tracked_names().cloned().collect())
    }

    /// Tracked names expiring within the notification threshold of `today`.
    pub fn expiring_names(&self, today: NaiveDate) -> Result<Vec<TrackedName>> {
        self.read("expiring_names", |s| {
            s.expiring_names(today).into_iter().cloned().collect()
        })
    }

    /// Current notification settings.
    pub fn notification_settings(&self) -> Result<NotificationSettings> {
        self.read("notification_settings", |s| s.notification_settings().clone())
    }

    /// Replaces the notification settings.
    #[instrument(skip(self, settings))]
    pub fn set_notification_settings(&self, settings: NotificationSettings) -> Result<()> {
        self.mutate("set_notification_settings", |s| {
            s.set_notification_settings(settings)
        })
    }
}

impl<B: ConfigBackend> fmt::Debug for ConfigManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("location", &self.backend.location())
            .field("state", &self.state())
            .finish()
    }
}
