//! ENSM CLI
//!
//! Command-line interface for the encrypted ENS manager configuration:
//! RPC providers, signing accounts, networks, tracked names and expiry
//! notifications.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Password, Select};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zeroize::Zeroizing;

use ensm_config::{ConfigBackend, ConfigManager, FileBackend, ManagerState};
use ensm_core::types::{NotificationSettings, ProviderKind};
use ensm_core::EnsmError;

/// Password attempts allowed before giving up.
const MAX_UNLOCK_ATTEMPTS: u32 = 3;

/// ENSM - Encrypted configuration for ENS management
#[derive(Parser, Debug)]
#[command(name = "ensm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration directory (default: ~/.ens_manager)
    #[arg(long, global = true, env = "ENSM_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show configuration status
    Status,

    /// Manage RPC providers
    #[command(subcommand)]
    Provider(ProviderCommand),

    /// Manage signing accounts
    #[command(subcommand)]
    Account(AccountCommand),

    /// Manage chain networks
    #[command(subcommand)]
    Network(NetworkCommand),

    /// Track ENS name expiry dates
    #[command(subcommand)]
    Names(NamesCommand),

    /// Expiry notification settings
    #[command(subcommand)]
    Notify(NotifyCommand),
}

#[derive(Subcommand, Debug)]
enum ProviderCommand {
    /// Add a provider (the API key or URL is prompted for)
    Add {
        /// Provider name
        name: String,
        /// Provider type: infura, alchemy, quicknode or custom (asked if omitted)
        #[arg(long = "type", short = 't')]
        kind: Option<ProviderKind>,
        /// Make it the active provider
        #[arg(long)]
        activate: bool,
    },
    /// Remove a provider
    Remove {
        /// Provider name
        name: String,
    },
    /// Make a provider active
    Use {
        /// Provider name
        name: String,
    },
    /// Show one provider
    Show {
        /// Provider name
        name: String,
    },
    /// List all providers
    List,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Add an account (the private key is prompted for)
    Add {
        /// Account name
        name: String,
        /// Make it the active account
        #[arg(long)]
        activate: bool,
    },
    /// Remove an account
    Remove {
        /// Account name
        name: String,
    },
    /// Make an account active
    Use {
        /// Account name
        name: String,
    },
    /// Show one account
    Show {
        /// Account name
        name: String,
    },
    /// List all accounts
    List,
}

#[derive(Subcommand, Debug)]
enum NetworkCommand {
    /// Add a network, or change its URL and chain ID
    Set {
        /// Network name, e.g. mainnet
        name: String,
        /// RPC URL for this network
        #[arg(long)]
        url: String,
        /// Chain ID, e.g. 1 for mainnet
        #[arg(long)]
        chain_id: u64,
        /// Make it the default network
        #[arg(long)]
        default: bool,
    },
    /// Remove a network
    Remove {
        /// Network name
        name: String,
    },
    /// Make a network the default
    Use {
        /// Network name
        name: String,
    },
    /// Show one network, or the default network if no name is given
    Show {
        /// Network name
        name: Option<String>,
    },
    /// List all networks
    List,
}

#[derive(Subcommand, Debug)]
enum NamesCommand {
    /// Track a name, or update its expiry date
    Track {
        /// ENS name, e.g. alice.eth
        name: String,
        /// Expiry date (YYYY-MM-DD)
        expires_on: NaiveDate,
    },
    /// Stop tracking a name
    Untrack {
        /// ENS name
        name: String,
    },
    /// List tracked names
    List,
    /// List names expiring within the notification threshold
    Expiring,
}

#[derive(Subcommand, Debug)]
enum NotifyCommand {
    /// Show notification settings
    Show,
    /// Change notification settings
    Set {
        /// Email address for expiry notices
        #[arg(long)]
        email: Option<String>,
        /// Phone number for SMS expiry notices
        #[arg(long)]
        phone: Option<String>,
        /// Days before expiry to start warning
        #[arg(long)]
        threshold_days: Option<u32>,
        /// Remove the email address
        #[arg(long, conflicts_with = "email")]
        clear_email: bool,
        /// Remove the phone number
        #[arg(long, conflicts_with = "phone")]
        clear_phone: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ensm=debug,info"
    } else {
        "ensm=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "❌".red(), err);
            if let Some(ensm_err) = err.downcast_ref::<EnsmError>() {
                eprintln!("   {}", ensm_err.user_hint().dimmed());
            }
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Exit status: 2 for rejected input, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EnsmError>() {
        Some(e) if e.is_validation_error() => 2,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let backend = match &cli.config_dir {
        Some(dir) => FileBackend::open_dir(dir),
        None => FileBackend::open_default(),
    }
    .context("Cannot use configuration directory")?;

    let manager = ConfigManager::new(backend);
    debug!(location = %manager.location(), "Opening configuration");
    open_config(&manager)?;

    match cli.command {
        Commands::Status => cmd_status(&manager),
        Commands::Provider(cmd) => cmd_provider(&manager, cmd),
        Commands::Account(cmd) => cmd_account(&manager, cmd),
        Commands::Network(cmd) => cmd_network(&manager, cmd),
        Commands::Names(cmd) => cmd_names(&manager, cmd),
        Commands::Notify(cmd) => cmd_notify(&manager, cmd),
    }
}

/// Bootstrap a new configuration or unlock the existing one.
fn open_config<B: ConfigBackend>(manager: &ConfigManager<B>) -> Result<()> {
    match manager.initialize()? {
        ManagerState::Bootstrapping => {
            println!(
                "{}",
                "🔐 No configuration found. Choose a password to encrypt it.".cyan().bold()
            );
            let password = Zeroizing::new(
                Password::new()
                    .with_prompt("New password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            );
            manager.bootstrap(&password)?;
            println!("{} {}", "✅ Configuration created at".green(), manager.location());
        }
        ManagerState::Unlocking => {
            let mut attempts_left = MAX_UNLOCK_ATTEMPTS;
            loop {
                let password = Zeroizing::new(Password::new().with_prompt("Password").interact()?);
                match manager.unlock(&password) {
                    Ok(()) => break,
                    Err(EnsmError::Authentication) if attempts_left > 1 => {
                        attempts_left -= 1;
                        eprintln!(
                            "{} {} attempt(s) left",
                            "⚠️  Wrong password.".yellow(),
                            attempts_left
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        ManagerState::Uninitialized | ManagerState::Ready => {}
    }
    Ok(())
}

/// Ask for a provider type from the menu of all kinds.
fn prompt_provider_kind() -> Result<ProviderKind> {
    let items: Vec<String> = ProviderKind::ALL
        .iter()
        .map(|kind| format!("{:<10} {}", kind.label(), kind.description()))
        .collect();
    let choice = Select::new()
        .with_prompt("Provider type")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(ProviderKind::ALL[choice])
}

/// Read a secret without echoing it.
fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(Password::new().with_prompt(prompt).interact()?))
}

fn active_marker(active: bool) -> ColoredString {
    if active {
        "*".green().bold()
    } else {
        " ".normal()
    }
}

/// Show configuration status
fn cmd_status<B: ConfigBackend>(manager: &ConfigManager<B>) -> Result<()> {
    let summary = manager.summary();
    let none = || "(none)".dimmed().to_string();

    println!("{}", "📋 ENSM configuration".cyan().bold());
    println!("   {} {}", "Location:".dimmed(), summary.location);
    println!("   {} {}", "State:".dimmed(), summary.state);
    println!(
        "   {} {}",
        "Active provider:".dimmed(),
        summary.active_provider.unwrap_or_else(none)
    );
    println!(
        "   {} {}",
        "Active account:".dimmed(),
        summary.active_account.unwrap_or_else(none)
    );
    println!(
        "   {} {}",
        "Default network:".dimmed(),
        summary.default_network.unwrap_or_else(none)
    );
    println!(
        "   {} {} providers, {} accounts, {} networks, {} tracked names",
        "Entries:".dimmed(),
        summary.providers,
        summary.accounts,
        summary.networks,
        summary.tracked_names
    );

    match manager.connection()? {
        Some(info) => println!(
            "   {} {} as {}",
            "Connection:".dimmed(),
            info.provider_name,
            info.address
        ),
        None => println!(
            "\n{}",
            "ℹ️  Select a provider and an account to connect.".cyan()
        ),
    }

    let expiring = manager.expiring_names(Local::now().date_naive())?;
    if !expiring.is_empty() {
        println!(
            "\n{} {} name(s) expiring soon (see `ensm names expiring`)",
            "⚠️ ".yellow(),
            expiring.len()
        );
    }

    Ok(())
}

/// Manage providers
fn cmd_provider<B: ConfigBackend>(manager: &ConfigManager<B>, cmd: ProviderCommand) -> Result<()> {
    match cmd {
        ProviderCommand::Add {
            name,
            kind,
            activate,
        } => {
            let kind = match kind {
                Some(kind) => kind,
                None => prompt_provider_kind()?,
            };
            println!("{} {}", kind.label().cyan().bold(), kind.description().dimmed());
            let prompt = if kind.uses_api_key() {
                format!("{} API key", kind.label())
            } else {
                "RPC URL".to_string()
            };
            let secret = prompt_secret(&prompt)?;

            manager.add_provider(&name, kind, &secret)?;
            if activate {
                manager.set_active_provider(&name)?;
            }

            let provider = manager.get_provider_info(&name)?;
            println!(
                "{} {} ({})",
                "✅ Provider added:".green(),
                name,
                provider.endpoint.redacted_url()
            );
            if activate {
                println!("   {}", "Now active.".dimmed());
            }
        }
        ProviderCommand::Remove { name } => {
            manager.remove_provider(&name)?;
            println!("{} {}", "🗑  Provider removed:".green(), name);
        }
        ProviderCommand::Use { name } => {
            manager.set_active_provider(&name)?;
            println!("{} {}", "✅ Active provider:".green(), name);
        }
        ProviderCommand::Show { name } => {
            let provider = manager.get_provider_info(&name)?;
            let active = manager.active_provider_name()?.as_deref() == Some(name.as_str());
            println!("{}", provider.name.cyan().bold());
            println!("   {} {}", "Type:".dimmed(), provider.kind().label());
            println!("   {} {}", "URL:".dimmed(), provider.endpoint.redacted_url());
            println!("   {} {}", "Active:".dimmed(), if active { "yes" } else { "no" });
        }
        ProviderCommand::List => {
            let providers = manager.list_providers()?;
            if providers.is_empty() {
                println!("{}", "No providers configured. Add one with `ensm provider add`.".yellow());
                return Ok(());
            }
            let active = manager.active_provider_name()?;
            for provider in providers {
                let is_active = active.as_deref() == Some(provider.name.as_str());
                println!(
                    "{} {:<20} {:<10} {}",
                    active_marker(is_active),
                    provider.name,
                    provider.kind().label(),
                    provider.endpoint.redacted_url().dimmed()
                );
            }
        }
    }
    Ok(())
}

/// Manage accounts
fn cmd_account<B: ConfigBackend>(manager: &ConfigManager<B>, cmd: AccountCommand) -> Result<()> {
    match cmd {
        AccountCommand::Add { name, activate } => {
            let key = prompt_secret("Private key (hex)")?;
            let address = manager.add_account(&name, &key)?;
            if activate {
                manager.set_active_account(&name)?;
            }
            println!("{} {}", "✅ Account added:".green(), name);
            println!("   {} {}", "Address:".yellow(), address);
            if activate {
                println!("   {}", "Now active.".dimmed());
            }
        }
        AccountCommand::Remove { name } => {
            manager.remove_account(&name)?;
            println!("{} {}", "🗑  Account removed:".green(), name);
        }
        AccountCommand::Use { name } => {
            manager.set_active_account(&name)?;
            println!("{} {}", "✅ Active account:".green(), name);
        }
        AccountCommand::Show { name } => {
            let account = manager.get_account_info(&name)?;
            let active = manager.active_account_name()?.as_deref() == Some(name.as_str());
            println!("{}", account.name().cyan().bold());
            println!("   {} {}", "Address:".dimmed(), account.address());
            println!("   {} {}", "Active:".dimmed(), if active { "yes" } else { "no" });
        }
        AccountCommand::List => {
            let accounts = manager.list_accounts()?;
            if accounts.is_empty() {
                println!("{}", "No accounts configured. Add one with `ensm account add`.".yellow());
                return Ok(());
            }
            let active = manager.active_account_name()?;
            for account in accounts {
                let is_active = active.as_deref() == Some(account.name());
                println!(
                    "{} {:<20} {}",
                    active_marker(is_active),
                    account.name(),
                    account.address()
                );
            }
        }
    }
    Ok(())
}

/// Manage networks
fn cmd_network<B: ConfigBackend>(manager: &ConfigManager<B>, cmd: NetworkCommand) -> Result<()> {
    match cmd {
        NetworkCommand::Set {
            name,
            url,
            chain_id,
            default,
        } => {
            let created = manager.set_network_config(&name, &url, chain_id)?;
            if default {
                manager.set_default_network(&name)?;
            }
            let label = if created {
                "✅ Network added:"
            } else {
                "✅ Network updated:"
            };
            println!("{} {} (chain {})", label.green(), name, chain_id);
            if default {
                println!("   {}", "Now the default.".dimmed());
            }
        }
        NetworkCommand::Remove { name } => {
            manager.remove_network(&name)?;
            println!("{} {}", "🗑  Network removed:".green(), name);
        }
        NetworkCommand::Use { name } => {
            manager.set_default_network(&name)?;
            println!("{} {}", "✅ Default network:".green(), name);
        }
        NetworkCommand::Show { name } => {
            let default = manager.get_default_network()?;
            let network = match name {
                Some(name) => manager.get_network_config(&name)?,
                None => match default.clone() {
                    Some(network) => network,
                    None => {
                        println!(
                            "{}",
                            "No default network. Set one with `ensm network use`.".yellow()
                        );
                        return Ok(());
                    }
                },
            };
            let is_default = default.as_ref().map(|d| d.name.as_str()) == Some(network.name.as_str());
            println!("{}", network.name.cyan().bold());
            println!("   {} {}", "Chain ID:".dimmed(), network.chain_id);
            println!("   {} {}", "URL:".dimmed(), network.provider_url);
            println!("   {} {}", "Default:".dimmed(), if is_default { "yes" } else { "no" });
        }
        NetworkCommand::List => {
            let networks = manager.list_networks()?;
            if networks.is_empty() {
                println!("{}", "No networks configured. Add one with `ensm network set`.".yellow());
                return Ok(());
            }
            let default = manager.get_default_network()?.map(|n| n.name);
            for network in networks {
                let is_default = default.as_deref() == Some(network.name.as_str());
                println!(
                    "{} {:<20} {:<10} {}",
                    active_marker(is_default),
                    network.name,
                    network.chain_id,
                    network.provider_url.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn describe_expiry(days: i64) -> ColoredString {
    match days {
        d if d < 0 => format!("expired {} day(s) ago", -d).red().bold(),
        0 => "expires today".red().bold(),
        d => format!("{} day(s) left", d).normal(),
    }
}

/// Track ENS names
fn cmd_names<B: ConfigBackend>(manager: &ConfigManager<B>, cmd: NamesCommand) -> Result<()> {
    let today = Local::now().date_naive();
    match cmd {
        NamesCommand::Track { name, expires_on } => {
            if manager.track_name(&name, expires_on)? {
                println!("{} {} (expires {})", "✅ Tracking".green(), name, expires_on);
            } else {
                println!("{} {} → {}", "✅ Updated expiry:".green(), name, expires_on);
            }
        }
        NamesCommand::Untrack { name } => {
            manager.untrack_name(&name)?;
            println!("{} {}", "🗑  No longer tracking".green(), name);
        }
        NamesCommand::List => {
            let names = manager.list_tracked_names()?;
            if names.is_empty() {
                println!("{}", "No names tracked. Add one with `ensm names track`.".yellow());
                return Ok(());
            }
            for tracked in names {
                println!(
                    "  {:<32} {}  {}",
                    tracked.name,
                    tracked.expires_on,
                    describe_expiry(tracked.days_until_expiry(today))
                );
            }
        }
        NamesCommand::Expiring => {
            let threshold = manager.notification_settings()?.threshold_days;
            let expiring = manager.expiring_names(today)?;
            if expiring.is_empty() {
                println!(
                    "{} No names expire within {} days.",
                    "✅".green(),
                    threshold
                );
                return Ok(());
            }
            println!(
                "{} {} name(s) expire within {} days:",
                "⚠️ ".yellow().bold(),
                expiring.len(),
                threshold
            );
            for tracked in expiring {
                println!(
                    "  {:<32} {}  {}",
                    tracked.name,
                    tracked.expires_on,
                    describe_expiry(tracked.days_until_expiry(today))
                );
            }
        }
    }
    Ok(())
}

/// Apply `notify set` flags to the current settings.
fn merge_settings(
    mut settings: NotificationSettings,
    email: Option<String>,
    phone: Option<String>,
    threshold_days: Option<u32>,
    clear_email: bool,
    clear_phone: bool,
) -> NotificationSettings {
    if clear_email {
        settings.email = None;
    } else if email.is_some() {
        settings.email = email;
    }
    if clear_phone {
        settings.phone = None;
    } else if phone.is_some() {
        settings.phone = phone;
    }
    if let Some(days) = threshold_days {
        settings.threshold_days = days;
    }
    settings
}

/// Notification settings
fn cmd_notify<B: ConfigBackend>(manager: &ConfigManager<B>, cmd: NotifyCommand) -> Result<()> {
    match cmd {
        NotifyCommand::Show => {
            let settings = manager.notification_settings()?;
            let unset = || "(not set)".dimmed().to_string();
            println!("{}", "🔔 Notification settings".cyan().bold());
            println!("   {} {}", "Email:".dimmed(), settings.email.unwrap_or_else(unset));
            println!("   {} {}", "Phone:".dimmed(), settings.phone.unwrap_or_else(unset));
            println!("   {} {} days", "Threshold:".dimmed(), settings.threshold_days);
        }
        NotifyCommand::Set {
            email,
            phone,
            threshold_days,
            clear_email,
            clear_phone,
        } => {
            let current = manager.notification_settings()?;
            let updated = merge_settings(
                current,
                email,
                phone,
                threshold_days,
                clear_email,
                clear_phone,
            );
            manager.set_notification_settings(updated)?;
            println!("{}", "✅ Notification settings saved.".green());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_provider_add() {
        let cli = Cli::try_parse_from([
            "ensm", "provider", "add", "infura1", "--type", "Infura", "--activate",
        ])
        .unwrap();
        match cli.command {
            Commands::Provider(ProviderCommand::Add {
                name,
                kind,
                activate,
            }) => {
                assert_eq!(name, "infura1");
                assert_eq!(kind, Some(ProviderKind::Infura));
                assert!(activate);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_provider_type_rejected() {
        assert!(Cli::try_parse_from(["ensm", "provider", "add", "x", "--type", "ftp"]).is_err());
    }

    #[test]
    fn test_provider_type_optional() {
        let cli = Cli::try_parse_from(["ensm", "provider", "add", "local"]).unwrap();
        match cli.command {
            Commands::Provider(ProviderCommand::Add { kind, .. }) => assert!(kind.is_none()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_network_set() {
        let cli = Cli::try_parse_from([
            "ensm",
            "network",
            "set",
            "goerli",
            "--url",
            "https://goerli.rpc.example",
            "--chain-id",
            "5",
            "--default",
        ])
        .unwrap();
        match cli.command {
            Commands::Network(NetworkCommand::Set {
                name,
                url,
                chain_id,
                default,
            }) => {
                assert_eq!(name, "goerli");
                assert_eq!(url, "https://goerli.rpc.example");
                assert_eq!(chain_id, 5);
                assert!(default);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["ensm", "network", "set", "x", "--url", "https://a.example"]).is_err());
        assert!(Cli::try_parse_from([
            "ensm", "network", "set", "x", "--url", "https://a.example", "--chain-id", "-1"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_network_show_default() {
        let cli = Cli::try_parse_from(["ensm", "network", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Network(NetworkCommand::Show { name: None })
        ));
    }

    #[test]
    fn test_exit_code() {
        let invalid = anyhow::Error::new(EnsmError::InvalidNetwork("chain ID must be non-zero".into()));
        assert_eq!(exit_code(&invalid), 2);

        let locked = anyhow::Error::new(EnsmError::Authentication);
        assert_eq!(exit_code(&locked), 1);

        let contextual = anyhow::Error::new(EnsmError::Persistence("disk full".into())).context("saving");
        assert_eq!(exit_code(&contextual), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("prompt closed")), 1);
    }

    #[test]
    fn test_parse_track_date() {
        let cli = Cli::try_parse_from(["ensm", "names", "track", "alice.eth", "2027-03-01"]).unwrap();
        match cli.command {
            Commands::Names(NamesCommand::Track { expires_on, .. }) => {
                assert_eq!(expires_on, NaiveDate::from_ymd_opt(2027, 3, 1).unwrap());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["ensm", "names", "track", "alice.eth", "03/01/2027"]).is_err());
    }

    #[test]
    fn test_global_config_dir() {
        let cli = Cli::try_parse_from(["ensm", "status", "--config-dir", "/tmp/ensm"]).unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/ensm")));
    }

    #[test]
    fn test_merge_settings() {
        let current = NotificationSettings {
            email: Some("old@example.com".into()),
            phone: Some("+1 555 0100".into()),
            threshold_days: 30,
        };

        let merged = merge_settings(current.clone(), None, None, Some(14), false, true);
        assert_eq!(merged.email.as_deref(), Some("old@example.com"));
        assert!(merged.phone.is_none());
        assert_eq!(merged.threshold_days, 14);

        let merged = merge_settings(current, Some("new@example.com".into()), None, None, false, false);
        assert_eq!(merged.email.as_deref(), Some("new@example.com"));
        assert_eq!(merged.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn test_describe_expiry() {
        assert!(describe_expiry(-3).to_string().contains("expired 3"));
        assert!(describe_expiry(0).to_string().contains("today"));
        assert!(describe_expiry(12).to_string().contains("12 day"));
    }
}
