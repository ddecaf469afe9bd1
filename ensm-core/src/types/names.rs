//! Entry names, tracked ENS names and expiry notification settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXPIRY_THRESHOLD_DAYS, ENS_ALLOWED_TLDS, MAX_EXPIRY_THRESHOLD_DAYS};
use crate::error::{EnsmError, Result};

/// Longest accepted provider or account name.
const MAX_ENTRY_NAME_LEN: usize = 64;

/// Checks a provider or account name.
///
/// Names must be non-empty, carry no surrounding whitespace or control
/// characters, and stay under 64 characters.
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EnsmError::InvalidName("name is empty".into()));
    }
    if name.trim() != name {
        return Err(EnsmError::InvalidName(
            "name has leading or trailing whitespace".into(),
        ));
    }
    if name.chars().count() > MAX_ENTRY_NAME_LEN {
        return Err(EnsmError::InvalidName(format!(
            "name is longer than {} characters",
            MAX_ENTRY_NAME_LEN
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(EnsmError::InvalidName("name contains control characters".into()));
    }
    Ok(())
}

/// Checks the shape of an ENS name such as `alice.eth` or `pay.alice.eth`.
///
/// Only lowercase ASCII letters, digits and hyphens are accepted in labels.
pub fn validate_ens_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Err(EnsmError::InvalidName(format!("'{}': {}", name, reason)));

    if name.len() < 3 {
        return invalid("too short");
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return invalid("must contain at least one dot");
    }
    let tld = labels[labels.len() - 1];
    if !ENS_ALLOWED_TLDS.contains(&tld) {
        return invalid("unsupported top-level domain");
    }
    for label in &labels {
        if label.is_empty() {
            return invalid("empty label");
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return invalid("labels may only contain a-z, 0-9 and '-'");
        }
        if label.starts_with('-') || label.ends_with('-') {
            return invalid("labels may not start or end with '-'");
        }
        if label.contains("--") {
            return invalid("labels may not contain '--'");
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACKED NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// An ENS name whose registration expiry is watched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedName {
    /// ENS name
    pub name: String,
    /// Registration expiry date
    pub expires_on: NaiveDate,
}

impl TrackedName {
    /// Creates a tracked name after validating it.
    pub fn new(name: &str, expires_on: NaiveDate) -> Result<Self> {
        validate_ens_name(name)?;
        Ok(Self {
            name: name.to_string(),
            expires_on,
        })
    }

    /// Days from `today` until expiry; negative once expired.
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expires_on - today).num_days()
    }

    /// True if the name expires within `threshold_days` of `today`, or already has.
    pub fn is_expiring(&self, today: NaiveDate, threshold_days: u32) -> bool {
        self.days_until_expiry(today) <= i64::from(threshold_days)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NOTIFICATION SETTINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Where and when to warn about expiring names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Email address for expiry notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number for SMS expiry notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Days before expiry at which a name counts as expiring
    #[serde(default = "default_threshold_days")]
    pub threshold_days: u32,
}

fn default_threshold_days() -> u32 {
    DEFAULT_EXPIRY_THRESHOLD_DAYS
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: None,
            phone: None,
            threshold_days: DEFAULT_EXPIRY_THRESHOLD_DAYS,
        }
    }
}

impl NotificationSettings {
    /// Validates all fields.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_EXPIRY_THRESHOLD_DAYS).contains(&self.threshold_days) {
            return Err(EnsmError::InvalidSetting(format!(
                "threshold must be between 1 and {} days",
                MAX_EXPIRY_THRESHOLD_DAYS
            )));
        }

        if let Some(email) = &self.email {
            let valid = email
                .split_once('@')
                .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid || email.chars().any(char::is_whitespace) {
                return Err(EnsmError::InvalidSetting(format!(
                    "'{}' is not an email address",
                    email
                )));
            }
        }

        if let Some(phone) = &self.phone {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            let allowed = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
            if !allowed || digits < 7 {
                return Err(EnsmError::InvalidSetting(format!(
                    "'{}' is not a phone number",
                    phone
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case("test.eth")]
    #[test_case("sub.domain.eth")]
    #[test_case("valid-name.eth")]
    #[test_case("123.eth")]
    #[test_case("shop.xyz")]
    fn test_valid_ens_names(name: &str) {
        assert!(validate_ens_name(name).is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("invalid" ; "no dot")]
    #[test_case(".eth" ; "empty first label")]
    #[test_case("invalid..name.eth" ; "double dot")]
    #[test_case("invalid@name.eth" ; "bad character")]
    #[test_case("-invalid.eth" ; "leading hyphen")]
    #[test_case("invalid-.eth" ; "trailing hyphen")]
    #[test_case("in--valid.eth" ; "double hyphen")]
    #[test_case("Alice.eth" ; "uppercase")]
    #[test_case("alice.com" ; "unsupported tld")]
    fn test_invalid_ens_names(name: &str) {
        assert!(matches!(validate_ens_name(name), Err(EnsmError::InvalidName(_))));
    }

    #[test_case("" ; "empty")]
    #[test_case(" main" ; "leading space")]
    #[test_case("main\n" ; "trailing newline")]
    #[test_case("ma\u{7}in" ; "control character")]
    fn test_invalid_entry_names(name: &str) {
        assert!(validate_entry_name(name).is_err());
    }

    #[test]
    fn test_entry_name_length_limit() {
        assert!(validate_entry_name(&"a".repeat(64)).is_ok());
        assert!(validate_entry_name(&"a".repeat(65)).is_err());
        assert!(validate_entry_name("my main account").is_ok());
    }

    #[test]
    fn test_tracked_name_expiry() {
        let tracked = TrackedName::new("alice.eth", date(2026, 11, 10)).unwrap();
        let today = date(2026, 10, 18);

        assert_eq!(tracked.days_until_expiry(today), 23);
        assert!(tracked.is_expiring(today, 30));
        assert!(!tracked.is_expiring(today, 7));

        // Already expired names always count as expiring
        assert!(tracked.is_expiring(date(2027, 1, 1), 1));
    }

    #[test]
    fn test_notification_defaults() {
        let settings = NotificationSettings::default();
        assert_eq!(settings.threshold_days, 30);
        assert!(settings.validate().is_ok());

        let parsed: NotificationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_notification_validation() {
        let mut settings = NotificationSettings {
            email: Some("me@example.com".into()),
            phone: Some("+1 (555) 010-9999".into()),
            threshold_days: 14,
        };
        assert!(settings.validate().is_ok());

        settings.threshold_days = 0;
        assert!(settings.validate().is_err());
        settings.threshold_days = 366;
        assert!(settings.validate().is_err());
        settings.threshold_days = 30;

        settings.email = Some("not-an-email".into());
        assert!(settings.validate().is_err());
        settings.email = None;

        settings.phone = Some("12ab".into());
        assert!(settings.validate().is_err());
    }
}
