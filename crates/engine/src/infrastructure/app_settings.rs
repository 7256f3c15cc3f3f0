//! Runtime-tunable application settings.
//!
//! Settings are stored as one JSON document behind `SettingsRepo` and seeded
//! from the explicit defaults below at startup. Admin updates address fields
//! by their wire key; the enumerated `apply` table is the single place a key
//! is mapped to a field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    #[serde(rename = "NewsLink")]
    pub news_link: String,
    #[serde(rename = "DefaultServerAddress")]
    pub default_server_address: String,
    #[serde(rename = "TrialMode")]
    pub trial_mode: bool,
    #[serde(rename = "OnlineMode")]
    pub online_mode: bool,
    #[serde(rename = "AutomaticRealmsCreation")]
    pub automatic_realms_creation: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            news_link: String::new(),
            default_server_address: "localhost".to_string(),
            trial_mode: false,
            online_mode: false,
            automatic_realms_creation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsUpdateError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}

impl AppSettings {
    /// Update a single field addressed by its wire key.
    pub fn apply(
        &mut self,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), SettingsUpdateError> {
        match key {
            "NewsLink" => self.news_link = expect_string("NewsLink", value)?,
            "DefaultServerAddress" => {
                self.default_server_address = expect_string("DefaultServerAddress", value)?;
            }
            "TrialMode" => self.trial_mode = expect_bool("TrialMode", value)?,
            "OnlineMode" => self.online_mode = expect_bool("OnlineMode", value)?,
            "AutomaticRealmsCreation" => {
                self.automatic_realms_creation = expect_bool("AutomaticRealmsCreation", value)?;
            }
            other => return Err(SettingsUpdateError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn expect_string(key: &'static str, value: &serde_json::Value) -> Result<String, SettingsUpdateError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(SettingsUpdateError::InvalidValue {
            key,
            expected: "string",
        })
}

fn expect_bool(key: &'static str, value: &serde_json::Value) -> Result<bool, SettingsUpdateError> {
    value.as_bool().ok_or(SettingsUpdateError::InvalidValue {
        key,
        expected: "boolean",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_seed_table() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_server_address, "localhost");
        assert!(settings.automatic_realms_creation);
        assert!(!settings.trial_mode);
        assert!(!settings.online_mode);
        assert!(settings.news_link.is_empty());
    }

    #[test]
    fn apply_updates_known_keys() {
        let mut settings = AppSettings::default();
        settings
            .apply("NewsLink", &serde_json::json!("https://news.example"))
            .unwrap();
        settings
            .apply("AutomaticRealmsCreation", &serde_json::json!(false))
            .unwrap();
        assert_eq!(settings.news_link, "https://news.example");
        assert!(!settings.automatic_realms_creation);
    }

    #[test]
    fn apply_rejects_unknown_keys_and_wrong_types() {
        let mut settings = AppSettings::default();
        assert!(matches!(
            settings.apply("NoSuchKey", &serde_json::json!(true)),
            Err(SettingsUpdateError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.apply("TrialMode", &serde_json::json!("yes")),
            Err(SettingsUpdateError::InvalidValue { .. })
        ));
    }

    #[test]
    fn serializes_with_wire_keys() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert!(json.get("NewsLink").is_some());
        assert!(json.get("AutomaticRealmsCreation").is_some());
    }
}
