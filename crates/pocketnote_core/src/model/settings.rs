//! Settings singleton record.
//!
//! One record per store. The string id stays `"settings"` unless an import
//! brings a different one; only the first settings record of an imported
//! document is ever considered.

use crate::model::{next_updated_at, now_ms};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const SETTINGS_ID: &str = "settings";

/// Visual mode applied by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Singleton-per-store preferences record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_settings_id")]
    pub id: String,
    #[serde(default)]
    pub theme: Theme,
    /// Stamped by every successful export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_export: Option<DateTime<Utc>>,
    /// Drives last-write-wins on import. Documents from older exporters
    /// that omit it merge as "older than anything stored".
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

fn default_settings_id() -> String {
    SETTINGS_ID.to_string()
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(0)
        .single()
        .unwrap_or_else(Utc::now)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: default_settings_id(),
            theme: Theme::System,
            last_export: None,
            updated_at: now_ms(),
        }
    }
}

impl Settings {
    /// Refreshes `updated_at`; strictly increases even on a stalled clock.
    pub fn touch(&mut self) {
        self.updated_at = next_updated_at(self.updated_at, now_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, Theme, SETTINGS_ID};

    #[test]
    fn default_settings_use_system_theme_and_stable_id() {
        let settings = Settings::default();
        assert_eq!(settings.id, SETTINGS_ID);
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.last_export.is_none());
    }

    #[test]
    fn theme_labels_round_trip() {
        for theme in [Theme::Light, Theme::Dark, Theme::System] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("midnight"), None);
    }

    #[test]
    fn missing_updated_at_deserializes_as_epoch() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.updated_at.timestamp_millis(), 0);
    }
}
