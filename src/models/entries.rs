use serde::{Deserialize, Serialize};

/// Placeholder default for keys the defaults table doesn't know.
pub const UNKNOWN_DEFAULT: &str = "?";

/// Placeholder written in place of secret values.
pub const REDACTED: &str = "********";

/// One server property or gamerule compared against its vanilla default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    /// Key without the `minecraft:` namespace, for display.
    pub display_key: String,
    pub current_value: String,
    /// The known default, or [`UNKNOWN_DEFAULT`].
    pub default_value: String,
    pub is_changed: bool,
    #[serde(default)]
    pub explanation: String,
}

impl SettingEntry {
    pub fn has_known_default(&self) -> bool {
        self.default_value != UNKNOWN_DEFAULT
    }
}

/// Every entry of a settings snapshot, plus the changed subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsDiff {
    pub entries: Vec<SettingEntry>,
    pub changed: Vec<SettingEntry>,
}

impl SettingsDiff {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SettingEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// A configuration file attributed to the add-on that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub owner_name: String,
    /// Path relative to the config directory, always `/`-separated.
    pub relative_path: String,
    pub raw_text: String,
}
