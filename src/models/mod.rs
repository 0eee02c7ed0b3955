//! Data models for modlist.
//!
//! - [`AddonRecord`]: one resolved add-on with its [`Provenance`] tier
//! - [`AddonCandidate`]: an add-on found on disk, before resolution
//! - [`SettingEntry`] / [`SettingsDiff`]: server properties and gamerules against defaults
//! - [`ConfigEntry`]: a config file attributed to its owning add-on
//! - [`PlayerRecord`]: one player joined from every per-player source
//! - [`Settings`]: run settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod addon;
pub mod config;
pub mod entries;
pub mod player;

pub use addon::{
    AddonCandidate, AddonRecord, DatapackRecord, InstallContext, Provenance, RegistryMeta,
    Requirement, Side, normalize_key,
};
pub use config::{
    FilenameOverride, GenerativeSettings, InstanceLayout, KnowledgeEntry, KnowledgeOverrides,
    LoggingSettings, RegistrySettings, Settings,
};
pub use entries::{ConfigEntry, REDACTED, SettingEntry, SettingsDiff, UNKNOWN_DEFAULT};
pub use player::{PlayerRecord, PlayerStats};
