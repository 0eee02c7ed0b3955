use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Requirement, Side};

/// Settings loaded from `modlist.yaml`, layered with `MODLIST_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Instance root holding `minecraft/` (client) and `server/`.
    pub instance_root: String,

    /// Where the report JSON is written.
    pub output_path: String,

    /// Where resolved identities are persisted between runs.
    pub cache_path: String,

    pub registry: RegistrySettings,
    pub generative: GenerativeSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instance_root: "..".to_string(),
            output_path: "mod_report.json".to_string(),
            cache_path: "mod_cache.json".to_string(),
            registry: RegistrySettings::default(),
            generative: GenerativeSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    pub fn layout(&self) -> InstanceLayout {
        InstanceLayout::from_root(&self.instance_root)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub enabled: bool,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Politeness floor between two registry calls.
    pub min_interval_ms: u64,
    pub batch_limit: usize,
    pub search_limit: usize,
    pub loader: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.modrinth.com/v2".to_string(),
            user_agent: format!("modlist/{} (modpack report generator)", env!("CARGO_PKG_VERSION")),
            timeout_secs: 15,
            min_interval_ms: 250,
            batch_limit: 100,
            search_limit: 5,
            loader: "fabric".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeSettings {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub temperature: f32,
    /// Ask for guide sections and guide text in addition to the basic fields.
    pub guide_prompts: bool,
}

impl Default for GenerativeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "qwen2.5:14b".to_string(),
            timeout_secs: 120,
            health_timeout_secs: 5,
            temperature: 0.3,
            guide_prompts: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: String,
    pub prefix: String,
    pub debug: bool,
    pub console: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            prefix: "modlist".to_string(),
            debug: false,
            console: true,
        }
    }
}

/// A curated add-on description, as stored in the knowledge tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(rename = "desc")]
    pub description: String,
    pub side: Side,
    #[serde(rename = "req")]
    pub requirement: Requirement,
}

/// A filename that bypasses the normalizer heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameOverride {
    pub name: String,
    pub version: String,
}

/// User additions to the built-in knowledge tables, from `knowledge.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeOverrides {
    /// Archive filename -> literal (name, version).
    pub filename_overrides: IndexMap<String, FilenameOverride>,

    /// Lowercase add-on name -> registry slug or project id.
    pub registry_aliases: IndexMap<String, String>,

    /// Relative config path -> owning add-on name.
    pub config_owners: IndexMap<String, String>,

    /// Lowercase add-on name -> hand-written entry (provenance `manual`).
    pub manual_addons: IndexMap<String, KnowledgeEntry>,
}

/// Every input location below an instance root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLayout {
    pub root: Utf8PathBuf,
    pub client_mods: Utf8PathBuf,
    pub client_index: Utf8PathBuf,
    pub client_config: Utf8PathBuf,
    pub server_dir: Utf8PathBuf,
    pub server_mods: Utf8PathBuf,
    pub server_config: Utf8PathBuf,
    pub server_properties: Utf8PathBuf,
    pub level_dat: Utf8PathBuf,
    pub datapacks: Utf8PathBuf,
    pub player_stats: Utf8PathBuf,
    pub player_advancements: Utf8PathBuf,
    pub auth_db: Utf8PathBuf,
    pub usercache: Utf8PathBuf,
    pub ops: Utf8PathBuf,
    pub whitelist: Utf8PathBuf,
}

impl InstanceLayout {
    pub fn from_root<P: AsRef<Utf8Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let client_mods = root.join("minecraft").join("mods");
        let server_dir = root.join("server");
        let world = server_dir.join("world");

        Self {
            client_index: client_mods.join(".index"),
            client_config: root.join("minecraft").join("config"),
            server_mods: server_dir.join("mods"),
            server_config: server_dir.join("config"),
            server_properties: server_dir.join("server.properties"),
            level_dat: world.join("level.dat"),
            datapacks: world.join("datapacks"),
            player_stats: world.join("stats"),
            player_advancements: world.join("advancements"),
            auth_db: server_dir.join("EasyAuth").join("easyauth.db"),
            usercache: server_dir.join("usercache.json"),
            ops: server_dir.join("ops.json"),
            whitelist: server_dir.join("whitelist.json"),
            client_mods,
            server_dir,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.registry.min_interval_ms, 250);
        assert_eq!(settings.registry.batch_limit, 100);
        assert_eq!(settings.generative.timeout_secs, 120);
        assert_eq!(settings.generative.model, "qwen2.5:14b");
        assert!(settings.generative.guide_prompts);
    }

    #[test]
    fn test_layout_paths() {
        let layout = InstanceLayout::from_root("/srv/pack");
        assert_eq!(layout.client_index, Utf8PathBuf::from("/srv/pack/minecraft/mods/.index"));
        assert_eq!(layout.level_dat, Utf8PathBuf::from("/srv/pack/server/world/level.dat"));
        assert_eq!(layout.auth_db, Utf8PathBuf::from("/srv/pack/server/EasyAuth/easyauth.db"));
    }

    #[test]
    fn test_knowledge_entry_yaml_field_names() {
        let yaml = "desc: Shortens join messages\nside: server\nreq: optional\n";
        let entry: KnowledgeEntry = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(entry.side, Side::Server);
        assert_eq!(entry.requirement, Requirement::Optional);
    }
}
