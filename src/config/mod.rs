use crate::models::{KnowledgeOverrides, Settings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Prefix of the environment variables layered over `modlist.yaml`.
pub const ENV_PREFIX: &str = "MODLIST";

/// Configuration manager for the settings and knowledge files.
///
/// Manages two files in one data directory:
/// - Settings (`modlist.yaml`): instance paths, registry and generative services, logging
/// - Knowledge (`knowledge.yaml`): user additions to the built-in tables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    knowledge_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at `config_dir`, creating the directory if needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("modlist.yaml"),
            knowledge_path: config_dir.join("knowledge.yaml"),
            config_dir,
        })
    }

    /// Load settings: defaults, then `modlist.yaml` if present, then `MODLIST_*` variables
    /// (`__` between nested keys, e.g. `MODLIST_REGISTRY__ENABLED=false`), then the
    /// `OLLAMA_URL` / `OLLAMA_MODEL` variables.
    pub fn load_settings(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            tracing::warn!("Settings file not found at {}, using defaults", self.settings_path);
        }

        let defaults = Config::try_from(&Settings::default()).context("Failed to build default settings")?;
        let layered = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(self.settings_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("generative.base_url", std::env::var("OLLAMA_URL").ok())?
            .set_override_option("generative.model", std::env::var("OLLAMA_MODEL").ok())?
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?;

        let settings: Settings = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings (instance root {})", settings.instance_root);
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Load user knowledge additions, or none if the file doesn't exist.
    pub fn load_knowledge_overrides(&self) -> Result<KnowledgeOverrides> {
        if !self.knowledge_path.exists() {
            tracing::debug!("No knowledge file at {}, using built-in tables only", self.knowledge_path);
            return Ok(KnowledgeOverrides::default());
        }

        let file_contents = fs::read_to_string(&self.knowledge_path)
            .with_context(|| format!("Failed to read knowledge file: {}", self.knowledge_path))?;

        let overrides: KnowledgeOverrides = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse knowledge file: {}", self.knowledge_path))?;

        tracing::info!(
            "Loaded knowledge from {} ({} overrides, {} aliases, {} config owners, {} manual entries)",
            self.knowledge_path,
            overrides.filename_overrides.len(),
            overrides.registry_aliases.len(),
            overrides.config_owners.len(),
            overrides.manual_addons.len()
        );
        Ok(overrides)
    }

    pub fn save_knowledge_overrides(&self, overrides: &KnowledgeOverrides) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(overrides).context("Failed to serialize knowledge to YAML")?;

        fs::write(&self.knowledge_path, yaml_string)
            .with_context(|| format!("Failed to write knowledge file: {}", self.knowledge_path))?;

        tracing::info!("Saved knowledge to {}", self.knowledge_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    pub fn knowledge_path(&self) -> &Utf8Path {
        &self.knowledge_path
    }
}
