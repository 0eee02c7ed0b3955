//! Report assembly.
//!
//! [`ReportBuilder`] walks one instance and produces the [`Report`] document consumed by the
//! renderer. Every section degrades to empty on failure; building a report never fails.

use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::{
    AddonRecord, ConfigEntry, DatapackRecord, InstallContext, InstanceLayout, PlayerRecord, SettingsDiff,
};
use crate::services::config_mapper::{collect_configs, group_by_owner};
use crate::services::diff::{DiffEngine, collect_gamerules, collect_server_properties};
use crate::services::generative::GenerativeApi;
use crate::services::players::collect_players;
use crate::services::registry::RegistryApi;
use crate::services::resolver::IdentityResolver;
use crate::services::scanner::AddonScanner;
use crate::services::sidecar::read_index;
use crate::services::{DatapackNamer, SidecarEntry};

/// Everything known about one instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub generator: String,
    pub client_addons: Vec<AddonRecord>,
    pub server_addons: Vec<AddonRecord>,
    pub datapacks: Vec<DatapackRecord>,
    /// Owner -> files, owners sorted case-insensitively.
    pub client_configs: IndexMap<String, Vec<ConfigEntry>>,
    pub server_configs: IndexMap<String, Vec<ConfigEntry>>,
    pub players: Vec<PlayerRecord>,
    pub server_properties: SettingsDiff,
    /// The properties file as written, secrets redacted.
    pub server_properties_raw: String,
    pub gamerules: SettingsDiff,
}

fn or_empty<T: Default>(result: Result<T>, section: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} section left empty: {:#}", section, e);
        T::default()
    })
}

fn timestamp_now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|e| {
        tracing::warn!("Failed to format report timestamp: {}", e);
        String::new()
    })
}

/// Collects every report section for one instance layout.
pub struct ReportBuilder<R, G> {
    layout: InstanceLayout,
    resolver: IdentityResolver<R, G>,
    scanner: AddonScanner,
    namer: DatapackNamer,
}

impl<R: RegistryApi, G: GenerativeApi> ReportBuilder<R, G> {
    pub fn new(layout: InstanceLayout, resolver: IdentityResolver<R, G>) -> Self {
        Self {
            layout,
            resolver,
            scanner: AddonScanner::new(),
            namer: DatapackNamer::new(),
        }
    }

    pub fn resolver(&self) -> &IdentityResolver<R, G> {
        &self.resolver
    }

    pub fn into_resolver(self) -> IdentityResolver<R, G> {
        self.resolver
    }

    async fn addons(
        &mut self,
        mods_dir: &Utf8Path,
        index: &IndexMap<String, SidecarEntry>,
        context: InstallContext,
    ) -> Vec<AddonRecord> {
        let scanned = self.scanner.scan(self.resolver.knowledge(), mods_dir, index, context);
        let candidates = or_empty(scanned, "Add-on");
        self.resolver.resolve_all(&candidates).await
    }

    async fn datapacks(&mut self) -> Vec<DatapackRecord> {
        let folders = or_empty(self.namer.scan(&self.layout.datapacks), "Datapack");
        let mut records = Vec::with_capacity(folders.len());
        for folder in folders {
            records.push(self.resolver.resolve_datapack(&folder.name, &folder.folder).await);
        }
        records
    }

    /// Build the whole report. Add-ons resolve client side first, then server side.
    pub async fn build(&mut self) -> Report {
        tracing::info!("Building report for {}", self.layout.root);

        let index = or_empty(read_index(&self.layout.client_index), "Sidecar index");
        let client_mods = self.layout.client_mods.clone();
        let server_mods = self.layout.server_mods.clone();
        let client_addons = self.addons(&client_mods, &index, InstallContext::Client).await;
        let server_addons = self.addons(&server_mods, &IndexMap::new(), InstallContext::Server).await;
        let datapacks = self.datapacks().await;

        let knowledge = self.resolver.knowledge();
        let client_configs = group_by_owner(or_empty(
            collect_configs(knowledge, &self.layout.client_config),
            "Client config",
        ));
        let server_configs = group_by_owner(or_empty(
            collect_configs(knowledge, &self.layout.server_config),
            "Server config",
        ));

        let (server_properties, server_properties_raw) = or_empty(
            collect_server_properties(
                &DiffEngine::for_server_properties(knowledge),
                &self.layout.server_properties,
            ),
            "Server properties",
        );
        let gamerules = collect_gamerules(&DiffEngine::for_gamerules(knowledge), &self.layout.level_dat);
        let players = collect_players(&self.layout);

        Report {
            generated_at: timestamp_now(),
            generator: format!("{} {}", crate::APP_NAME, crate::VERSION),
            client_addons,
            server_addons,
            datapacks,
            client_configs,
            server_configs,
            players,
            server_properties,
            server_properties_raw,
            gamerules,
        }
    }
}

/// Write the report as pretty JSON, replacing any previous file.
pub fn write_report(report: &Report, path: &Utf8Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create report directory: {}", parent))?;
    }

    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path))?;

    tracing::info!(
        "Wrote report to {} ({} client, {} server add-ons, {} players)",
        path,
        report.client_addons.len(),
        report.server_addons.len(),
        report.players.len()
    );
    Ok(())
}

pub fn read_report(path: &Utf8Path) -> Result<Report> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read report: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse report: {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("out").join("report.json")).unwrap();

        let report = Report {
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            server_properties_raw: "motd=hi".to_string(),
            ..Report::default()
        };
        write_report(&report, &path).unwrap();

        let loaded = read_report(&path).unwrap();
        assert_eq!(loaded.generated_at, "2026-01-01T00:00:00Z");
        assert_eq!(loaded.server_properties_raw, "motd=hi");
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let stamp = timestamp_now();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
    }
}
