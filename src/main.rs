//! modlist - report data for a modded Minecraft instance.
//!
//! # Execution Flow
//!
//! 1. Load settings from `modlist-data/modlist.yaml` (or the directory given as the first
//!    argument), layered with `MODLIST_*` environment variables
//! 2. Initialize logging (daily rotating file, optional console)
//! 3. Build the knowledge base: built-in tables plus `knowledge.yaml`
//! 4. Load the resolution cache and connect the registry and generative clients
//! 5. Build the report on a current-thread tokio runtime, one request at a time
//! 6. Write the report and the cache, log the resolution summary

use anyhow::{Context, Result};
use camino::Utf8Path;
use modlist::services::{GenerativeClient, RegistryClient, ResolutionCache};
use modlist::services::resolver::IdentityResolver;
use modlist::{APP_NAME, ConfigManager, KnowledgeBase, ReportBuilder, ResolutionMetrics, VERSION, write_report};
use std::sync::Arc;

const DEFAULT_DATA_DIR: &str = "modlist-data";

fn main() -> Result<()> {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let config_manager = ConfigManager::new(&data_dir)?;
    let settings = config_manager.load_settings()?;

    let _guard = modlist::logging::setup_from_settings(&settings.logging)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let knowledge = KnowledgeBase::builtin().with_overrides(config_manager.load_knowledge_overrides()?);
    tracing::info!("Knowledge base ready with {} add-ons", knowledge.addon_count());

    let cache = ResolutionCache::load(&settings.cache_path);
    let metrics = Arc::new(ResolutionMetrics::new());

    let mut resolver = IdentityResolver::new(knowledge, cache).with_metrics(Arc::clone(&metrics));
    if settings.registry.enabled {
        resolver = resolver.with_registry(
            RegistryClient::new(&settings.registry).context("Failed to build registry client")?,
            settings.registry.batch_limit,
        );
    } else {
        tracing::info!("Registry lookups disabled");
    }
    if settings.generative.enabled {
        resolver = resolver.with_generative(
            GenerativeClient::new(&settings.generative).context("Failed to build generative client")?,
            settings.generative.guide_prompts,
        );
    } else {
        tracing::info!("Generative fallback disabled");
    }

    // One task, one request in flight at a time.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let mut builder = ReportBuilder::new(settings.layout(), resolver);
    let report = runtime.block_on(builder.build());

    write_report(&report, Utf8Path::new(&settings.output_path))?;
    builder.resolver().cache().save()?;

    metrics.log_summary();
    tracing::info!("Done");
    Ok(())
}
