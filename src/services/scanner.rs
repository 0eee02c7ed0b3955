use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;

use crate::knowledge::KnowledgeBase;
use crate::models::{AddonCandidate, InstallContext};
use crate::services::normalizer::FilenameNormalizer;
use crate::services::sidecar::SidecarEntry;

const ARCHIVE_EXTENSION: &str = ".jar";

/// Archive filenames directly under `dir`, sorted. A missing directory lists nothing.
pub fn list_archives(dir: &Utf8Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        tracing::debug!("No add-on directory at {}", dir);
        return Ok(Vec::new());
    }

    let mut archives: Vec<String> = dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read add-on directory {}", dir))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string())
        .filter(|name| name.ends_with(ARCHIVE_EXTENSION))
        .collect();
    archives.sort();
    Ok(archives)
}

/// Turns directory listings into resolution candidates.
pub struct AddonScanner {
    normalizer: FilenameNormalizer,
}

impl AddonScanner {
    pub fn new() -> Self {
        Self {
            normalizer: FilenameNormalizer::new(),
        }
    }

    /// One candidate per archive. Archives the sidecar index describes take its name, version
    /// and registry id; the rest are normalized from their filename.
    pub fn candidates(
        &self,
        knowledge: &KnowledgeBase,
        archives: &[String],
        index: &IndexMap<String, SidecarEntry>,
        context: InstallContext,
    ) -> Vec<AddonCandidate> {
        archives
            .iter()
            .map(|archive| match index.get(archive) {
                Some(entry) => {
                    let candidate = AddonCandidate::new(&entry.name, archive, &entry.version, context);
                    match &entry.registry_id {
                        Some(id) => candidate.with_registry_id(id),
                        None => candidate,
                    }
                }
                None => {
                    let (name, version) = self.normalizer.normalize(knowledge, archive);
                    AddonCandidate::new(name, archive, version, context)
                }
            })
            .collect()
    }

    /// List and convert the archives of one installation.
    pub fn scan(
        &self,
        knowledge: &KnowledgeBase,
        mods_dir: &Utf8Path,
        index: &IndexMap<String, SidecarEntry>,
        context: InstallContext,
    ) -> Result<Vec<AddonCandidate>> {
        let archives = list_archives(mods_dir)?;
        let candidates = self.candidates(knowledge, &archives, index, context);
        tracing::info!(
            "Found {} {} add-ons in {} ({} indexed)",
            candidates.len(),
            context.as_str(),
            mods_dir,
            candidates.iter().filter(|c| index.contains_key(&c.artifact)).count()
        );
        Ok(candidates)
    }
}

impl Default for AddonScanner {
    fn default() -> Self {
        Self::new()
    }
}
