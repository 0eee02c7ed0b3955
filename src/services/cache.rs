use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::models::{AddonRecord, DatapackRecord, normalize_key};

/// On-disk shape of the resolution cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheDocument {
    pub mods: IndexMap<String, AddonRecord>,
    pub datapacks: IndexMap<String, DatapackRecord>,
}

/// Persistent store of resolved identities, keyed by lowercase-trimmed name.
///
/// Every accepted `put` is written straight back to disk so work already paid for survives
/// a later failure in the same run. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    path: Option<Utf8PathBuf>,
    document: CacheDocument,
}

impl ResolutionCache {
    /// A cache that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache at `path`.
    ///
    /// A missing file starts empty. So does an unreadable or malformed one, after a warning;
    /// the next save overwrites it.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let document = if !path.exists() {
            tracing::info!("No resolution cache at {}, starting empty", path);
            CacheDocument::default()
        } else {
            match Self::read_document(&path) {
                Ok(document) => {
                    tracing::info!(
                        "Loaded resolution cache from {} ({} add-ons, {} datapacks)",
                        path,
                        document.mods.len(),
                        document.datapacks.len()
                    );
                    document
                }
                Err(e) => {
                    tracing::warn!("Discarding unusable resolution cache {}: {:#}", path, e);
                    CacheDocument::default()
                }
            }
        };

        Self {
            path: Some(path),
            document,
        }
    }

    fn read_document(path: &Utf8Path) -> Result<CacheDocument> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read cache {}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse cache {}", path))
    }

    /// Write the whole cache back to its file. No-op for an in-memory cache.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.document).context("Failed to serialize resolution cache")?;
        fs::write(path, json).with_context(|| format!("Failed to write cache {}", path))?;
        tracing::debug!("Saved resolution cache to {}", path);
        Ok(())
    }

    fn write_through(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Write-through to resolution cache failed: {:#}", e);
        }
    }

    pub fn get(&self, name: &str) -> Option<&AddonRecord> {
        self.document.mods.get(&normalize_key(name))
    }

    /// Store a resolved record under its key and persist.
    ///
    /// Placeholders are never stored. An existing record survives when its tier ranks above
    /// the incoming one. Returns whether the record was stored.
    pub fn put(&mut self, record: AddonRecord) -> bool {
        if record.is_placeholder() {
            return false;
        }
        let key = record.key();
        if let Some(existing) = self.document.mods.get(&key)
            && !existing.is_placeholder()
            && existing.provenance.confidence() > record.provenance.confidence()
        {
            tracing::debug!(
                "Keeping cached {} record for {} over {}",
                existing.provenance.as_str(),
                key,
                record.provenance.as_str()
            );
            return false;
        }

        self.document.mods.insert(key, record);
        self.write_through();
        true
    }

    pub fn get_datapack(&self, folder: &str) -> Option<&DatapackRecord> {
        self.document.datapacks.get(&normalize_key(folder))
    }

    pub fn put_datapack(&mut self, record: DatapackRecord) {
        self.document.datapacks.insert(normalize_key(&record.folder), record);
        self.write_through();
    }

    pub fn len(&self) -> usize {
        self.document.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.mods.is_empty()
    }

    pub fn document(&self) -> &CacheDocument {
        &self.document
    }
}
