//! Reader for the launcher's per-add-on `.pw.toml` metadata files.
//!
//! Only the subset the index actually uses is understood: `key = value` lines with single-,
//! double- or un-quoted scalars, `#` comments, and `[section]` headers that prefix later keys
//! (`[update.modrinth]` + `mod-id` becomes `update.modrinth.mod-id`).

use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use std::fs;

const SIDECAR_SUFFIX: &str = ".pw.toml";

/// What the index knows about one installed archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEntry {
    pub name: String,
    pub filename: String,
    pub version: String,
    pub registry_id: Option<String>,
}

/// Parse sidecar text into flat, section-prefixed keys.
pub fn parse_sidecar(text: &str) -> IndexMap<String, String> {
    let mut values = IndexMap::new();
    let mut section = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = header.trim().to_string();
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let full_key = if section.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", section, key)
        };
        values.insert(full_key, unquote(value.trim()).to_string());
    }

    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

impl SidecarEntry {
    /// Build an entry from parsed sidecar values; `fallback_name` is used when `name` is absent.
    pub fn from_values(values: &IndexMap<String, String>, fallback_name: &str) -> Self {
        let get = |key: &str| values.get(key).cloned().unwrap_or_default();
        let name = values
            .get("name")
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback_name.to_string());

        Self {
            name,
            filename: get("filename"),
            version: get("x-prismlauncher-version-number"),
            registry_id: values.get("update.modrinth.mod-id").filter(|id| !id.is_empty()).cloned(),
        }
    }
}

/// Read every `.pw.toml` in `index_dir`, keyed by the archive filename each one describes.
///
/// A missing directory yields an empty index.
pub fn read_index(index_dir: &Utf8Path) -> Result<IndexMap<String, SidecarEntry>> {
    let mut index = IndexMap::new();
    if !index_dir.is_dir() {
        return Ok(index);
    }

    let mut files: Vec<_> = index_dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read sidecar index {}", index_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| path.as_str().ends_with(SIDECAR_SUFFIX))
        .collect();
    files.sort();

    for path in files {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping unreadable sidecar {}: {}", path, e);
                continue;
            }
        };
        let fallback = path
            .file_name()
            .map(|name| name.trim_end_matches(SIDECAR_SUFFIX).to_string())
            .unwrap_or_default();
        let entry = SidecarEntry::from_values(&parse_sidecar(&text), &fallback);
        if entry.filename.is_empty() {
            tracing::debug!("Sidecar {} names no archive, ignoring", path);
            continue;
        }
        index.insert(entry.filename.clone(), entry);
    }

    tracing::info!("Loaded {} sidecar entries from {}", index.len(), index_dir);
    Ok(index)
}
