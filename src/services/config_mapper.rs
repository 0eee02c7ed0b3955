use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::fs;

use crate::knowledge::KnowledgeBase;
use crate::models::ConfigEntry;

/// Files above this many characters are cut and marked.
pub const MAX_CONFIG_CHARS: usize = 15_000;
pub const TRUNCATION_MARKER: &str = "\n... (truncated, file too large)";

type OwnerRule = fn(&KnowledgeBase, &str) -> Option<String>;

/// Tried in order; the first rule that names an owner wins.
const OWNER_CHAIN: &[OwnerRule] = &[exact_owner, shared_directory_owner, owner_directory];

fn top_segment(relative_path: &str) -> &str {
    relative_path.split('/').next().unwrap_or(relative_path)
}

/// The curated map knows this exact path.
pub fn exact_owner(knowledge: &KnowledgeBase, relative_path: &str) -> Option<String> {
    knowledge.config_owners().get(relative_path).cloned()
}

/// Some curated path lives under the same top-level directory.
pub fn shared_directory_owner(knowledge: &KnowledgeBase, relative_path: &str) -> Option<String> {
    let prefix = format!("{}/", top_segment(relative_path));
    knowledge
        .config_owners()
        .iter()
        .find(|(path, _)| path.starts_with(&prefix))
        .map(|(_, owner)| owner.clone())
}

/// The top-level directory is one a single add-on is known to own.
pub fn owner_directory(knowledge: &KnowledgeBase, relative_path: &str) -> Option<String> {
    knowledge
        .owner_directories()
        .get(&top_segment(relative_path).to_lowercase())
        .cloned()
}

/// Name the add-on owning a config file. Never fails: unknown files get an owner naming
/// their own path so they still form a group.
pub fn owner_of(knowledge: &KnowledgeBase, relative_path: &str) -> String {
    OWNER_CHAIN
        .iter()
        .find_map(|rule| rule(knowledge, relative_path))
        .unwrap_or_else(|| format!("Unknown ({})", relative_path))
}

/// Read a config file as text, lossily, cut to [`MAX_CONFIG_CHARS`].
///
/// An unreadable file produces its error message as text rather than an error.
pub fn read_config_file(path: &Utf8Path) -> String {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return format!("Error reading file: {}", e),
    };
    let text = String::from_utf8_lossy(&bytes);

    match text.char_indices().nth(MAX_CONFIG_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.into_owned(),
    }
}

fn walk(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in dir.read_dir_utf8().with_context(|| format!("Failed to read config directory {}", dir))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping entry in {}: {}", dir, e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            if let Err(e) = walk(path, files) {
                tracing::warn!("Skipping config subdirectory {}: {:#}", path, e);
            }
        } else {
            files.push(path.to_path_buf());
        }
    }
    Ok(())
}

/// Every file below `config_dir`, sorted by relative path and attributed to its owner.
///
/// A missing directory yields no entries.
pub fn collect_configs(knowledge: &KnowledgeBase, config_dir: &Utf8Path) -> Result<Vec<ConfigEntry>> {
    if !config_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    walk(config_dir, &mut files)?;

    let mut entries: Vec<ConfigEntry> = files
        .iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(config_dir).ok()?;
            let relative_path = relative.components().map(|c| c.as_str()).collect::<Vec<_>>().join("/");
            Some(ConfigEntry {
                owner_name: owner_of(knowledge, &relative_path),
                raw_text: read_config_file(path),
                relative_path,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    tracing::info!("Collected {} config files from {}", entries.len(), config_dir);
    Ok(entries)
}

/// Group entries by owner, owners sorted case-insensitively, files keeping their order.
pub fn group_by_owner(entries: Vec<ConfigEntry>) -> IndexMap<String, Vec<ConfigEntry>> {
    let mut groups: IndexMap<String, Vec<ConfigEntry>> = IndexMap::new();
    for entry in entries {
        groups.entry(entry.owner_name.clone()).or_default().push(entry);
    }
    groups.sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn knowledge() -> KnowledgeBase {
        let mut kb = KnowledgeBase::empty();
        kb.insert_config_owner("lithium.properties", "Lithium");
        kb.insert_config_owner("polymer/common.json", "Polymer");
        kb.insert_config_owner("polymer/server.json", "Polymer");
        kb
    }

    #[test]
    fn test_exact_match_first() {
        assert_eq!(owner_of(&knowledge(), "lithium.properties"), "Lithium");
    }

    #[test]
    fn test_shared_top_directory() {
        assert_eq!(owner_of(&knowledge(), "polymer/new-file.json"), "Polymer");
    }

    #[test]
    fn test_owner_directory_case_insensitive() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(owner_of(&kb, "JEI/unlisted.ini"), "Just Enough Items (JEI)");
    }

    #[test]
    fn test_unknown_keeps_path() {
        assert_eq!(owner_of(&knowledge(), "mystery/thing.toml"), "Unknown (mystery/thing.toml)");
    }

    #[test]
    fn test_shared_directory_needs_whole_segment() {
        assert_eq!(owner_of(&knowledge(), "poly/common.json"), "Unknown (poly/common.json)");
    }

    #[test]
    fn test_read_truncates_large_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("big.txt")).unwrap();
        fs::write(&path, "x".repeat(MAX_CONFIG_CHARS + 10)).unwrap();

        let text = read_config_file(&path);
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert_eq!(text.len(), MAX_CONFIG_CHARS + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_read_missing_file_reports_error_text() {
        let text = read_config_file(Utf8Path::new("/definitely/not/here.json"));
        assert!(text.starts_with("Error reading file:"));
    }

    #[test]
    fn test_collect_walks_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("polymer")).unwrap();
        fs::write(root.join("polymer").join("common.json"), "{}").unwrap();
        fs::write(root.join("lithium.properties"), "a=b").unwrap();
        fs::write(root.join("stray.cfg"), "").unwrap();

        let entries = collect_configs(&knowledge(), &root).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.relative_path.as_str()).collect();
        assert_eq!(paths, ["lithium.properties", "polymer/common.json", "stray.cfg"]);

        let groups = group_by_owner(entries);
        let owners: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(owners, ["Lithium", "Polymer", "Unknown (stray.cfg)"]);
    }

    #[test]
    fn test_collect_missing_directory_is_empty() {
        let entries = collect_configs(&knowledge(), Utf8Path::new("/no/such/config")).unwrap();
        assert!(entries.is_empty());
    }
}
