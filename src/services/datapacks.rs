use anyhow::{Context, Result};
use camino::Utf8Path;
use regex::Regex;

/// A datapack directory and its cleaned display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatapackFolder {
    pub name: String,
    pub folder: String,
}

/// Strips release tags off datapack folder names.
pub struct DatapackNamer {
    versioned_mc_suffix: Regex,
    version_suffix: Regex,
}

impl DatapackNamer {
    pub fn new() -> Self {
        Self {
            // "Terralith v2.5.4 (MC 1.21)"
            versioned_mc_suffix: Regex::new(r"\s*v\d+[\d.]*\s*\(MC[^)]*\)$").expect("Invalid MC suffix regex"),
            version_suffix: Regex::new(r"\s*v\d+[\d.]*$").expect("Invalid version suffix regex"),
        }
    }

    pub fn clean(&self, folder: &str) -> String {
        let name = self.versioned_mc_suffix.replace(folder, "");
        let name = self.version_suffix.replace(name.trim(), "");
        name.trim().to_string()
    }

    /// Every directory directly under `dir`, sorted by folder name.
    ///
    /// Loose files (zipped packs) are skipped, as is a missing directory.
    pub fn scan(&self, dir: &Utf8Path) -> Result<Vec<DatapackFolder>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut folders: Vec<String> = dir
            .read_dir_utf8()
            .with_context(|| format!("Failed to read datapack directory {}", dir))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string())
            .collect();
        folders.sort();

        tracing::info!("Found {} datapacks in {}", folders.len(), dir);
        Ok(folders
            .into_iter()
            .map(|folder| DatapackFolder {
                name: self.clean(&folder),
                folder,
            })
            .collect())
    }
}

impl Default for DatapackNamer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_strips_mc_suffix() {
        let namer = DatapackNamer::new();
        assert_eq!(namer.clean("Terralith v2.5.4 (MC 1.21)"), "Terralith");
        assert_eq!(namer.clean("Incendium v5.4"), "Incendium");
        assert_eq!(namer.clean("Plain Pack"), "Plain Pack");
    }

    #[test]
    fn test_scan_lists_directories_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::create_dir(root.join("Nullscape v1.2")).unwrap();
        fs::create_dir(root.join("Afk Display")).unwrap();
        fs::write(root.join("zipped.zip"), b"PK").unwrap();

        let packs = DatapackNamer::new().scan(&root).unwrap();
        let names: Vec<_> = packs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Afk Display", "Nullscape"]);
        assert_eq!(packs[1].folder, "Nullscape v1.2");
    }

    #[test]
    fn test_scan_missing_directory() {
        let packs = DatapackNamer::new().scan(Utf8Path::new("/no/datapacks/here")).unwrap();
        assert!(packs.is_empty());
    }
}
