//! Curated knowledge tables and the lookup strategies that read them.
//!
//! Every table is kept in insertion order so "first match wins" lookups are deterministic.

mod addons;
mod config_owners;
mod settings;

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{FilenameOverride, KnowledgeEntry, KnowledgeOverrides, Requirement, Side, normalize_key};

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9 ]").expect("Invalid punctuation regex"));

/// Which fuzzy strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyStrategy {
    /// Candidate name and table key contain one another.
    Substring,
    /// Same, after stripping punctuation from both sides.
    Punctuation,
    /// The table key, squashed, occurs in the squashed archive filename.
    Artifact,
}

/// A fuzzy hit against the static table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub key: &'a str,
    pub entry: &'a KnowledgeEntry,
    pub strategy: FuzzyStrategy,
}

type Strategy = fn(name_key: &str, artifact: &str, table_key: &str) -> bool;

/// Strategies in evaluation order; the first one that matches any table key wins.
const FUZZY_CHAIN: &[(FuzzyStrategy, Strategy)] = &[
    (FuzzyStrategy::Substring, substring_match),
    (FuzzyStrategy::Punctuation, punctuation_match),
    (FuzzyStrategy::Artifact, artifact_match),
];

/// Case-insensitive containment in either direction. Empty strings never match.
pub fn substring_match(name_key: &str, _artifact: &str, table_key: &str) -> bool {
    contains_either_way(name_key, table_key)
}

/// Containment after dropping everything but `[a-z0-9 ]`.
pub fn punctuation_match(name_key: &str, _artifact: &str, table_key: &str) -> bool {
    let name = NON_ALNUM.replace_all(name_key, "");
    let key = NON_ALNUM.replace_all(table_key, "");
    contains_either_way(name.trim(), key.trim())
}

/// The table key with spaces and apostrophes removed, found inside the archive filename
/// with `-` and `_` removed.
pub fn artifact_match(_name_key: &str, artifact: &str, table_key: &str) -> bool {
    let squashed_key: String = table_key.chars().filter(|c| *c != ' ' && *c != '\'').collect();
    if squashed_key.is_empty() || artifact.is_empty() {
        return false;
    }
    let squashed_artifact: String = artifact.to_lowercase().chars().filter(|c| *c != '-' && *c != '_').collect();
    squashed_artifact.contains(&squashed_key)
}

fn contains_either_way(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Built-in knowledge, optionally extended by the user's `knowledge.yaml`.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    addons: IndexMap<String, KnowledgeEntry>,
    manual: IndexMap<String, KnowledgeEntry>,
    aliases: IndexMap<String, String>,
    filename_overrides: IndexMap<String, FilenameOverride>,
    config_owners: IndexMap<String, String>,
    owner_directories: IndexMap<String, String>,
    property_defaults: IndexMap<String, String>,
    property_explanations: IndexMap<String, String>,
    secret_properties: Vec<String>,
    gamerule_defaults: IndexMap<String, String>,
    gamerule_explanations: IndexMap<String, String>,
}

impl KnowledgeBase {
    /// An empty knowledge base; tests fill in only what they need.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut kb = Self::empty();

        for (name, description, side, requirement) in addons::BUILTIN_ADDONS {
            kb.insert_addon(name, description, *side, *requirement);
        }
        for (name, slug) in addons::BUILTIN_REGISTRY_ALIASES {
            kb.aliases.insert(name.to_string(), slug.to_string());
        }
        for (filename, name, version) in addons::BUILTIN_FILENAME_OVERRIDES {
            kb.insert_filename_override(filename, name, version);
        }
        for (path, owner) in config_owners::BUILTIN_CONFIG_OWNERS {
            kb.config_owners.insert(path.to_string(), owner.to_string());
        }
        for (dir, owner) in config_owners::BUILTIN_OWNER_DIRECTORIES {
            kb.owner_directories.insert(dir.to_string(), owner.to_string());
        }
        for (key, default, explanation) in settings::SERVER_PROPERTIES {
            kb.property_defaults.insert(key.to_string(), default.to_string());
            kb.property_explanations.insert(key.to_string(), explanation.to_string());
        }
        kb.secret_properties = settings::SECRET_PROPERTIES.iter().map(|s| s.to_string()).collect();
        for (key, default, explanation) in settings::GAMERULES {
            kb.gamerule_defaults.insert(key.to_string(), default.to_string());
            kb.gamerule_explanations.insert(key.to_string(), explanation.to_string());
        }

        kb
    }

    /// Layer user additions on top. User entries win over built-in ones with the same key.
    pub fn with_overrides(mut self, overrides: KnowledgeOverrides) -> Self {
        self.filename_overrides.extend(overrides.filename_overrides);
        self.aliases
            .extend(overrides.registry_aliases.into_iter().map(|(k, v)| (normalize_key(&k), v)));
        self.config_owners.extend(overrides.config_owners);
        self.manual
            .extend(overrides.manual_addons.into_iter().map(|(k, v)| (normalize_key(&k), v)));
        self
    }

    pub fn insert_addon(&mut self, name: &str, description: &str, side: Side, requirement: Requirement) {
        self.addons.insert(
            normalize_key(name),
            KnowledgeEntry {
                description: description.to_string(),
                side,
                requirement,
            },
        );
    }

    pub fn insert_filename_override(&mut self, filename: &str, name: &str, version: &str) {
        self.filename_overrides.insert(
            filename.to_string(),
            FilenameOverride {
                name: name.to_string(),
                version: version.to_string(),
            },
        );
    }

    pub fn insert_alias(&mut self, name: &str, registry_id: &str) {
        self.aliases.insert(normalize_key(name), registry_id.to_string());
    }

    pub fn insert_config_owner(&mut self, relative_path: &str, owner: &str) {
        self.config_owners.insert(relative_path.to_string(), owner.to_string());
    }

    /// Exact, case-insensitive match against the static table.
    pub fn lookup_static(&self, name: &str) -> Option<&KnowledgeEntry> {
        self.addons.get(&normalize_key(name))
    }

    pub fn lookup_manual(&self, name: &str) -> Option<&KnowledgeEntry> {
        self.manual.get(&normalize_key(name))
    }

    pub fn alias_for(&self, name: &str) -> Option<&str> {
        self.aliases.get(&normalize_key(name)).map(String::as_str)
    }

    /// Walk the fuzzy strategies in order, each over the static table in insertion order.
    pub fn fuzzy_match(&self, name: &str, artifact: &str) -> Option<FuzzyMatch<'_>> {
        let name_key = normalize_key(name);
        for (strategy, matches) in FUZZY_CHAIN {
            let hit = self.addons.iter().find(|(key, _)| matches(&name_key, artifact, key));
            if let Some((key, entry)) = hit {
                return Some(FuzzyMatch {
                    key,
                    entry,
                    strategy: *strategy,
                });
            }
        }
        None
    }

    pub fn filename_override(&self, filename: &str) -> Option<&FilenameOverride> {
        self.filename_overrides.get(filename)
    }

    pub fn config_owners(&self) -> &IndexMap<String, String> {
        &self.config_owners
    }

    pub fn owner_directories(&self) -> &IndexMap<String, String> {
        &self.owner_directories
    }

    pub fn property_defaults(&self) -> &IndexMap<String, String> {
        &self.property_defaults
    }

    pub fn property_explanations(&self) -> &IndexMap<String, String> {
        &self.property_explanations
    }

    pub fn secret_properties(&self) -> &[String] {
        &self.secret_properties
    }

    pub fn gamerule_defaults(&self) -> &IndexMap<String, String> {
        &self.gamerule_defaults
    }

    pub fn gamerule_explanations(&self) -> &IndexMap<String, String> {
        &self.gamerule_explanations
    }

    pub fn addon_count(&self) -> usize {
        self.addons.len()
    }
}
