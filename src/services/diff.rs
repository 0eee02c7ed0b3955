use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use std::fs;

use crate::knowledge::KnowledgeBase;
use crate::models::{REDACTED, SettingEntry, SettingsDiff, UNKNOWN_DEFAULT};
use crate::services::nbt::{self, Tag};

const NAMESPACE: &str = "minecraft:";

/// Compares a settings snapshot against known defaults.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    defaults: IndexMap<String, String>,
    explanations: IndexMap<String, String>,
    secret_keys: Vec<String>,
}

impl DiffEngine {
    pub fn new(defaults: IndexMap<String, String>, explanations: IndexMap<String, String>) -> Self {
        Self {
            defaults,
            explanations,
            secret_keys: Vec::new(),
        }
    }

    /// Keys whose non-empty values are replaced with [`REDACTED`] in every output.
    pub fn with_secrets<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secret_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn for_server_properties(knowledge: &KnowledgeBase) -> Self {
        Self::new(knowledge.property_defaults().clone(), knowledge.property_explanations().clone())
            .with_secrets(knowledge.secret_properties().iter().cloned())
    }

    pub fn for_gamerules(knowledge: &KnowledgeBase) -> Self {
        Self::new(knowledge.gamerule_defaults().clone(), knowledge.gamerule_explanations().clone())
    }

    fn is_secret(&self, key: &str) -> bool {
        self.secret_keys.iter().any(|k| k == key)
    }

    /// One entry per key of `current`, in iteration order, plus the changed subset.
    ///
    /// Classification compares the real text; secrets are masked afterwards so a secret is
    /// hidden whether or not it differs from its default.
    pub fn diff<I, K, V>(&self, current: I) -> SettingsDiff
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut result = SettingsDiff::default();

        for (key, value) in current {
            let key = key.into();
            let mut value = value.into();

            let default = self.defaults.get(&key);
            let is_changed = default.is_some_and(|d| *d != value);

            if self.is_secret(&key) && !value.is_empty() {
                value = REDACTED.to_string();
            }

            let entry = SettingEntry {
                display_key: display_key(&key),
                current_value: value,
                default_value: default.cloned().unwrap_or_else(|| UNKNOWN_DEFAULT.to_string()),
                is_changed,
                explanation: self.explanations.get(&key).cloned().unwrap_or_default(),
                key,
            };

            if entry.is_changed {
                result.changed.push(entry.clone());
            }
            result.entries.push(entry);
        }

        result
    }

    /// The raw properties text with every non-empty secret value masked.
    pub fn redact_raw(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for line in raw.split_inclusive('\n') {
            out.push_str(&self.redact_line(line));
        }
        out
    }

    fn redact_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            return line.to_string();
        }
        let Some((key, value)) = line.split_once('=') else {
            return line.to_string();
        };
        if !self.is_secret(key.trim()) || value.trim().is_empty() {
            return line.to_string();
        }
        let ending = if line.ends_with("\r\n") {
            "\r\n"
        } else if line.ends_with('\n') {
            "\n"
        } else {
            ""
        };
        format!("{}={}{}", key, REDACTED, ending)
    }
}

/// Key without the `minecraft:` namespace.
pub fn display_key(key: &str) -> String {
    key.strip_prefix(NAMESPACE).unwrap_or(key).to_string()
}

/// Parse `key=value` lines; blank lines, `#` comments and lines without `=` are skipped.
/// Splits on the first `=` and trims both sides.
pub fn parse_properties(text: &str) -> IndexMap<String, String> {
    let mut values = IndexMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    values
}

/// Server properties diffed against vanilla defaults, plus the redacted raw file text.
///
/// A missing file yields an empty diff and empty text.
pub fn collect_server_properties(engine: &DiffEngine, path: &Utf8Path) -> Result<(SettingsDiff, String)> {
    if !path.is_file() {
        tracing::debug!("No server properties at {}", path);
        return Ok((SettingsDiff::default(), String::new()));
    }

    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read server properties {}", path))?;
    let diff = engine.diff(parse_properties(&raw));
    tracing::info!(
        "Read {} server properties from {} ({} changed)",
        diff.entries.len(),
        path,
        diff.changed.len()
    );
    Ok((diff, engine.redact_raw(&raw)))
}

/// Gamerules from a decoded world-state tree, sorted by key.
///
/// Reads `Data.game_rules`, falling back to the older `Data.GameRules`.
pub fn gamerules_from_tree(root: &Tag) -> IndexMap<String, String> {
    let Some(data) = root.get("Data") else {
        return IndexMap::new();
    };
    let Some(rules) = data.get("game_rules").or_else(|| data.get("GameRules")).and_then(Tag::as_compound) else {
        return IndexMap::new();
    };

    let mut sorted: Vec<(String, String)> = rules
        .iter()
        .map(|(key, value)| (key.clone(), value.to_display_string()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted.into_iter().collect()
}

/// Gamerules read from `level.dat` and diffed against vanilla defaults.
///
/// A missing or undecodable file degrades to an empty diff.
pub fn collect_gamerules(engine: &DiffEngine, level_dat: &Utf8Path) -> SettingsDiff {
    if !level_dat.is_file() {
        tracing::debug!("No world-state file at {}", level_dat);
        return SettingsDiff::default();
    }

    match nbt::read_gzip_file(level_dat) {
        Ok((_, root)) => {
            let diff = engine.diff(gamerules_from_tree(&root));
            tracing::info!("Read {} gamerules ({} changed)", diff.entries.len(), diff.changed.len());
            diff
        }
        Err(e) => {
            tracing::warn!("Failed to decode {}: {}; gamerules omitted", level_dat, e);
            SettingsDiff::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DiffEngine {
        let mut defaults = IndexMap::new();
        defaults.insert("difficulty".to_string(), "easy".to_string());
        defaults.insert("rcon.password".to_string(), String::new());
        defaults.insert("white-list".to_string(), "false".to_string());
        DiffEngine::new(defaults, IndexMap::new()).with_secrets(["rcon.password"])
    }

    #[test]
    fn test_difficulty_hard_is_changed() {
        let diff = engine().diff(parse_properties("difficulty=hard\n"));

        assert_eq!(diff.changed.len(), 1);
        let entry = &diff.changed[0];
        assert_eq!(entry.current_value, "hard");
        assert_eq!(entry.default_value, "easy");
        assert!(entry.is_changed);
    }

    #[test]
    fn test_unknown_key_never_changed() {
        let diff = engine().diff([("custom-thing", "42")]);

        let entry = diff.get("custom-thing").unwrap();
        assert_eq!(entry.default_value, UNKNOWN_DEFAULT);
        assert!(!entry.is_changed);
        assert!(!entry.has_known_default());
        assert!(diff.changed.is_empty());
    }

    #[test]
    fn test_comparison_is_textual() {
        let diff = engine().diff([("white-list", "0")]);
        assert!(diff.get("white-list").unwrap().is_changed);
    }

    #[test]
    fn test_secret_redacted_after_classification() {
        let diff = engine().diff([("rcon.password", "hunter2")]);

        let entry = diff.get("rcon.password").unwrap();
        assert!(entry.is_changed);
        assert_eq!(entry.current_value, REDACTED);
        assert_eq!(diff.changed[0].current_value, REDACTED);
    }

    #[test]
    fn test_empty_secret_left_empty() {
        let diff = engine().diff([("rcon.password", "")]);
        let entry = diff.get("rcon.password").unwrap();
        assert_eq!(entry.current_value, "");
        assert!(!entry.is_changed);
    }

    #[test]
    fn test_parse_properties_skips_noise() {
        let parsed = parse_properties("#Minecraft server properties\n\nmotd=A=B\nbroken line\n level-seed = 123 \n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("motd").map(String::as_str), Some("A=B"));
        assert_eq!(parsed.get("level-seed").map(String::as_str), Some("123"));
    }

    #[test]
    fn test_redact_raw() {
        let raw = "#comment rcon.password=x\nrcon.password=hunter2\r\ndifficulty=hard\nrcon.password=\n";
        let redacted = engine().redact_raw(raw);
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("rcon.password=********\r\n"));
        assert!(redacted.contains("difficulty=hard\n"));
        assert!(redacted.ends_with("rcon.password=\n"));
    }

    #[test]
    fn test_display_key_strips_namespace() {
        assert_eq!(display_key("minecraft:keep_inventory"), "keep_inventory");
        assert_eq!(display_key("custommod:rule"), "custommod:rule");
    }

    #[test]
    fn test_gamerules_sorted_with_legacy_fallback() {
        let mut rules = IndexMap::new();
        rules.insert("minecraft:pvp".to_string(), Tag::Byte(0));
        rules.insert("minecraft:keep_inventory".to_string(), Tag::Byte(1));
        let mut data = IndexMap::new();
        data.insert("GameRules".to_string(), Tag::Compound(rules));
        let mut root = IndexMap::new();
        root.insert("Data".to_string(), Tag::Compound(data));

        let rules = gamerules_from_tree(&Tag::Compound(root));
        let keys: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["minecraft:keep_inventory", "minecraft:pvp"]);
        assert_eq!(rules.get("minecraft:pvp").map(String::as_str), Some("0"));
    }
}
