//! Player aggregation.
//!
//! Joins the identity cache, op list, allow list, auth database and per-player statistics and
//! advancement documents into one [`PlayerRecord`] per player. Each source is optional; a
//! missing or broken one only blanks the fields it would have filled.

use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexMap;
use indexmap::map::Entry;
use regex::Regex;
use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::sync::LazyLock;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::models::player::{format_distance, format_ticks};
use crate::models::{InstanceLayout, PlayerRecord, PlayerStats};

const RECIPE_NAMESPACE: &str = "minecraft:recipes/";
const RAW_TIMESTAMP_PREFIX: usize = 16;

static ZONE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*\]").expect("Invalid zone name regex"));
static LONG_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}:\d{2}:\d{2}\.\d{6})\d+").expect("Invalid fraction regex"));

#[derive(Debug, Deserialize)]
struct ListEntry {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    name: String,
}

/// Registration and last-login timestamps, raw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthDates {
    pub registered: String,
    pub last_seen: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthData {
    registration_date: String,
    last_authenticated_date: String,
}

/// Ids and lowercase names on the allow list.
#[derive(Debug, Default)]
pub struct AllowList {
    pub ids: HashSet<String>,
    pub names: HashSet<String>,
}

impl AllowList {
    pub fn contains(&self, id: &str, name: &str) -> bool {
        self.ids.contains(id) || self.names.contains(&name.to_lowercase())
    }
}

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let value = serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;
    Ok(Some(value))
}

fn read_list(path: &Utf8Path) -> Vec<ListEntry> {
    match read_json::<Vec<ListEntry>>(path) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Ignoring player list: {:#}", e);
            Vec::new()
        }
    }
}

/// Player id -> display name.
pub fn read_usercache(path: &Utf8Path) -> IndexMap<String, String> {
    read_list(path)
        .into_iter()
        .filter(|entry| !entry.uuid.is_empty())
        .map(|entry| (entry.uuid, entry.name))
        .collect()
}

pub fn read_ops(path: &Utf8Path) -> HashSet<String> {
    read_list(path).into_iter().map(|entry| entry.uuid).filter(|id| !id.is_empty()).collect()
}

pub fn read_allow_list(path: &Utf8Path) -> AllowList {
    let mut allow_list = AllowList::default();
    for entry in read_list(path) {
        if !entry.uuid.is_empty() {
            allow_list.ids.insert(entry.uuid);
        }
        if !entry.name.is_empty() {
            allow_list.names.insert(entry.name.to_lowercase());
        }
    }
    allow_list
}

fn query_auth_db(path: &Utf8Path) -> Result<HashMap<String, AuthDates>> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open auth database {}", path))?;
    let mut stmt = conn
        .prepare("SELECT uuid, data FROM easyauth")
        .context("Failed to query auth database")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

    let mut dates = HashMap::new();
    for row in rows {
        let (id, data) = row?;
        match serde_json::from_str::<AuthData>(&data) {
            Ok(data) => {
                dates.insert(
                    id,
                    AuthDates {
                        registered: data.registration_date,
                        last_seen: data.last_authenticated_date,
                    },
                );
            }
            Err(e) => tracing::debug!("Skipping auth row for {}: {}", id, e),
        }
    }
    Ok(dates)
}

/// Player id -> raw auth timestamps. Missing or unreadable databases give an empty map.
pub fn read_auth_db(path: &Utf8Path) -> HashMap<String, AuthDates> {
    if !path.is_file() {
        return HashMap::new();
    }
    query_auth_db(path).unwrap_or_else(|e| {
        tracing::warn!("Ignoring auth database: {:#}", e);
        HashMap::new()
    })
}

/// Format a loosely-structured timestamp as `YYYY-MM-DD HH:MM` in its own offset.
///
/// Accepts a trailing `[Zone/Name]` and any number of fraction digits. Anything unparseable
/// falls back to its first 16 characters; empty stays empty.
pub fn format_timestamp(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let clean = ZONE_NAME.replace(raw, "");
    let clean = LONG_FRACTION.replace(&clean, "$1");

    let parsed = OffsetDateTime::parse(&clean, &Rfc3339)
        .map(|dt| (dt.date(), dt.time()))
        .or_else(|_| PrimitiveDateTime::parse(&clean, &Iso8601::DEFAULT).map(|dt| (dt.date(), dt.time())));

    match parsed {
        Ok((date, time)) => format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
            time.hour(),
            time.minute()
        ),
        Err(_) => raw.chars().take(RAW_TIMESTAMP_PREFIX).collect(),
    }
}

fn counter(map: Option<&Value>, key: &str) -> u64 {
    map.and_then(|m| m.get(key)).and_then(Value::as_u64).unwrap_or(0)
}

fn category_total(map: Option<&Value>) -> u64 {
    map.and_then(Value::as_object)
        .map(|m| m.values().filter_map(Value::as_u64).sum())
        .unwrap_or(0)
}

/// Counters from one statistics document.
pub fn stats_from_document(document: &Value) -> PlayerStats {
    let stats = document.get("stats");
    let category = |name: &str| stats.and_then(|s| s.get(name));
    let custom = category("minecraft:custom");
    let sum = |keys: &[&str]| -> u64 { keys.iter().map(|key| counter(custom, key)).sum() };

    PlayerStats {
        play_time: counter(custom, "minecraft:play_time"),
        deaths: counter(custom, "minecraft:deaths"),
        mob_kills: counter(custom, "minecraft:mob_kills"),
        distance_walked: sum(&[
            "minecraft:walk_one_cm",
            "minecraft:sprint_one_cm",
            "minecraft:crouch_one_cm",
            "minecraft:walk_on_water_one_cm",
            "minecraft:walk_under_water_one_cm",
        ]),
        distance_flown: sum(&["minecraft:fly_one_cm", "minecraft:aviate_one_cm"]),
        blocks_mined: category_total(category("minecraft:mined")),
        items_crafted: category_total(category("minecraft:crafted")),
        damage_dealt: counter(custom, "minecraft:damage_dealt"),
        advancements: 0,
    }
}

/// Completed advancements in one document, recipe unlocks excluded.
pub fn count_advancements(document: &Value) -> u64 {
    document
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter(|(key, _)| !key.starts_with(RECIPE_NAMESPACE))
                .filter(|(_, value)| value.get("done").and_then(Value::as_bool).unwrap_or(false))
                .count() as u64
        })
        .unwrap_or(0)
}

fn read_document(path: &Utf8Path) -> Option<Value> {
    match read_json::<Value>(path) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring player document: {:#}", e);
            None
        }
    }
}

/// Ids with a statistics file in `stats_dir`.
fn stats_ids(stats_dir: &Utf8Path) -> Vec<String> {
    let Ok(entries) = stats_dir.read_dir_utf8() else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().strip_suffix(".json").map(str::to_string))
        .collect()
}

fn fallback_name(id: &str) -> String {
    format!("{}...", id.chars().take(8).collect::<String>())
}

/// Drop never-played records, collapse same-named ones to the longest-played, and sort by
/// play time descending.
pub fn dedupe_players(players: Vec<PlayerRecord>) -> Vec<PlayerRecord> {
    let mut by_name: IndexMap<String, PlayerRecord> = IndexMap::new();
    for player in players.into_iter().filter(|p| p.stats.play_time > 0) {
        match by_name.entry(player.name.to_lowercase()) {
            Entry::Occupied(mut slot) => {
                if player.stats.play_time > slot.get().stats.play_time {
                    slot.insert(player);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(player);
            }
        }
    }

    let mut players: Vec<PlayerRecord> = by_name.into_values().collect();
    players.sort_by(|a, b| b.stats.play_time.cmp(&a.stats.play_time));
    players
}

/// Build every player record for an instance.
pub fn collect_players(layout: &InstanceLayout) -> Vec<PlayerRecord> {
    let names = read_usercache(&layout.usercache);
    let ops = read_ops(&layout.ops);
    let allow_list = read_allow_list(&layout.whitelist);
    let auth = read_auth_db(&layout.auth_db);

    let ids: BTreeSet<String> = names.keys().cloned().chain(stats_ids(&layout.player_stats)).collect();

    let players: Vec<PlayerRecord> = ids
        .into_iter()
        .map(|id| {
            let name = names.get(&id).cloned().unwrap_or_else(|| fallback_name(&id));
            let dates = auth.get(&id).cloned().unwrap_or_default();

            let mut stats = read_document(&layout.player_stats.join(format!("{}.json", id)))
                .map(|doc| stats_from_document(&doc))
                .unwrap_or_default();
            stats.advancements = read_document(&layout.player_advancements.join(format!("{}.json", id)))
                .map(|doc| count_advancements(&doc))
                .unwrap_or(0);

            PlayerRecord {
                is_op: ops.contains(&id),
                is_allow_listed: allow_list.contains(&id, &name),
                registered: format_timestamp(&dates.registered),
                last_seen: format_timestamp(&dates.last_seen),
                play_time_display: format_ticks(stats.play_time),
                distance_walked_display: format_distance(stats.distance_walked),
                distance_flown_display: format_distance(stats.distance_flown),
                stats,
                name,
                id,
            }
        })
        .collect();

    let players = dedupe_players(players);
    tracing::info!("Collected {} players", players.len());
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player(name: &str, play_time: u64) -> PlayerRecord {
        PlayerRecord {
            id: format!("id-{}-{}", name, play_time),
            name: name.to_string(),
            is_op: false,
            is_allow_listed: false,
            registered: String::new(),
            last_seen: String::new(),
            stats: PlayerStats {
                play_time,
                ..PlayerStats::default()
            },
            play_time_display: format_ticks(play_time),
            distance_walked_display: String::new(),
            distance_flown_display: String::new(),
        }
    }

    #[test]
    fn test_dedupe_keeps_longest_played() {
        let players = dedupe_players(vec![player("Steve", 10), player("steve", 50)]);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].stats.play_time, 50);
        assert_eq!(players[0].name, "steve");
    }

    #[test]
    fn test_zero_play_time_dropped_and_sorted() {
        let players = dedupe_players(vec![player("Alex", 5), player("Ghost", 0), player("Steve", 90)]);
        let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Steve", "Alex"]);
    }

    #[test]
    fn test_timestamp_with_zone_and_nanoseconds() {
        assert_eq!(
            format_timestamp("2026-02-11T11:39:06.945289594+05:30[Asia/Kolkata]"),
            "2026-02-11 11:39"
        );
    }

    #[test]
    fn test_timestamp_without_offset() {
        assert_eq!(format_timestamp("2025-12-01T08:05:00"), "2025-12-01 08:05");
    }

    #[test]
    fn test_timestamp_fallback_prefix() {
        assert_eq!(format_timestamp("sometime last winter, roughly"), "sometime last wi");
        assert_eq!(format_timestamp(""), "");
    }

    #[test]
    fn test_stats_sum_sub_metrics() {
        let document = json!({
            "stats": {
                "minecraft:custom": {
                    "minecraft:play_time": 72000,
                    "minecraft:walk_one_cm": 100,
                    "minecraft:sprint_one_cm": 50,
                    "minecraft:fly_one_cm": 7,
                    "minecraft:aviate_one_cm": 3,
                    "minecraft:deaths": 2
                },
                "minecraft:mined": { "minecraft:stone": 40, "minecraft:dirt": 2 },
                "minecraft:crafted": { "minecraft:torch": 16 }
            }
        });

        let stats = stats_from_document(&document);
        assert_eq!(stats.play_time, 72000);
        assert_eq!(stats.distance_walked, 150);
        assert_eq!(stats.distance_flown, 10);
        assert_eq!(stats.blocks_mined, 42);
        assert_eq!(stats.items_crafted, 16);
        assert_eq!(stats.deaths, 2);
        assert_eq!(stats.mob_kills, 0);
    }

    #[test]
    fn test_advancements_exclude_recipes_and_incomplete() {
        let document = json!({
            "minecraft:story/mine_stone": { "done": true },
            "minecraft:story/smelt_iron": { "done": false },
            "minecraft:recipes/misc/torch": { "done": true },
            "DataVersion": 3955
        });
        assert_eq!(count_advancements(&document), 1);
    }

    #[test]
    fn test_allow_list_by_id_or_name() {
        let mut allow_list = AllowList::default();
        allow_list.ids.insert("abc".to_string());
        allow_list.names.insert("steve".to_string());

        assert!(allow_list.contains("abc", "Nobody"));
        assert!(allow_list.contains("other", "Steve"));
        assert!(!allow_list.contains("other", "Alex"));
    }
}
