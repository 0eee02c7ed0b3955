use serde::{Deserialize, Serialize};

/// Counters pulled from a player's statistics and advancement documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Game ticks (20 per second).
    pub play_time: u64,
    pub deaths: u64,
    pub mob_kills: u64,
    /// Centimetres walked, sprinted, crouched and swum.
    pub distance_walked: u64,
    /// Centimetres flown or glided.
    pub distance_flown: u64,
    pub blocks_mined: u64,
    pub items_crafted: u64,
    pub damage_dealt: u64,
    /// Completed advancements, recipe unlocks excluded.
    pub advancements: u64,
}

/// One denormalized player, joined from every per-player source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub is_op: bool,
    pub is_allow_listed: bool,
    /// `YYYY-MM-DD HH:MM`, a raw prefix when unparseable, or empty.
    pub registered: String,
    pub last_seen: String,
    pub stats: PlayerStats,
    pub play_time_display: String,
    pub distance_walked_display: String,
    pub distance_flown_display: String,
}

/// Render game ticks as a compact duration (`45s`, `12m`, `3h 5m`, `2d 4h`).
pub fn format_ticks(ticks: u64) -> String {
    let seconds = ticks / 20;
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h {}m", hours, minutes % 60);
    }
    format!("{}d {}h", hours / 24, hours % 24)
}

/// Render centimetres as metres below one kilometre, else kilometres with one decimal.
pub fn format_distance(centimetres: u64) -> String {
    let metres = centimetres as f64 / 100.0;
    if metres < 1000.0 {
        format!("{:.0}m", metres)
    } else {
        format!("{:.1}km", metres / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ticks() {
        assert_eq!(format_ticks(0), "0s");
        assert_eq!(format_ticks(20 * 45), "45s");
        assert_eq!(format_ticks(20 * 60 * 12), "12m");
        assert_eq!(format_ticks(20 * 60 * (3 * 60 + 5)), "3h 5m");
        assert_eq!(format_ticks(20 * 60 * 60 * 52), "2d 4h");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(12_345), "123m");
        assert_eq!(format_distance(250_000), "2.5km");
    }
}
