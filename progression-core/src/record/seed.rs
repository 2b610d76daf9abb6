//! Seed document written the first time a store is opened and on reset.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::{Counters, NonNegotiable, PlayerRecord, Shop, ShopItem, StatProgress};
use crate::constants::DEFAULT_STATS;

const SEED_PUNISHMENTS: [&str; 3] = ["10m cold shower", "50 burpees", "No social media today"];

const SEED_RULES: [&str; 2] = ["No phone in bed", "No junk after 8pm"];

/// Fixed catalog: (id, name, price, effect, value)
const SEED_CATALOG: [(u32, &str, u64, &str, i64); 4] = [
    (1, "Skip Punishment", 50, "skip_punishment", 1),
    (2, "Cheat Meal", 20, "cheat_meal", 1),
    (3, "Extra Time", 30, "extra_time", 60),
    (4, "XP Boost", 40, "xp_boost", 1),
];

pub fn seed_catalog() -> Vec<ShopItem> {
    SEED_CATALOG
        .iter()
        .map(|&(id, name, price, effect, value)| ShopItem {
            id,
            name: name.to_string(),
            price,
            effect: effect.to_string(),
            value: Some(value),
        })
        .collect()
}

/// Build a fresh record. `now` stamps the seeded non-negotiables.
pub fn seed_record(now: NaiveDateTime) -> PlayerRecord {
    let mut settings = Map::new();
    settings.insert("sounds".into(), Value::Bool(true));
    settings.insert("mobile_fullscreen".into(), Value::Bool(true));

    PlayerRecord {
        name: None,
        tasks: Vec::new(),
        punishments: SEED_PUNISHMENTS.iter().map(|p| p.to_string()).collect(),
        ongoing_punishments: Default::default(),
        non_negotiables: SEED_RULES
            .iter()
            .map(|text| NonNegotiable {
                text: text.to_string(),
                created: now,
                modified: None,
            })
            .collect(),
        streak: 0,
        best_streak: 0,
        last_check_in: None,
        shop: Shop {
            coins: 0,
            items: Vec::new(),
            catalog: seed_catalog(),
            xp_boost_active: false,
            skip_tokens: 0,
        },
        stat_progress: DEFAULT_STATS
            .iter()
            .map(|s| (s.to_string(), StatProgress::default()))
            .collect(),
        attributes: DEFAULT_STATS.iter().map(|s| (s.to_string(), 0)).collect(),
        diary: Vec::new(),
        settings,
        stats: Counters::default(),
        extra: Map::new(),
    }
}
