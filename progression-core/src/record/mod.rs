//! Player Record - the single aggregate of all game state
//!
//! The record is the whole persisted document: one instance per deployment,
//! loaded in full at the start of a request and written back in full at the
//! end. Field names on the wire are the ones the front end and existing data
//! files already use (`task`, `ts`, `last_login`), so the Rust names differ
//! in a few places.
//!
//! ## Shape
//!
//! ```text
//! PlayerRecord
//! ├── tasks[]              (index-addressed; deleting shifts indices)
//! ├── punishments[]        (pool drawn from on a lapse)
//! ├── ongoing_punishments  (FIFO of owed punishments)
//! ├── non_negotiables[]
//! ├── streak / best_streak / last_login
//! ├── shop { coins, items, catalog[], xp_boost_active, skip_tokens }
//! ├── stat_progress { stat -> { level, xp } }
//! ├── attributes { stat -> int }
//! ├── diary[]              (append-only)
//! ├── settings { key -> scalar }
//! └── stats { tasks_completed }
//! ```
//!
//! Unknown top-level keys are kept in `extra` so a newer front end can store
//! fields this build does not know about without losing them on save.
//!
//! Unsigned counters accept any JSON number and clamp it into range. Older
//! documents can carry a negative balance or streak, and one such value must
//! not make the whole record unreadable.

pub mod seed;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};

use crate::constants::{DEFAULT_TASK_COINS, DEFAULT_TASK_STAT, MIN_LEVEL};

pub use seed::seed_record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub name: Option<String>,
    pub tasks: Vec<Task>,
    pub punishments: Vec<String>,
    pub ongoing_punishments: VecDeque<OngoingPunishment>,
    pub non_negotiables: Vec<NonNegotiable>,
    #[serde(deserialize_with = "clamped_u32")]
    pub streak: u32,
    #[serde(deserialize_with = "clamped_u32")]
    pub best_streak: u32,
    /// Raw timestamp of the last check-in; only its date portion matters
    #[serde(rename = "last_login")]
    pub last_check_in: Option<String>,
    pub shop: Shop,
    pub stat_progress: BTreeMap<String, StatProgress>,
    pub attributes: BTreeMap<String, i64>,
    pub diary: Vec<DiaryEntry>,
    pub settings: Map<String, Value>,
    pub stats: Counters,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    /// Progress for a stat, or the level-1 starting point if it was never touched
    pub fn stat(&self, name: &str) -> StatProgress {
        self.stat_progress.get(name).copied().unwrap_or_default()
    }

    /// Keep the streak high-water mark in step with the current streak
    pub fn bump_best_streak(&mut self) {
        self.best_streak = self.best_streak.max(self.streak);
    }
}

/// A to-do with a coin and XP reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task")]
    pub description: String,
    /// Stored as the client sent it; parsed only when the shop needs it
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub created: NaiveDateTime,
    /// Signed: clients may store a penalty as a negative reward
    #[serde(default = "default_task_coins")]
    pub coins: i64,
    #[serde(default)]
    pub xp: i64,
    #[serde(default = "default_task_stat")]
    pub stat: String,
    #[serde(default)]
    pub failed: bool,
}

fn default_task_coins() -> i64 {
    DEFAULT_TASK_COINS
}

fn default_task_stat() -> String {
    DEFAULT_TASK_STAT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OngoingPunishment {
    pub text: String,
    #[serde(rename = "ts")]
    pub assigned: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonNegotiable {
    pub text: String,
    pub created: NaiveDateTime,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub text: String,
    pub ts: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shop {
    #[serde(deserialize_with = "clamped_u64")]
    pub coins: u64,
    /// Names of everything ever bought, without duplicates
    pub items: Vec<String>,
    pub catalog: Vec<ShopItem>,
    pub xp_boost_active: bool,
    #[serde(deserialize_with = "clamped_u32")]
    pub skip_tokens: u32,
}

impl Shop {
    pub fn item(&self, id: u32) -> Option<&ShopItem> {
        self.catalog.iter().find(|it| it.id == id)
    }

    pub fn owns(&self, name: &str) -> bool {
        self.items.iter().any(|n| n == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: u32,
    pub name: String,
    #[serde(deserialize_with = "clamped_u64")]
    pub price: u64,
    /// Effect tag; unknown tags are kept verbatim and do nothing
    pub effect: String,
    #[serde(default)]
    pub value: Option<i64>,
}

impl ShopItem {
    pub fn effect(&self) -> ShopEffect {
        ShopEffect::from_tag(&self.effect)
    }
}

/// What a purchase does beyond the debit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopEffect {
    SkipPunishment,
    CheatMeal,
    ExtraTime,
    XpBoost,
    Unknown,
}

impl ShopEffect {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "skip_punishment" => Self::SkipPunishment,
            "cheat_meal" => Self::CheatMeal,
            "extra_time" => Self::ExtraTime,
            "xp_boost" => Self::XpBoost,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkipPunishment => "skip_punishment",
            Self::CheatMeal => "cheat_meal",
            Self::ExtraTime => "extra_time",
            Self::XpBoost => "xp_boost",
            Self::Unknown => "unknown",
        }
    }
}

/// Level and in-level XP of one stat. `xp` stays in `[0, 100 * level)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatProgress {
    #[serde(deserialize_with = "clamped_level")]
    pub level: u32,
    pub xp: i64,
}

impl Default for StatProgress {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            xp: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    #[serde(deserialize_with = "clamped_u64")]
    pub tasks_completed: u64,
}

// ============================================================================
// Lenient number fields
// ============================================================================

/// Any JSON number, widened so every integer and saturated float fits
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i128, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(match Number::deserialize(deserializer)? {
        Number::Signed(v) => v as i128,
        Number::Unsigned(v) => v as i128,
        Number::Float(v) => v as i128,
    })
}

fn clamped_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    lenient_int(deserializer).map(|v| v.clamp(0, u64::MAX as i128) as u64)
}

fn clamped_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_int(deserializer).map(|v| v.clamp(0, u32::MAX as i128) as u32)
}

fn clamped_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_int(deserializer).map(|v| v.clamp(MIN_LEVEL as i128, u32::MAX as i128) as u32)
}
