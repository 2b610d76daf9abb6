//! Centralized progression constants for the solo core.
//!
//! Eliminates magic numbers shared between the engine, the check-in logic,
//! the record edits and the seed document.

// =====================================================
// Leveling
// =====================================================

/// XP needed to leave a level is `XP_PER_LEVEL * level`
pub const XP_PER_LEVEL: i64 = 100;

/// Lowest level a stat can fall to
pub const MIN_LEVEL: u32 = 1;

/// Stats seeded into every fresh record
pub const DEFAULT_STATS: [&str; 4] = ["strength", "intelligence", "spirituality", "discipline"];

// =====================================================
// Tasks
// =====================================================

/// Coin reward of a task when the client does not name one
pub const DEFAULT_TASK_COINS: i64 = 5;

/// Stat a task feeds when the client does not name one
pub const DEFAULT_TASK_STAT: &str = "discipline";

// =====================================================
// Shop
// =====================================================

/// Minutes added by `extra_time` when the catalog item carries no value
pub const DEFAULT_EXTRA_TIME_MINUTES: i64 = 60;

/// Tokens granted by `skip_punishment` when nothing is owed and no value is set
pub const DEFAULT_SKIP_TOKENS: u32 = 1;
