//! ProgressionEngine - task completion and stat leveling
//!
//! Each stat levels independently. Leaving level `L` upward costs `100 * L`
//! XP; falling out of level `L` downward refunds `100 * (L - 1)`, the
//! threshold of the level being re-entered. Untoggling a task therefore lands
//! exactly where toggling it started, unless a floor (coins at 0, stat at
//! level 1 / xp 0) absorbed part of the reversal.

use tracing::{debug, info};

use crate::constants::{MIN_LEVEL, XP_PER_LEVEL};
use crate::error::{ProgressionError, ProgressionResult};
use crate::record::{PlayerRecord, StatProgress};

/// Before/after view of a single `apply_xp` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpChange {
    pub stat: String,
    pub before: StatProgress,
    pub after: StatProgress,
}

impl XpChange {
    /// Positive on level-up, negative on level-down
    pub fn levels_gained(&self) -> i64 {
        self.after.level as i64 - self.before.level as i64
    }
}

/// Add `amount` (signed) XP to `stat`, renormalizing into `[0, 100 * level)`.
pub fn apply_xp(record: &mut PlayerRecord, stat: &str, amount: i64) -> XpChange {
    let progress = record.stat_progress.entry(stat.to_string()).or_default();
    let before = *progress;

    progress.xp = progress.xp.saturating_add(amount);

    while progress.xp >= XP_PER_LEVEL * progress.level as i64 {
        progress.xp -= XP_PER_LEVEL * progress.level as i64;
        progress.level += 1;
    }
    while progress.xp < 0 && progress.level > MIN_LEVEL {
        progress.level -= 1;
        progress.xp += XP_PER_LEVEL * progress.level as i64;
    }
    if progress.xp < 0 {
        progress.xp = 0;
    }

    let change = XpChange {
        stat: stat.to_string(),
        before,
        after: *progress,
    };
    match change.levels_gained() {
        0 => debug!(stat, amount, xp = change.after.xp, "XP applied"),
        n if n > 0 => info!(stat, level = change.after.level, "Stat leveled up"),
        _ => info!(stat, level = change.after.level, "Stat leveled down"),
    }
    change
}

/// Result of flipping a task's done flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub done: bool,
    /// Coins actually moved (credit positive, debit negative, after flooring)
    pub coins_delta: i64,
    pub xp: XpChange,
}

/// Flip `tasks[index].done`, paying out on completion and clawing back on undo.
pub fn toggle_task(record: &mut PlayerRecord, index: usize) -> ProgressionResult<ToggleOutcome> {
    ProgressionError::check_index("task", index, record.tasks.len())?;

    let task = &mut record.tasks[index];
    task.done = !task.done;
    let done = task.done;
    let coins = task.coins;
    let xp = task.xp;
    let stat = task.stat.clone();

    // a negative reward is a penalty; the balance never drops below zero
    let coins_before = record.shop.coins;
    let xp_change = if done {
        record.shop.coins = record.shop.coins.saturating_add_signed(coins);
        let change = apply_xp(record, &stat, xp);
        record.stats.tasks_completed += 1;
        change
    } else {
        record.shop.coins = record.shop.coins.saturating_add_signed(coins.saturating_neg());
        let change = apply_xp(record, &stat, -xp);
        record.stats.tasks_completed = record.stats.tasks_completed.saturating_sub(1);
        change
    };

    let coins_delta = record.shop.coins as i64 - coins_before as i64;
    debug!(index, done, coins_delta, "Task toggled");

    Ok(ToggleOutcome {
        done,
        coins_delta,
        xp: xp_change,
    })
}
