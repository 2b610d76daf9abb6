//! Record edits - validated CRUD on the list-shaped parts of the record
//!
//! Text input is trimmed before use. Empty text and out-of-range indices are
//! rejected before anything is touched.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::clock::format_timestamp;
use crate::constants::{DEFAULT_TASK_COINS, DEFAULT_TASK_STAT};
use crate::error::{ProgressionError, ProgressionResult};
use crate::record::{DiaryEntry, NonNegotiable, PlayerRecord, Task};

/// Client-supplied fields of a new task; everything but the text is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub task: String,
    pub deadline: Option<String>,
    pub coins: Option<i64>,
    pub xp: Option<i64>,
    pub stat: Option<String>,
}

fn required_text(raw: &str, what: &str) -> ProgressionResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ProgressionError::Validation(format!("{} must not be empty", what)));
    }
    Ok(text.to_string())
}

// ============================================================================
// Tasks
// ============================================================================

pub fn add_task(record: &mut PlayerRecord, new: NewTask, now: NaiveDateTime) -> ProgressionResult<usize> {
    let description = required_text(&new.task, "task")?;
    let deadline = new
        .deadline
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    // zero is treated like "not given", matching how the form submits blanks
    let coins = new.coins.filter(|c| *c != 0).unwrap_or(DEFAULT_TASK_COINS);
    let stat = new
        .stat
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TASK_STAT.to_string());

    record.tasks.push(Task {
        description,
        deadline,
        done: false,
        created: now,
        coins,
        xp: new.xp.unwrap_or(0),
        stat,
        failed: false,
    });
    debug!(index = record.tasks.len() - 1, "Task added");
    Ok(record.tasks.len() - 1)
}

/// Replace a task's editable fields. `done` and `created` are kept, and no
/// rewards are re-settled for a task that is already done.
pub fn edit_task(record: &mut PlayerRecord, index: usize, edit: NewTask) -> ProgressionResult<()> {
    ProgressionError::check_index("task", index, record.tasks.len())?;
    let description = required_text(&edit.task, "task")?;

    let task = &mut record.tasks[index];
    task.description = description;
    task.deadline = edit
        .deadline
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    if let Some(coins) = edit.coins {
        task.coins = coins;
    }
    if let Some(xp) = edit.xp {
        task.xp = xp;
    }
    if let Some(stat) = edit.stat.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
        task.stat = stat;
    }
    Ok(())
}

/// Flag a task whose deadline passed. Returns false if it was already flagged.
pub fn mark_task_failed(record: &mut PlayerRecord, index: usize) -> ProgressionResult<bool> {
    ProgressionError::check_index("task", index, record.tasks.len())?;
    let task = &mut record.tasks[index];
    let newly = !task.failed;
    task.failed = true;
    Ok(newly)
}

/// Remove a task. Every later task's index shifts down by one.
pub fn delete_task(record: &mut PlayerRecord, index: usize) -> ProgressionResult<Task> {
    ProgressionError::check_index("task", index, record.tasks.len())?;
    Ok(record.tasks.remove(index))
}

// ============================================================================
// Punishment pool
// ============================================================================

pub fn add_punishment(record: &mut PlayerRecord, text: &str) -> ProgressionResult<()> {
    let text = required_text(text, "punishment")?;
    record.punishments.push(text);
    Ok(())
}

pub fn delete_punishment(record: &mut PlayerRecord, index: usize) -> ProgressionResult<String> {
    ProgressionError::check_index("punishment", index, record.punishments.len())?;
    Ok(record.punishments.remove(index))
}

// ============================================================================
// Non-negotiables
// ============================================================================

pub fn add_rule(record: &mut PlayerRecord, text: &str, now: NaiveDateTime) -> ProgressionResult<()> {
    let text = required_text(text, "rule")?;
    record.non_negotiables.push(NonNegotiable {
        text,
        created: now,
        modified: None,
    });
    Ok(())
}

pub fn edit_rule(
    record: &mut PlayerRecord,
    index: usize,
    text: &str,
    now: NaiveDateTime,
) -> ProgressionResult<()> {
    ProgressionError::check_index("rule", index, record.non_negotiables.len())?;
    let text = required_text(text, "rule")?;
    let rule = &mut record.non_negotiables[index];
    rule.text = text;
    rule.modified = Some(now);
    debug!(index, at = %format_timestamp(now), "Rule edited");
    Ok(())
}

pub fn delete_rule(record: &mut PlayerRecord, index: usize) -> ProgressionResult<NonNegotiable> {
    ProgressionError::check_index("rule", index, record.non_negotiables.len())?;
    Ok(record.non_negotiables.remove(index))
}

// ============================================================================
// Diary, name & settings
// ============================================================================

pub fn set_name(record: &mut PlayerRecord, name: &str) -> ProgressionResult<()> {
    record.name = Some(required_text(name, "name")?);
    Ok(())
}

pub fn add_diary_entry(record: &mut PlayerRecord, text: &str, now: NaiveDateTime) -> ProgressionResult<()> {
    let text = required_text(text, "diary entry")?;
    record.diary.push(DiaryEntry { text, ts: now });
    Ok(())
}

/// Shallow-merge a settings patch. A body of the form `{"settings": {...}}`
/// merges the inner object; any other object is merged as-is.
pub fn update_settings(record: &mut PlayerRecord, body: Value) -> ProgressionResult<()> {
    let Value::Object(mut patch) = body else {
        return Err(ProgressionError::Validation("settings must be an object".into()));
    };
    let patch: Map<String, Value> = match patch.remove("settings") {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            patch.insert("settings".into(), other);
            patch
        }
        None => patch,
    };
    for (key, value) in patch {
        record.settings.insert(key, value);
    }
    Ok(())
}
