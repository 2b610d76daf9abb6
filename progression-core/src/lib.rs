//! Solo System - Progression Core Library
//!
//! Pure state transitions over the single player record:
//! - Record model and seed document
//! - ProgressionEngine: task completion, stat leveling, shop economy
//! - DailyCheckIn: streaks and lapse punishments
//! - Record edits: tasks, punishment pool, non-negotiables, diary, settings
//! - Injectable clock and structured logging
//!
//! Nothing here performs I/O. Callers load the record, hand it to these
//! functions by `&mut`, and persist it afterwards.

pub mod checkin;
pub mod clock;
pub mod constants;
pub mod entries;
pub mod error;
pub mod logging;
pub mod progression;
pub mod record;
pub mod shop;

pub use checkin::{check_in, check_in_state, CheckInOutcome, CheckInState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ProgressionError, ProgressionResult};
pub use progression::{apply_xp, toggle_task, ToggleOutcome, XpChange};
pub use record::{seed_record, PlayerRecord, ShopEffect, StatProgress};
pub use shop::{buy_item, AppliedEffect, Purchase};
