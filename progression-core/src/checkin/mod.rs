//! DailyCheckIn - streaks and lapse punishments
//!
//! The first contact of each calendar day rolls the streak forward. Missing
//! one or more whole days breaks the streak and draws a punishment from the
//! pool. Any further contact on the same day changes nothing, so the client
//! can ping as often as it likes.
//!
//! ```text
//!              first ping                 next day
//! NeverChecked ──────────▶ CheckedToday ◀─────────── Due
//!                              ▲  │ day passes         ▲
//!                              │  └────────────────────┘
//!                              │ ping (streak = 0, punishment)
//!                           Lapsed ◀── two or more days pass
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{format_timestamp, parse_date_prefix};
use crate::record::{OngoingPunishment, PlayerRecord};

/// Where the record stands relative to `today`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInState {
    /// No readable previous check-in
    NeverChecked,
    CheckedToday,
    /// Last check-in was yesterday
    Due,
    /// At least one whole day was skipped
    Lapsed { missed_days: i64 },
    /// Last check-in lies in the future
    ClockSkew,
}

pub fn check_in_state(record: &PlayerRecord, today: NaiveDate) -> CheckInState {
    let Some(last) = record.last_check_in.as_deref().and_then(parse_date_prefix) else {
        return CheckInState::NeverChecked;
    };
    match (today - last).num_days() {
        0 => CheckInState::CheckedToday,
        1 => CheckInState::Due,
        d if d > 1 => CheckInState::Lapsed { missed_days: d - 1 },
        _ => CheckInState::ClockSkew,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInOutcome {
    /// State found before this check-in was applied
    pub previous: CheckInState,
    pub streak: u32,
    pub triggered_punishment: Option<String>,
}

impl CheckInOutcome {
    /// True when the record was mutated and should be saved
    pub fn changed(&self) -> bool {
        !matches!(
            self.previous,
            CheckInState::CheckedToday | CheckInState::ClockSkew
        )
    }
}

/// Register contact at `now`. Idempotent for every `now` on the same date.
pub fn check_in<R: Rng + ?Sized>(
    record: &mut PlayerRecord,
    now: NaiveDateTime,
    rng: &mut R,
) -> CheckInOutcome {
    let previous = check_in_state(record, now.date());
    let mut triggered_punishment = None;

    match previous {
        CheckInState::CheckedToday | CheckInState::ClockSkew => {
            debug!(?previous, "Check-in is a no-op");
            return CheckInOutcome {
                previous,
                streak: record.streak,
                triggered_punishment,
            };
        }
        CheckInState::NeverChecked => {
            record.streak = 1;
        }
        CheckInState::Due => {
            record.streak = record.streak.saturating_add(1);
        }
        CheckInState::Lapsed { missed_days } => {
            record.streak = 0;
            if let Some(text) = record.punishments.choose(rng).cloned() {
                record.ongoing_punishments.push_back(OngoingPunishment {
                    text: text.clone(),
                    assigned: now,
                });
                triggered_punishment = Some(text);
            }
            info!(missed_days, punishment = ?triggered_punishment, "Streak lapsed");
        }
    }

    record.bump_best_streak();
    record.last_check_in = Some(format_timestamp(now));
    info!(streak = record.streak, best = record.best_streak, "Checked in");

    CheckInOutcome {
        previous,
        streak: record.streak,
        triggered_punishment,
    }
}
