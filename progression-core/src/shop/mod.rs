//! Shop economy - spending coins on catalog items
//!
//! A purchase always debits the price first, then applies the item's effect.
//! Effects never fail: an `extra_time` with nothing to extend, or an unknown
//! effect tag, still costs the coins.

use chrono::Duration;
use tracing::{debug, info};

use crate::clock::{format_timestamp, parse_timestamp};
use crate::constants::{DEFAULT_EXTRA_TIME_MINUTES, DEFAULT_SKIP_TOKENS};
use crate::error::{ProgressionError, ProgressionResult};
use crate::record::{OngoingPunishment, PlayerRecord, ShopEffect, ShopItem};

/// What the effect did to the record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedEffect {
    PunishmentSkipped(OngoingPunishment),
    SkipTokensGranted(u32),
    XpBoostActivated,
    DeadlineExtended { task_index: usize, deadline: String },
    NoEffect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub item: ShopItem,
    pub effect: AppliedEffect,
}

/// Buy catalog item `item_id`. On success `record.shop` holds the new balance,
/// owned items and flags.
pub fn buy_item(record: &mut PlayerRecord, item_id: u32) -> ProgressionResult<Purchase> {
    let item = record
        .shop
        .item(item_id)
        .cloned()
        .ok_or(ProgressionError::NotFound(item_id))?;

    if record.shop.coins < item.price {
        return Err(ProgressionError::InsufficientFunds {
            have: record.shop.coins,
            need: item.price,
        });
    }
    record.shop.coins -= item.price;

    let effect = match item.effect() {
        ShopEffect::SkipPunishment => skip_punishment(record, item.value),
        ShopEffect::XpBoost => {
            record.shop.xp_boost_active = true;
            AppliedEffect::XpBoostActivated
        }
        ShopEffect::ExtraTime => extend_earliest_deadline(record, item.value),
        ShopEffect::CheatMeal | ShopEffect::Unknown => AppliedEffect::NoEffect,
    };

    if !record.shop.owns(&item.name) {
        record.shop.items.push(item.name.clone());
    }

    info!(item = %item.name, price = item.price, coins = record.shop.coins, "Shop purchase");
    Ok(Purchase { item, effect })
}

fn skip_punishment(record: &mut PlayerRecord, value: Option<i64>) -> AppliedEffect {
    if let Some(skipped) = record.ongoing_punishments.pop_front() {
        return AppliedEffect::PunishmentSkipped(skipped);
    }
    let tokens = value
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_SKIP_TOKENS);
    record.shop.skip_tokens = record.shop.skip_tokens.saturating_add(tokens);
    AppliedEffect::SkipTokensGranted(tokens)
}

/// Push the earliest deadline back. Deadlines compare as stored strings,
/// which orders ISO timestamps chronologically; the first task wins a tie.
fn extend_earliest_deadline(record: &mut PlayerRecord, value: Option<i64>) -> AppliedEffect {
    let minutes = value.filter(|v| *v != 0).unwrap_or(DEFAULT_EXTRA_TIME_MINUTES);

    let earliest = record
        .tasks
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t.deadline.as_deref() {
            Some(d) if !d.trim().is_empty() => Some((i, d)),
            _ => None,
        })
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, d)| (i, d.to_string()));

    let Some((task_index, raw)) = earliest else {
        debug!("extra_time bought with no task deadline to extend");
        return AppliedEffect::NoEffect;
    };
    let Some(parsed) = parse_timestamp(&raw) else {
        debug!(task_index, deadline = %raw, "extra_time skipped unparseable deadline");
        return AppliedEffect::NoEffect;
    };

    let deadline = format_timestamp(parsed + Duration::minutes(minutes));
    record.tasks[task_index].deadline = Some(deadline.clone());
    AppliedEffect::DeadlineExtended {
        task_index,
        deadline,
    }
}
