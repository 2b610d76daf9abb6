//! Property-based tests using proptest
//!
//! Tests invariants that must hold for ALL inputs:
//! - Leveling: xp always renormalized into [0, 100 * level), level >= 1
//! - Leveling: +n then -n returns to the start when no floor is hit
//! - Tasks: toggle twice restores coins, stat and counter
//! - Check-in: a second check-in on the same day changes nothing
//! - Check-in: best_streak >= streak across any sequence of days
//! - Shop: a failed purchase never mutates the record

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use solo_core::entries::{add_task, NewTask};
use solo_core::{apply_xp, buy_item, check_in, seed_record, toggle_task, PlayerRecord, StatProgress};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn valid_progress() -> impl Strategy<Value = StatProgress> {
    (1u32..30).prop_flat_map(|level| {
        (Just(level), 0i64..100 * level as i64).prop_map(|(level, xp)| StatProgress { level, xp })
    })
}

fn record_with(stat: StatProgress) -> PlayerRecord {
    let mut record = seed_record(start());
    record.stat_progress.insert("discipline".into(), stat);
    record
}

// ============================================================
// Leveling Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_xp_stays_normalized(stat in valid_progress(), amount in -20_000i64..20_000) {
        let mut record = record_with(stat);
        let change = apply_xp(&mut record, "discipline", amount);
        prop_assert!(change.after.level >= 1);
        prop_assert!(change.after.xp >= 0);
        prop_assert!(change.after.xp < 100 * change.after.level as i64,
            "xp {} out of range for level {}", change.after.xp, change.after.level);
    }

    #[test]
    fn prop_gain_then_loss_round_trips(stat in valid_progress(), amount in 0i64..20_000) {
        let mut record = record_with(stat);
        apply_xp(&mut record, "discipline", amount);
        apply_xp(&mut record, "discipline", -amount);
        prop_assert_eq!(record.stat("discipline"), stat);
    }

    #[test]
    fn prop_gain_is_monotonic(stat in valid_progress(), amount in 0i64..5_000) {
        let mut record = record_with(stat);
        let change = apply_xp(&mut record, "discipline", amount);
        prop_assert!((change.after.level, change.after.xp) >= (stat.level, stat.xp));
    }
}

// ============================================================
// Task Toggle Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_toggle_twice_restores(
        stat in valid_progress(),
        coins_before in 0u64..1_000,
        reward in 1i64..500,
        xp in 0i64..2_000,
    ) {
        let mut record = record_with(stat);
        record.shop.coins = coins_before;
        add_task(&mut record, NewTask {
            task: "Practice".into(),
            coins: Some(reward),
            xp: Some(xp),
            stat: Some("discipline".into()),
            ..Default::default()
        }, start()).unwrap();
        let before = record.clone();

        toggle_task(&mut record, 0).unwrap();
        prop_assert_eq!(record.shop.coins, coins_before + reward as u64);
        toggle_task(&mut record, 0).unwrap();

        prop_assert_eq!(record, before);
    }
}

// ============================================================
// Check-in Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_second_check_in_same_day_is_noop(
        days_since in proptest::option::of(0i64..15),
        streak in 0u32..50,
        later_minutes in 0i64..600,
        seed in any::<u64>(),
    ) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let today = start() + Duration::days(30);
        let mut record = seed_record(start());
        record.streak = streak;
        record.best_streak = streak;
        record.last_check_in = days_since
            .map(|d| (today - Duration::days(d)).format("%Y-%m-%dT%H:%M:%S").to_string());

        check_in(&mut record, today, &mut rng);
        let after_first = record.clone();
        let outcome = check_in(&mut record, today + Duration::minutes(later_minutes), &mut rng);

        prop_assert!(!outcome.changed());
        prop_assert!(outcome.triggered_punishment.is_none());
        prop_assert_eq!(record, after_first);
    }

    #[test]
    fn prop_best_streak_dominates(gaps in proptest::collection::vec(1i64..4, 1..40), seed in any::<u64>()) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut record = seed_record(start());
        let mut now = start();
        let mut lapses = 0usize;
        for gap in gaps {
            now += Duration::days(gap);
            let outcome = check_in(&mut record, now, &mut rng);
            if outcome.triggered_punishment.is_some() {
                lapses += 1;
            }
            prop_assert!(record.best_streak >= record.streak);
        }
        prop_assert_eq!(record.ongoing_punishments.len(), lapses);
    }
}

// ============================================================
// Shop Properties
// ============================================================

proptest! {
    #[test]
    fn prop_failed_purchase_leaves_record(coins in 0u64..20, item_id in 0u32..10) {
        // Cheapest seeded item costs 20, so every attempt fails
        let mut record = seed_record(start());
        record.shop.coins = coins;
        let before = record.clone();
        prop_assert!(buy_item(&mut record, item_id).is_err());
        prop_assert_eq!(record, before);
    }
}
