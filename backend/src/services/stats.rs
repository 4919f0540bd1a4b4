//! Habit statistics engine
//!
//! Pure functions that derive streaks and completion metrics from a habit and
//! its entries. Nothing here touches the database or reads the clock: the
//! caller loads the entries and passes the reference `now` explicitly.
//!
//! Entries are bucketed by the UTC calendar date of `completed_at`. A date is
//! *met* when the summed `count` of its entries reaches the habit's
//! `target_count`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::entry::HabitEntry;
use crate::models::habit::{Habit, HabitFrequency};

const SECONDS_PER_DAY: i64 = 86_400;

/// Full statistics for one habit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStats {
    pub habit_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_completions: i64,
    /// Percentage of active days that were met (0-100, 2dp)
    pub completion_rate: f64,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub days_active: i64,
    pub average_value: Option<f64>,
    pub best_value: Option<f64>,
}

/// Summed entry counts per UTC calendar date, ascending.
pub fn daily_totals(entries: &[HabitEntry]) -> BTreeMap<NaiveDate, i64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.completed_at.date_naive()).or_insert(0) += i64::from(entry.count);
    }
    totals
}

/// Dates whose total reaches `target_count`, ascending.
pub fn met_dates(habit: &Habit, entries: &[HabitEntry]) -> Vec<NaiveDate> {
    let target = i64::from(habit.target_count);
    daily_totals(entries)
        .into_iter()
        .filter(|(_, total)| *total >= target)
        .map(|(date, _)| date)
        .collect()
}

/// Consecutive met days ending today.
///
/// Only daily habits have a bucketing rule for this walk; every other
/// frequency reports zero.
pub fn current_streak(habit: &Habit, entries: &[HabitEntry], now: DateTime<Utc>) -> i32 {
    if entries.is_empty() || habit.frequency != HabitFrequency::Daily {
        return 0;
    }

    let totals = daily_totals(entries);
    let target = i64::from(habit.target_count);
    let start = habit.start_date.date_naive();

    let mut streak = 0;
    let mut day = now.date_naive();
    while day >= start {
        let met = totals.get(&day).is_some_and(|total| *total >= target);
        if !met {
            break;
        }
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive met days anywhere in the history.
pub fn longest_streak(habit: &Habit, entries: &[HabitEntry]) -> i32 {
    let dates = met_dates(habit, entries);
    let Some(first) = dates.first() else {
        return 0;
    };

    let mut longest = 1;
    let mut run = 1;
    let mut prev = *first;
    for date in &dates[1..] {
        if *date == prev + Duration::days(1) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
        prev = *date;
    }
    longest
}

/// Whole days elapsed since `start_date`, counting the start day itself.
pub fn days_active(habit: &Habit, now: DateTime<Utc>) -> i64 {
    let elapsed = (now - habit.start_date).num_seconds();
    elapsed.div_euclid(SECONDS_PER_DAY) + 1
}

/// Share of active days that were met, as a percentage rounded to 2dp.
///
/// Only met dates between the start date and today count towards the rate.
pub fn completion_rate(habit: &Habit, entries: &[HabitEntry], now: DateTime<Utc>) -> f64 {
    let days = days_active(habit, now);
    if days <= 0 {
        return 0.0;
    }

    let start = habit.start_date.date_naive();
    let today = now.date_naive();
    let completed = met_dates(habit, entries)
        .into_iter()
        .filter(|date| *date >= start && *date <= today)
        .count();

    round2(completed as f64 / days as f64 * 100.0)
}

/// Total count logged today.
pub fn completed_today(entries: &[HabitEntry], now: DateTime<Utc>) -> i64 {
    let today = now.date_naive();
    entries
        .iter()
        .filter(|e| e.completed_at.date_naive() == today)
        .map(|e| i64::from(e.count))
        .sum()
}

pub fn is_completed_today(habit: &Habit, entries: &[HabitEntry], now: DateTime<Utc>) -> bool {
    completed_today(entries, now) >= i64::from(habit.target_count)
}

pub fn average_value(entries: &[HabitEntry]) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(|e| e.actual_value).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn best_value(entries: &[HabitEntry]) -> Option<f64> {
    entries
        .iter()
        .filter_map(|e| e.actual_value)
        .fold(None, |best, v| Some(best.map_or(v, |b: f64| b.max(v))))
}

pub fn last_completed_at(entries: &[HabitEntry]) -> Option<DateTime<Utc>> {
    entries.iter().map(|e| e.completed_at).max()
}

/// True when the entry reaches the habit's target value, or the habit has none.
pub fn meets_target(entry: &HabitEntry, habit: &Habit) -> bool {
    match (habit.target_value, entry.actual_value) {
        (None, _) => true,
        (Some(target), Some(actual)) => actual >= target,
        (Some(_), None) => false,
    }
}

/// Actual value as a percentage of the target value, rounded to 2dp.
///
/// A zero target is reported as exactly 100.
pub fn target_percentage(entry: &HabitEntry, habit: &Habit) -> Option<f64> {
    let actual = entry.actual_value?;
    let target = habit.target_value?;
    if target == 0.0 {
        return Some(100.0);
    }
    Some(round2(actual / target * 100.0))
}

pub fn compute(habit: &Habit, entries: &[HabitEntry], now: DateTime<Utc>) -> HabitStats {
    HabitStats {
        habit_id: habit.id,
        current_streak: current_streak(habit, entries, now),
        longest_streak: longest_streak(habit, entries),
        total_completions: entries.len() as i64,
        completion_rate: completion_rate(habit, entries, now),
        last_completed_at: last_completed_at(entries),
        days_active: days_active(habit, now),
        average_value: average_value(entries),
        best_value: best_value(entries),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
