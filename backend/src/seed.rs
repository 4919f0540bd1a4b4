use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::entry::CreateEntryRequest;
use crate::models::habit::{CreateHabitRequest, HabitFrequency};
use crate::services::{entries, habits};

struct SampleHabit {
    name: &'static str,
    category: &'static str,
    color: &'static str,
    unit: Option<&'static str>,
    frequency: HabitFrequency,
    target_value: Option<f64>,
    /// Days ago (0 = today) with a logged entry
    days: &'static [i64],
}

const SAMPLE_HABITS: [SampleHabit; 3] = [
    SampleHabit {
        name: "Exercise",
        category: "Health",
        color: "#ef4444",
        unit: Some("minutes"),
        frequency: HabitFrequency::Daily,
        target_value: Some(30.0),
        days: &[0, 1, 2, 3, 5, 6, 7, 9, 10, 13],
    },
    SampleHabit {
        name: "Meditate",
        category: "Mindfulness",
        color: "#8b5cf6",
        unit: Some("minutes"),
        frequency: HabitFrequency::Daily,
        target_value: Some(10.0),
        days: &[0, 2, 4, 6, 8, 11, 13],
    },
    SampleHabit {
        name: "Read",
        category: "Learning",
        color: "#3b82f6",
        unit: Some("pages"),
        frequency: HabitFrequency::Weekly,
        target_value: None,
        days: &[1, 3, 6, 8, 13],
    },
];

/// Seed three habits with two weeks of realistic, imperfect history.
pub async fn seed_sample_data(db: &SqlitePool, owner: Uuid, now: DateTime<Utc>) -> AppResult<()> {
    let start_date = now - Duration::days(13);

    for sample in &SAMPLE_HABITS {
        let habit = habits::create(
            db,
            owner,
            CreateHabitRequest {
                name: sample.name.into(),
                description: None,
                category: Some(sample.category.into()),
                unit: sample.unit.map(String::from),
                color: Some(sample.color.into()),
                frequency: Some(sample.frequency),
                target_count: Some(1),
                target_value: sample.target_value,
                start_date: Some(start_date),
                end_date: None,
                is_active: Some(true),
            },
            now,
        )
        .await?;

        for (i, days_ago) in sample.days.iter().enumerate() {
            // every third entry falls short of the target
            let actual_value = sample.target_value.map(|target| {
                if i % 3 == 0 {
                    target * 0.5
                } else {
                    target * 1.5
                }
            });
            entries::create(
                db,
                owner,
                CreateEntryRequest {
                    habit_id: habit.id,
                    completed_at: Some(now - Duration::days(*days_ago)),
                    count: Some(1),
                    actual_value,
                    note: None,
                    location: None,
                    weather: None,
                    rating: None,
                    duration_minutes: None,
                    is_manual_entry: Some(false),
                },
                now,
            )
            .await?;
        }
    }

    Ok(())
}
