//! Class seeding, including each class's generated session schedule.

use chrono::{Days, Local, NaiveDate};
use classflow_models::{ClassId, ManagerId, TeacherId};
use classflow_schedule::ClassSchedule;
use fake::Fake;
use fake::faker::lorem::en::Word;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::ClassSeed;
use super::sessions::{load_holidays, replace_sessions};

const TIME_SLOTS: &[&str] = &["08:00-09:30", "10:00-11:30", "13:30-15:00", "15:30-17:00", "18:00-19:30"];
const COLORS: &[&str] = &["green", "blue", "orange", "purple", "red"];
const LEVELS: &[&str] = &["Starter", "Elementary", "Intermediate", "Advanced"];

/// Generates class records in parallel, spreading them over the given staff.
pub fn generate_classes(
    count: usize,
    today: NaiveDate,
    teachers: &[TeacherId],
    managers: &[ManagerId],
) -> Vec<ClassSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let topic: String = Word().fake();
            let back_days: u64 = (0..60).fake();

            ClassSeed {
                code: format!("C-{:04}", idx + 1),
                name: format!("{} {}", capitalize(&topic), LEVELS[idx % LEVELS.len()]),
                teacher_id: (!teachers.is_empty()).then(|| teachers[idx % teachers.len()]),
                manager_id: (!managers.is_empty()).then(|| managers[idx % managers.len()]),
                start_date: today.checked_sub_days(Days::new(back_days)).unwrap_or(today),
                week_day: (0..7).fake(),
                time_slot: TIME_SLOTS[idx % TIME_SLOTS.len()].to_string(),
                color: COLORS[idx % COLORS.len()].to_string(),
                total_sessions: (8..=20).fake(),
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inserts classes and their schedules. Holidays already in the database
/// cancel the sessions that fall on them.
pub async fn seed_classes(
    db: &PgPool,
    count: usize,
    teachers: &[TeacherId],
    managers: &[ManagerId],
) -> Result<Vec<ClassId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classes...", count);

    let classes = generate_classes(count, Local::now().date_naive(), teachers, managers);
    if classes.is_empty() {
        return Ok(Vec::new());
    }

    let holidays = load_holidays(db).await?;
    let schedules = classes
        .iter()
        .map(|class| {
            ClassSchedule::generate(class.start_date, class.week_day, class.total_sessions, &holidays)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut tx = db.begin().await?;

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO classes (code, name, teacher_id, manager_id, start_date, week_day, \
         time_slot, color, total_sessions) ",
    );
    qb.push_values(&classes, |mut row, class| {
        row.push_bind(&class.code)
            .push_bind(&class.name)
            .push_bind(class.teacher_id)
            .push_bind(class.manager_id)
            .push_bind(class.start_date)
            .push_bind(class.week_day)
            .push_bind(&class.time_slot)
            .push_bind(&class.color)
            .push_bind(class.total_sessions);
    });
    qb.push(" ON CONFLICT ON CONSTRAINT classes_code_key DO NOTHING RETURNING id, code");

    let inserted: Vec<(ClassId, String)> = qb.build_query_as().fetch_all(&mut *tx).await?;

    let mut session_count = 0;
    for (class_id, code) in &inserted {
        let Some(idx) = classes.iter().position(|c| &c.code == code) else {
            continue;
        };
        session_count += replace_sessions(&mut *tx, *class_id, schedules[idx].sessions()).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} classes with {} sessions in {:?}",
        inserted.len(),
        session_count,
        start_time.elapsed()
    );
    Ok(inserted.into_iter().map(|(id, _)| id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_classes_fit_schedule_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let teachers = vec![TeacherId::new(), TeacherId::new()];
        let classes = generate_classes(10, today, &teachers, &[]);

        assert_eq!(classes.len(), 10);
        for class in &classes {
            assert!((0..7).contains(&class.week_day));
            assert!((8..=20).contains(&class.total_sessions));
            assert!(class.start_date <= today);
            assert!(class.manager_id.is_none());
            assert!(class.teacher_id.is_some());
        }
        assert_eq!(classes[0].code, "C-0001");
        assert_eq!(classes[0].teacher_id, Some(teachers[0]));
        assert_eq!(classes[1].teacher_id, Some(teachers[1]));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("math"), "Math");
        assert_eq!(capitalize(""), "");
    }
}
