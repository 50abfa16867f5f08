//! Teacher and manager seeding.

use classflow_models::{ManagerId, TeacherId};
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::StaffSeed;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Music",
];

/// Generates staff records in parallel. `prefix` becomes part of the code
/// and the email, e.g. `T` → `T-0003`.
pub fn generate_staff(count: usize, prefix: &str, with_subject: bool) -> Vec<StaffSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let code = format!("{prefix}-{:04}", idx + 1);

            StaffSeed {
                email: format!(
                    "{}.{}+{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    code.to_lowercase()
                ),
                name: format!("{first_name} {last_name}"),
                phone: format!("555-{:04}", (0..10_000).fake::<u32>()),
                subject: with_subject.then(|| SUBJECTS[idx % SUBJECTS.len()].to_string()),
                code,
            }
        })
        .collect()
}

/// Inserts teachers, skipping codes that already exist.
pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
) -> Result<Vec<TeacherId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", count);

    let teachers = generate_staff(count, "T", true);
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb =
        QueryBuilder::<Postgres>::new("INSERT INTO teachers (code, name, email, phone, subject) ");
    qb.push_values(teachers, |mut row, teacher| {
        row.push_bind(teacher.code)
            .push_bind(teacher.name)
            .push_bind(teacher.email)
            .push_bind(teacher.phone)
            .push_bind(teacher.subject);
    });
    qb.push(" ON CONFLICT ON CONSTRAINT teachers_code_key DO NOTHING RETURNING id");

    let ids = qb.build_query_scalar::<TeacherId>().fetch_all(db).await?;
    println!("   ✓ Inserted {} teachers in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

/// Inserts managers, skipping codes that already exist.
pub async fn seed_managers(
    db: &PgPool,
    count: usize,
) -> Result<Vec<ManagerId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧑‍💼 Seeding {} managers...", count);

    let managers = generate_staff(count, "M", false);
    if managers.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO managers (code, name, email, phone) ");
    qb.push_values(managers, |mut row, manager| {
        row.push_bind(manager.code)
            .push_bind(manager.name)
            .push_bind(manager.email)
            .push_bind(manager.phone);
    });
    qb.push(" ON CONFLICT ON CONSTRAINT managers_code_key DO NOTHING RETURNING id");

    let ids = qb.build_query_scalar::<ManagerId>().fetch_all(db).await?;
    println!("   ✓ Inserted {} managers in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}
