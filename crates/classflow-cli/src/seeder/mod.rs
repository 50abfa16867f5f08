//! Fake data for development databases.
//!
//! Records are generated in parallel with rayon and inserted with
//! multi-row `INSERT` statements. Codes are deterministic (`T-0001`,
//! `C-0001`, `S-00001`, ...) so re-running a seed skips what exists.

pub mod classes;
pub mod holidays;
pub mod models;
pub mod sessions;
pub mod staff;
pub mod students;

use chrono::{Datelike, Local};
use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

/// Seeds holidays, staff, classes with their sessions, and students.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Starting database seeding...\n");

    if config.holidays {
        let year = Local::now().year();
        holidays::seed_holidays(db, year).await?;
        holidays::seed_holidays(db, year + 1).await?;
    }

    let teachers = staff::seed_teachers(db, config.teachers).await?;
    let managers = staff::seed_managers(db, config.managers).await?;
    let classes = classes::seed_classes(db, config.classes, &teachers, &managers).await?;
    let students = students::seed_students(db, &classes, config.students_per_class).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Teachers: {}", teachers.len());
    println!("   Managers: {}", managers.len());
    println!("   Classes:  {}", classes.len());
    println!("   Students: {}", students.len());
    Ok(())
}

/// Removes all application data. Sessions, attendance, grades and comments
/// go with their classes.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧹 Clearing seeded data...");

    let mut tx = db.begin().await?;
    for table in ["students", "classes", "teachers", "managers", "holidays"] {
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        println!("   ✓ {table}: {deleted} deleted");
    }
    tx.commit().await?;

    println!("✅ Cleared all data");
    Ok(())
}
