//! Student seeding.

use classflow_models::{ClassId, StudentId};
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::StudentSeed;

const BATCH_SIZE: usize = 500;

/// Generates `per_class` students for every class. Codes are numbered
/// across all classes, e.g. `S-00013`.
pub fn generate_students(class_ids: &[ClassId], per_class: usize) -> Vec<StudentSeed> {
    (0..class_ids.len() * per_class)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let parent_first: String = FirstName().fake();
            let code = format!("S-{:05}", idx + 1);

            StudentSeed {
                email: format!(
                    "{}.{}+{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    code.to_lowercase()
                ),
                name: format!("{first_name} {last_name}"),
                parent_name: format!("{parent_first} {last_name}"),
                parent_phone: format!("555-{:04}", (0..10_000).fake::<u32>()),
                class_id: class_ids[idx / per_class],
                code,
            }
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    class_ids: &[ClassId],
    per_class: usize,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let students = generate_students(class_ids, per_class);
    println!("🎒 Seeding {} students...", students.len());

    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO students (code, name, email, parent_name, parent_phone, class_id) ",
        );
        qb.push_values(chunk, |mut row, student| {
            row.push_bind(&student.code)
                .push_bind(&student.name)
                .push_bind(&student.email)
                .push_bind(&student.parent_name)
                .push_bind(&student.parent_phone)
                .push_bind(student.class_id);
        });
        qb.push(" ON CONFLICT ON CONSTRAINT students_code_key DO NOTHING RETURNING id");

        ids.extend(qb.build_query_scalar::<StudentId>().fetch_all(&mut *tx).await?);
    }

    tx.commit().await?;
    println!("   ✓ Inserted {} students in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_are_spread_evenly() {
        let classes = vec![ClassId::new(), ClassId::new(), ClassId::new()];
        let students = generate_students(&classes, 4);

        assert_eq!(students.len(), 12);
        for class_id in &classes {
            assert_eq!(students.iter().filter(|s| &s.class_id == class_id).count(), 4);
        }
        assert_eq!(students[0].code, "S-00001");
        assert_eq!(students[11].code, "S-00012");
    }

    #[test]
    fn test_no_classes_no_students() {
        assert!(generate_students(&[], 10).is_empty());
    }
}
