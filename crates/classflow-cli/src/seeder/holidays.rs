//! Holiday seeding.

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::models::HolidaySeed;

const FIXED_HOLIDAYS: &[(u32, u32, &str)] = &[
    (1, 1, "New Year's Day"),
    (5, 1, "Labour Day"),
    (9, 2, "National Day"),
    (12, 24, "Christmas Eve"),
    (12, 25, "Christmas Day"),
    (12, 31, "New Year's Eve"),
];

pub fn fixed_holidays(year: i32) -> Vec<HolidaySeed> {
    FIXED_HOLIDAYS
        .iter()
        .filter_map(|&(month, day, name)| {
            NaiveDate::from_ymd_opt(year, month, day).map(|date| HolidaySeed {
                date,
                name: name.to_string(),
            })
        })
        .collect()
}

/// Inserts the fixed holidays of `year`; dates already present are kept.
pub async fn seed_holidays(db: &PgPool, year: i32) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📅 Seeding holidays for {}...", year);

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO holidays (date, name) ");
    qb.push_values(fixed_holidays(year), |mut row, holiday| {
        row.push_bind(holiday.date).push_bind(holiday.name);
    });
    qb.push(" ON CONFLICT ON CONSTRAINT holidays_date_key DO NOTHING");

    let inserted = qb.build().execute(db).await?.rows_affected();
    println!("   ✓ Inserted {} holidays in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}
