use anyhow::anyhow;
use chrono::{NaiveDate, Utc};
use classflow_core::AppError;
use classflow_models::HolidayId;
use classflow_schedule::HolidayCalendar;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::holidays::model::{
    BulkCreateHolidaysDto, BulkCreateHolidaysResponse, CreateHolidayDto, Holiday,
    UpdateHolidayDto,
};

const DATE_CONSTRAINT: &str = "holidays_date_key";

fn duplicate_date(err: sqlx::Error, date: NaiveDate) -> AppError {
    AppError::from_unique_violation(
        err,
        DATE_CONSTRAINT,
        &format!("A holiday on {date} already exists"),
    )
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

pub struct HolidayService;

impl HolidayService {
    /// Every stored holiday date, for the schedule generator.
    pub async fn load_calendar<'e, E>(executor: E) -> Result<HolidayCalendar, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let dates = sqlx::query_scalar::<_, NaiveDate>("SELECT date FROM holidays")
            .fetch_all(executor)
            .await?;
        Ok(dates.into_iter().collect())
    }

    #[instrument(skip(db))]
    pub async fn list_holidays(db: &PgPool, year: Option<i32>) -> Result<Vec<Holiday>, AppError> {
        if let Some(year) = year {
            let (start, end) = year_bounds(year)
                .ok_or_else(|| AppError::bad_request(anyhow!("Invalid year: {year}")))?;
            return Self::holidays_in_range(db, start, end).await;
        }

        let holidays = sqlx::query_as::<_, Holiday>("SELECT * FROM holidays ORDER BY date")
            .fetch_all(db)
            .await?;
        Ok(holidays)
    }

    #[instrument(skip(db))]
    pub async fn upcoming_holidays(db: &PgPool, limit: i64) -> Result<Vec<Holiday>, AppError> {
        let today = Utc::now().date_naive();
        let holidays = sqlx::query_as::<_, Holiday>(
            "SELECT * FROM holidays WHERE date >= $1 ORDER BY date LIMIT $2",
        )
        .bind(today)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(holidays)
    }

    /// Holidays between `start` and `end`, both inclusive.
    #[instrument(skip(db))]
    pub async fn holidays_in_range(
        db: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Holiday>, AppError> {
        let holidays = sqlx::query_as::<_, Holiday>(
            "SELECT * FROM holidays WHERE date BETWEEN $1 AND $2 ORDER BY date",
        )
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(holidays)
    }

    #[instrument(skip(db))]
    pub async fn get_holiday(db: &PgPool, id: HolidayId) -> Result<Holiday, AppError> {
        sqlx::query_as::<_, Holiday>("SELECT * FROM holidays WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Holiday not found")))
    }

    #[instrument(skip(db))]
    pub async fn create_holiday(db: &PgPool, dto: CreateHolidayDto) -> Result<Holiday, AppError> {
        let holiday = sqlx::query_as::<_, Holiday>(
            r#"INSERT INTO holidays (date, name, description)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(dto.date)
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_date(e, dto.date))?;

        tracing::info!(date = %holiday.date, "Holiday created");
        Ok(holiday)
    }

    /// Inserts every holiday whose date is not taken yet. Existing dates and
    /// duplicates within the request are skipped.
    #[instrument(skip(db, dto), fields(count = dto.holidays.len()))]
    pub async fn bulk_create_holidays(
        db: &PgPool,
        dto: BulkCreateHolidaysDto,
    ) -> Result<BulkCreateHolidaysResponse, AppError> {
        let total = dto.holidays.len();

        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO holidays (date, name, description) ");
        qb.push_values(dto.holidays, |mut row, holiday| {
            row.push_bind(holiday.date)
                .push_bind(holiday.name.trim().to_string())
                .push_bind(holiday.description);
        });
        qb.push(" ON CONFLICT (date) DO NOTHING RETURNING id");

        let inserted = qb
            .build_query_scalar::<HolidayId>()
            .fetch_all(db)
            .await?;

        let created = inserted.len();
        Ok(BulkCreateHolidaysResponse {
            created,
            skipped: total - created,
            total,
        })
    }

    #[instrument(skip(db))]
    pub async fn update_holiday(
        db: &PgPool,
        id: HolidayId,
        dto: UpdateHolidayDto,
    ) -> Result<Holiday, AppError> {
        let existing = Self::get_holiday(db, id).await?;

        let date = dto.date.unwrap_or(existing.date);
        let name = dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);
        let description = dto.description.unwrap_or(existing.description);

        let holiday = sqlx::query_as::<_, Holiday>(
            r#"UPDATE holidays
               SET date = $1, name = $2, description = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING *"#,
        )
        .bind(date)
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_date(e, date))?;

        Ok(holiday)
    }

    #[instrument(skip(db))]
    pub async fn delete_holiday(db: &PgPool, id: HolidayId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Holiday not found")));
        }
        Ok(())
    }
}
