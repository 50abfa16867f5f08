use anyhow::anyhow;
use classflow_core::AppError;
use classflow_models::ManagerId;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::classes::model::ClassWithStats;
use crate::modules::classes::service::ClassService;
use crate::modules::managers::model::{
    CreateManagerDto, Manager, ManagerFilterParams, ManagerWithStats, UpdateManagerDto,
};

const CODE_CONSTRAINT: &str = "managers_code_key";

const MANAGER_WITH_STATS: &str = r#"SELECT m.*,
       (SELECT COUNT(*) FROM classes c WHERE c.manager_id = m.id) AS class_count
  FROM managers m"#;

fn duplicate_code(err: sqlx::Error, code: &str) -> AppError {
    AppError::from_unique_violation(
        err,
        CODE_CONSTRAINT,
        &format!("Manager with code '{code}' already exists"),
    )
}

pub struct ManagerService;

impl ManagerService {
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_manager(
        db: &PgPool,
        dto: CreateManagerDto,
    ) -> Result<ManagerWithStats, AppError> {
        let manager = sqlx::query_as::<_, Manager>(
            r#"INSERT INTO managers (code, name, email, phone)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_code(e, &dto.code))?;

        Ok(ManagerWithStats {
            manager,
            class_count: 0,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_managers(
        db: &PgPool,
        filters: ManagerFilterParams,
    ) -> Result<Vec<ManagerWithStats>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(MANAGER_WITH_STATS);
        qb.push(" WHERE 1 = 1");
        if let Some(active) = filters.active {
            qb.push(" AND m.active = ").push_bind(active);
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(" AND (m.code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR m.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY m.name");

        let managers = qb
            .build_query_as::<ManagerWithStats>()
            .fetch_all(db)
            .await?;
        Ok(managers)
    }

    #[instrument(skip(db))]
    pub async fn get_manager(db: &PgPool, id: ManagerId) -> Result<ManagerWithStats, AppError> {
        sqlx::query_as::<_, ManagerWithStats>(&format!("{MANAGER_WITH_STATS} WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Manager not found")))
    }

    #[instrument(skip(db))]
    pub async fn manager_classes(
        db: &PgPool,
        id: ManagerId,
    ) -> Result<Vec<ClassWithStats>, AppError> {
        Self::get_manager(db, id).await?;
        ClassService::classes_for_manager(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_manager(
        db: &PgPool,
        id: ManagerId,
        dto: UpdateManagerDto,
    ) -> Result<ManagerWithStats, AppError> {
        let existing = Self::get_manager(db, id).await?;
        let current = existing.manager;
        let code = dto.code.map(|c| c.trim().to_string()).unwrap_or(current.code);

        let manager = sqlx::query_as::<_, Manager>(
            r#"UPDATE managers
               SET code = $1, name = $2, email = $3, phone = $4, active = $5, updated_at = NOW()
               WHERE id = $6
               RETURNING *"#,
        )
        .bind(&code)
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(current.name))
        .bind(dto.email.unwrap_or(current.email))
        .bind(dto.phone.unwrap_or(current.phone))
        .bind(dto.active.unwrap_or(current.active))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        Ok(ManagerWithStats {
            manager,
            class_count: existing.class_count,
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_manager(db: &PgPool, id: ManagerId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM managers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Manager not found")));
        }
        Ok(())
    }
}
