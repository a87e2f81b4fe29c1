use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::geo::GeoPoint;
use crate::features::mechanics::models::{CreateMechanic, Mechanic};

const MECHANIC_COLUMNS: &str = r#"
    id, user_id, station_id, display_name, phone, specialties, is_available,
    current_latitude, current_longitude, created_at, updated_at
"#;

/// Service for mechanic operations
pub struct MechanicService {
    pool: PgPool,
}

impl MechanicService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach a user to an active station as mechanic
    pub async fn create(&self, data: &CreateMechanic) -> Result<Mechanic> {
        // Only active stations accept new mechanics
        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            INSERT INTO mechanics (user_id, station_id, display_name, phone, specialties)
            SELECT $1, s.id, $3, $4, $5
            FROM stations s
            WHERE s.id = $2 AND s.is_active = TRUE
            RETURNING {MECHANIC_COLUMNS}
            "#
        ))
        .bind(&data.user_id)
        .bind(data.station_id)
        .bind(&data.display_name)
        .bind(&data.phone)
        .bind(&data.specialties)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("User is already a mechanic of a station".to_string())
            }
            e => {
                tracing::error!("Failed to create mechanic: {:?}", e);
                AppError::Database(e)
            }
        })?
        .ok_or_else(|| {
            AppError::NotFound(format!("Active station {} not found", data.station_id))
        })?;

        tracing::info!(
            "Mechanic {} (user {}) joined station {}",
            mechanic.id,
            mechanic.user_id,
            mechanic.station_id
        );

        Ok(mechanic)
    }

    /// Get mechanic by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Mechanic> {
        sqlx::query_as::<_, Mechanic>(&format!(
            "SELECT {MECHANIC_COLUMNS} FROM mechanics WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get mechanic: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Mechanic {} not found", id)))
    }

    /// Mechanic profile linked to a user, if any
    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<Mechanic>> {
        sqlx::query_as::<_, Mechanic>(&format!(
            "SELECT {MECHANIC_COLUMNS} FROM mechanics WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get mechanic by user: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Mechanic profile linked to a user
    pub async fn get_by_user(&self, user_id: &str) -> Result<Mechanic> {
        self.find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No mechanic profile for this user".to_string()))
    }

    /// Mechanics of a station, oldest first
    pub async fn list_by_station(&self, station_id: Uuid) -> Result<Vec<Mechanic>> {
        sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            SELECT {MECHANIC_COLUMNS}
            FROM mechanics
            WHERE station_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(station_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list mechanics: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Toggle the availability flag of the user's mechanic profile
    pub async fn set_availability(&self, user_id: &str, is_available: bool) -> Result<Mechanic> {
        let mechanic = sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            UPDATE mechanics
            SET is_available = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {MECHANIC_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update mechanic availability: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("No mechanic profile for this user".to_string()))?;

        tracing::info!(
            "Mechanic {} availability set to {}",
            mechanic.id,
            is_available
        );
        Ok(mechanic)
    }

    /// Store the mechanic's live position
    pub async fn update_location(&self, user_id: &str, point: GeoPoint) -> Result<Mechanic> {
        sqlx::query_as::<_, Mechanic>(&format!(
            r#"
            UPDATE mechanics
            SET current_latitude = $2, current_longitude = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {MECHANIC_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(point.lat)
        .bind(point.lon)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update mechanic location: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("No mechanic profile for this user".to_string()))
    }

    /// Delete a mechanic that holds no assigned or in-progress request
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM mechanics m
            WHERE m.id = $1
            AND NOT EXISTS (
                SELECT 1 FROM service_requests r
                WHERE r.mechanic_id = m.id
                AND r.status IN ('assigned', 'in_progress')
            )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete mechanic: {:?}", e);
            AppError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            // Either missing or still busy; get_by_id distinguishes the two
            self.get_by_id(id).await?;
            return Err(AppError::Conflict(
                "Mechanic still has active requests".to_string(),
            ));
        }

        tracing::info!("Deleted mechanic: {}", id);
        Ok(())
    }
}
