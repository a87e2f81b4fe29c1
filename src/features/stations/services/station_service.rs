use sqlx::PgPool;
use uuid::Uuid;

use super::nearest_station::{nearest_station, NearestStation};
use crate::core::error::{AppError, Result};
use crate::features::geo::GeoPoint;
use crate::features::stations::models::{CreateStation, Station, UpdateStation};

const STATION_COLUMNS: &str = r#"
    id, name, address, latitude, longitude, phone, email,
    manager_user_id, is_active, created_at, updated_at
"#;

/// Service for station operations
pub struct StationService {
    pool: PgPool,
}

impl StationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a station; each manager owns at most one
    pub async fn create(&self, data: &CreateStation) -> Result<Station> {
        let station = sqlx::query_as::<_, Station>(&format!(
            r#"
            INSERT INTO stations (name, address, latitude, longitude, phone, email, manager_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.address)
        .bind(data.location.lat)
        .bind(data.location.lon)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(&data.manager_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Conflict(
                "This manager already has a registered station".to_string(),
            ),
            e => {
                tracing::error!("Failed to create station: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!(
            "Created station: {} ({}) managed by {}",
            station.id,
            station.name,
            station.manager_user_id
        );

        Ok(station)
    }

    /// Get station by ID, active or not
    pub async fn get_by_id(&self, id: Uuid) -> Result<Station> {
        sqlx::query_as::<_, Station>(&format!(
            "SELECT {STATION_COLUMNS} FROM stations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get station: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Station {} not found", id)))
    }

    /// Station managed by the given user, if any
    pub async fn get_by_manager(&self, user_id: &str) -> Result<Option<Station>> {
        sqlx::query_as::<_, Station>(&format!(
            "SELECT {STATION_COLUMNS} FROM stations WHERE manager_user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get station by manager: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Active stations in creation order; the order also decides nearest-station ties
    pub async fn list_active(&self) -> Result<Vec<Station>> {
        sqlx::query_as::<_, Station>(&format!(
            r#"
            SELECT {STATION_COLUMNS}
            FROM stations
            WHERE is_active = TRUE
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list stations: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Nearest active station to a point, `None` when no station is active
    pub async fn find_nearest(&self, point: GeoPoint) -> Result<Option<NearestStation>> {
        let stations = self.list_active().await?;

        let nearest = nearest_station(&stations, point).map(|(station, distance_km)| {
            NearestStation {
                station: station.clone(),
                distance_km,
            }
        });

        match &nearest {
            Some(n) => tracing::debug!(
                "Nearest station to ({}, {}) is {} at {:.2} km",
                point.lat,
                point.lon,
                n.station.id,
                n.distance_km
            ),
            None => tracing::info!(
                "No active station available for ({}, {})",
                point.lat,
                point.lon
            ),
        }

        Ok(nearest)
    }

    /// Update station details; absent fields keep their value
    pub async fn update(&self, id: Uuid, data: &UpdateStation) -> Result<Station> {
        let station = sqlx::query_as::<_, Station>(&format!(
            r#"
            UPDATE stations
            SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                phone = COALESCE($6, phone),
                email = COALESCE($7, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .bind(data.location.map(|p| p.lat))
        .bind(data.location.map(|p| p.lon))
        .bind(&data.phone)
        .bind(&data.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update station: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Station {} not found", id)))?;

        tracing::info!("Updated station: {}", id);
        Ok(station)
    }

    /// Soft delete; stations are never removed while mechanics reference them
    pub async fn deactivate(&self, id: Uuid) -> Result<Station> {
        let station = sqlx::query_as::<_, Station>(&format!(
            r#"
            UPDATE stations
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING {STATION_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to deactivate station: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Station {} not found", id)))?;

        tracing::info!("Deactivated station: {}", id);
        Ok(station)
    }
}
