use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use devicehub_domain::{
    CreateDeviceInput, Device, DeviceRepository, DomainError, DomainResult, UpdateDeviceInput,
};

use crate::client::PostgresClient;

/// Device row for PostgreSQL storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRow {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// Convert database DeviceRow to domain Device
impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Device {
            id: row.id,
            name: row.name,
            brand: row.brand,
            state: row.state,
            created_at: row.created_at,
        }
    }
}

fn row_to_device(row: &tokio_postgres::Row) -> Device {
    let device_row = DeviceRow {
        id: row.get(0),
        name: row.get(1),
        brand: row.get(2),
        state: row.get(3),
        created_at: row.get(4),
    };
    device_row.into()
}

/// PostgreSQL implementation of DeviceRepository trait
#[derive(Clone)]
pub struct PostgresDeviceRepository {
    client: PostgresClient,
}

impl PostgresDeviceRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeviceRepository for PostgresDeviceRepository {
    #[instrument(skip(self))]
    async fn list_devices(&self) -> DomainResult<Vec<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                "SELECT id, name, brand, state, created_at FROM devices",
                &[],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let devices = rows.iter().map(row_to_device).collect();

        debug!(count = rows.len(), "listed devices");
        Ok(devices)
    }

    #[instrument(skip(self))]
    async fn get_device(&self, device_id: i32) -> DomainResult<Option<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let row = conn
            .query_opt(
                "SELECT id, name, brand, state, created_at
                 FROM devices
                 WHERE id = $1",
                &[&device_id],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        Ok(row.as_ref().map(row_to_device))
    }

    #[instrument(skip(self))]
    async fn list_devices_by_brand(&self, brand: &str) -> DomainResult<Vec<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                "SELECT id, name, brand, state, created_at
                 FROM devices
                 WHERE brand = $1",
                &[&brand],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let devices = rows.iter().map(row_to_device).collect();

        debug!(brand, count = rows.len(), "listed devices by brand");
        Ok(devices)
    }

    #[instrument(skip(self))]
    async fn list_devices_by_state(&self, state: &str) -> DomainResult<Vec<Device>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows = conn
            .query(
                "SELECT id, name, brand, state, created_at
                 FROM devices
                 WHERE state = $1",
                &[&state],
            )
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        let devices = rows.iter().map(row_to_device).collect();

        debug!(state, count = rows.len(), "listed devices by state");
        Ok(devices)
    }

    #[instrument(skip(self, input), fields(device_name = %input.name, brand = %input.brand))]
    async fn create_device(&self, input: CreateDeviceInput) -> DomainResult<Device> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Omitting state lets the column default apply
        let result = match input.state {
            Some(ref state) => {
                conn.query_one(
                    "INSERT INTO devices (name, brand, state)
                     VALUES ($1, $2, $3)
                     RETURNING id, name, brand, state, created_at",
                    &[&input.name, &input.brand, state],
                )
                .await
            }
            None => {
                conn.query_one(
                    "INSERT INTO devices (name, brand)
                     VALUES ($1, $2)
                     RETURNING id, name, brand, state, created_at",
                    &[&input.name, &input.brand],
                )
                .await
            }
        };

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                // Check if it's a database error with a unique constraint violation
                if let Some(db_err) = e.as_db_error() {
                    // PostgreSQL error code 23505 is unique_violation
                    if db_err.code().code() == "23505" {
                        return Err(DomainError::DeviceAlreadyExists(input.name));
                    }
                }
                return Err(DomainError::RepositoryError(e.into()));
            }
        };

        let device = row_to_device(&row);

        debug!(device_id = device.id, "created device");
        Ok(device)
    }

    #[instrument(skip(self, input), fields(device_id = input.device_id))]
    async fn update_device(&self, input: UpdateDeviceInput) -> DomainResult<Device> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        // Build dynamic UPDATE query based on provided fields; the service
        // guarantees at least one field is present
        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();

        if let Some(ref name) = input.name {
            params.push(name);
            sets.push(format!("name = ${}", params.len()));
        }

        if let Some(ref brand) = input.brand {
            params.push(brand);
            sets.push(format!("brand = ${}", params.len()));
        }

        if let Some(ref state) = input.state {
            params.push(state);
            sets.push(format!("state = ${}", params.len()));
        }

        params.push(&input.device_id);
        let query = format!(
            "UPDATE devices SET {}
             WHERE id = ${}
             RETURNING id, name, brand, state, created_at",
            sets.join(", "),
            params.len()
        );

        let row = conn
            .query_opt(&query, &params[..])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        match row {
            Some(row) => {
                let device = row_to_device(&row);
                debug!(device_id = device.id, "updated device");
                Ok(device)
            }
            None => Err(DomainError::DeviceNotFound("Device not found".to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn delete_device(&self, device_id: i32) -> DomainResult<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let rows_affected = conn
            .execute("DELETE FROM devices WHERE id = $1", &[&device_id])
            .await
            .map_err(|e| DomainError::RepositoryError(e.into()))?;

        if rows_affected == 0 {
            return Err(DomainError::DeviceNotFound("Device not found".to_string()));
        }

        debug!(device_id, "deleted device");
        Ok(())
    }
}
