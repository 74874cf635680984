use std::sync::Arc;

use tracing::{debug, instrument};

use crate::device::{CreateDeviceInput, Device, UpdateDeviceInput};
use crate::error::{DomainError, DomainResult};
use crate::repository::DeviceRepository;

/// Domain service for device management business logic
/// This is the orchestration layer that handlers call
pub struct DeviceService {
    repository: Arc<dyn DeviceRepository>,
}

impl DeviceService {
    pub fn new(repository: Arc<dyn DeviceRepository>) -> Self {
        Self { repository }
    }

    /// List every device in store order
    #[instrument(skip(self))]
    pub async fn list_devices(&self) -> DomainResult<Vec<Device>> {
        let devices = self.repository.list_devices().await?;

        debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    /// Get a device by ID
    #[instrument(skip(self))]
    pub async fn get_device(&self, device_id: i32) -> DomainResult<Device> {
        debug!(device_id, "getting device");

        let device = self
            .repository
            .get_device(device_id)
            .await?
            .ok_or_else(|| DomainError::DeviceNotFound("Device not found".to_string()))?;

        Ok(device)
    }

    /// Create a new device with business logic validation
    #[instrument(skip(self, input), fields(device_name = %input.name, brand = %input.brand))]
    pub async fn create_device(&self, input: CreateDeviceInput) -> DomainResult<Device> {
        if input.name.is_empty() || input.brand.is_empty() {
            return Err(DomainError::ValidationError(
                "name and brand are required".to_string(),
            ));
        }

        debug!("creating device");

        let device = self.repository.create_device(input).await?;

        debug!(device_id = device.id, "device created");
        Ok(device)
    }

    /// Partially update a device
    ///
    /// Empty-string fields are discarded before the at-least-one check, so an
    /// update carrying only blanks is rejected without a store call.
    #[instrument(skip(self, input), fields(device_id = input.device_id))]
    pub async fn update_device(&self, input: UpdateDeviceInput) -> DomainResult<Device> {
        let input = UpdateDeviceInput {
            device_id: input.device_id,
            name: non_empty(input.name),
            brand: non_empty(input.brand),
            state: non_empty(input.state),
        };

        if input.name.is_none() && input.brand.is_none() && input.state.is_none() {
            return Err(DomainError::ValidationError(
                "At least one field (name, brand, state) must be provided".to_string(),
            ));
        }

        debug!("updating device");

        let device = self.repository.update_device(input).await?;

        debug!(device_id = device.id, "device updated");
        Ok(device)
    }

    /// Delete a device by ID
    #[instrument(skip(self))]
    pub async fn delete_device(&self, device_id: i32) -> DomainResult<()> {
        debug!(device_id, "deleting device");

        self.repository.delete_device(device_id).await?;

        debug!(device_id, "device deleted");
        Ok(())
    }

    /// List devices matching a brand
    #[instrument(skip(self))]
    pub async fn list_devices_by_brand(&self, brand: &str) -> DomainResult<Vec<Device>> {
        if brand.is_empty() {
            return Err(DomainError::ValidationError("Brand is required".to_string()));
        }

        let devices = self.repository.list_devices_by_brand(brand).await?;

        debug!(brand, count = devices.len(), "listed devices by brand");
        Ok(devices)
    }

    /// List devices matching a state
    ///
    /// The state value is opaque here; an unrecognized value simply matches
    /// zero rows.
    #[instrument(skip(self))]
    pub async fn list_devices_by_state(&self, state: &str) -> DomainResult<Vec<Device>> {
        if state.is_empty() {
            return Err(DomainError::ValidationError("State is required".to_string()));
        }

        let devices = self.repository.list_devices_by_state(state).await?;

        debug!(state, count = devices.len(), "listed devices by state");
        Ok(devices)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
