use async_trait::async_trait;

use crate::device::{CreateDeviceInput, Device, UpdateDeviceInput};
use crate::error::DomainResult;

/// Repository trait for device storage operations
/// Infrastructure layer (e.g., devicehub-postgres) implements this trait
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// List all devices in store order
    async fn list_devices(&self) -> DomainResult<Vec<Device>>;

    /// Get a device by ID
    async fn get_device(&self, device_id: i32) -> DomainResult<Option<Device>>;

    /// List devices matching a brand
    async fn list_devices_by_brand(&self, brand: &str) -> DomainResult<Vec<Device>>;

    /// List devices matching a state
    async fn list_devices_by_state(&self, state: &str) -> DomainResult<Vec<Device>>;

    /// Create a new device
    async fn create_device(&self, input: CreateDeviceInput) -> DomainResult<Device>;

    /// Partially update a device
    async fn update_device(&self, input: UpdateDeviceInput) -> DomainResult<Device>;

    /// Delete a device by ID
    async fn delete_device(&self, device_id: i32) -> DomainResult<()>;
}
