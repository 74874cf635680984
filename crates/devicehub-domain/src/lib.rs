pub mod device;
pub mod device_service;
pub mod error;
pub mod repository;

pub use device::*;
pub use device_service::DeviceService;
pub use error::{DomainError, DomainResult};
pub use repository::DeviceRepository;

#[cfg(any(test, feature = "testing"))]
pub use repository::MockDeviceRepository;
