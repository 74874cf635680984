mod client;
mod config;
mod device_repository;

pub use client::PostgresClient;
pub use config::PostgresConfig;
pub use device_repository::{DeviceRow, PostgresDeviceRepository};
