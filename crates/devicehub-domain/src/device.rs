/// Domain representation of a device
/// Simple String types for now - can evolve to newtypes later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub state: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a new device
///
/// `id` and `created_at` are assigned by the store; `state` falls back to the
/// store default when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDeviceInput {
    pub name: String,
    pub brand: String,
    pub state: Option<String>,
}

/// Input for partially updating a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDeviceInput {
    pub device_id: i32,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}
