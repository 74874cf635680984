use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use devicehub_domain::{CreateDeviceInput, Device, DeviceService, UpdateDeviceInput};

use crate::http::error::{domain_error_to_api, ApiError};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub device_service: Arc<DeviceService>,
    pub environment: String,
}

impl AppState {
    /// 500 bodies carry failure details everywhere except production
    pub fn expose_details(&self) -> bool {
        self.environment != "production"
    }
}

/// Wire representation of a device
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        DeviceResponse {
            id: device.id,
            name: device.name,
            brand: device.brand,
            state: device.state,
            created_at: device.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub ok: bool,
    pub env: String,
}

#[derive(Debug, Default, Deserialize)]
struct CreateDevicePayload {
    name: Option<String>,
    brand: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateDevicePayload {
    name: Option<String>,
    brand: Option<String>,
    state: Option<String>,
}

/// Parse a request body into a JSON value
///
/// An absent body is treated as an empty object; a malformed one fails before
/// any handler logic runs.
fn parse_body_value(body: &Bytes) -> Result<serde_json::Value, ApiError> {
    if body.is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))
}

fn parse_device_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::BadRequest("Device id must be a number".to_string()))
}

pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        env: state.environment.clone(),
    })
}

pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    let devices = state
        .device_service
        .list_devices()
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    Ok(Json(devices.into_iter().map(DeviceResponse::from).collect()))
}

pub async fn create_device(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeviceResponse>), ApiError> {
    let value = parse_body_value(&body)?;
    let payload: CreateDevicePayload = serde_json::from_value(value)
        .map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    let input = CreateDeviceInput {
        name: payload.name.unwrap_or_default(),
        brand: payload.brand.unwrap_or_default(),
        state: payload.state,
    };

    let device = state
        .device_service
        .create_device(input)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    debug!(device_id = device.id, "device created");
    Ok((StatusCode::CREATED, Json(device.into())))
}

pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let device_id = parse_device_id(&id)?;

    let device = state
        .device_service
        .get_device(device_id)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    Ok(Json(device.into()))
}

pub async fn update_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<DeviceResponse>, ApiError> {
    let value = parse_body_value(&body)?;

    // Any createdAt key is rejected before the rest of the update checks,
    // id validity included
    if value.get("createdAt").is_some() {
        return Err(ApiError::BadRequest("createdAt cannot be updated".to_string()));
    }

    let device_id = parse_device_id(&id)?;

    let payload: UpdateDevicePayload = serde_json::from_value(value)
        .map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    let input = UpdateDeviceInput {
        device_id,
        name: payload.name,
        brand: payload.brand,
        state: payload.state,
    };

    let device = state
        .device_service
        .update_device(input)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    debug!(device_id = device.id, "device updated");
    Ok(Json(device.into()))
}

pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let device_id = parse_device_id(&id)?;

    state
        .device_service
        .delete_device(device_id)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    Ok(Json(MessageResponse {
        message: "Device deleted successfully".to_string(),
    }))
}

pub async fn list_devices_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    let devices = state
        .device_service
        .list_devices_by_brand(&brand)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    Ok(Json(devices.into_iter().map(DeviceResponse::from).collect()))
}

pub async fn list_devices_by_state(
    State(state): State<AppState>,
    Path(device_state): Path<String>,
) -> Result<Json<Vec<DeviceResponse>>, ApiError> {
    let devices = state
        .device_service
        .list_devices_by_state(&device_state)
        .await
        .map_err(|e| domain_error_to_api(e, state.expose_details()))?;

    Ok(Json(devices.into_iter().map(DeviceResponse::from).collect()))
}
