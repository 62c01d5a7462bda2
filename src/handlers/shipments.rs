use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::{
        session::AuthenticatedAccount,
        shipment::{NewShipment, Shipment, ShipmentChanges},
    },
    services::shipments as shipment_service,
    state::AppState,
    validation::{
        report::validate_payload,
        shipment::{optional_shipment_date, parse_shipment_date, shipment_date},
    },
};

/// The request payload for creating a shipment.
///
/// Missing fields default to empty so they surface as field errors.
/// Any `account_id` sent by the client is ignored.
#[derive(Deserialize, Validate, Default)]
#[serde(default)]
pub struct CreateShipmentRequest {
    #[garde(length(chars, min = 3, max = 40))]
    pub sender: String,
    #[garde(length(chars, min = 3, max = 40))]
    pub receiver: String,
    #[garde(length(chars, min = 3, max = 100))]
    pub address: String,
    #[garde(custom(shipment_date))]
    pub date: String,
    #[garde(length(chars, min = 3, max = 100))]
    pub content: String,
}

impl CreateShipmentRequest {
    fn into_new_shipment(self) -> Result<NewShipment> {
        let date = parse_shipment_date(&self.date)
            .ok_or_else(|| AppError::Validation("Invalid date".to_string()))?;

        Ok(NewShipment {
            sender_name: self.sender,
            receiver_name: self.receiver,
            address: self.address,
            date,
            content: self.content,
        })
    }
}

/// The request payload for a partial shipment update.
#[derive(Deserialize, Validate, Default)]
#[serde(default)]
pub struct UpdateShipmentRequest {
    #[garde(length(chars, min = 3, max = 40))]
    pub sender: Option<String>,
    #[garde(length(chars, min = 3, max = 40))]
    pub receiver: Option<String>,
    #[garde(length(chars, min = 3, max = 100))]
    pub address: Option<String>,
    #[garde(custom(optional_shipment_date))]
    pub date: Option<String>,
    #[garde(length(chars, min = 3, max = 100))]
    pub content: Option<String>,
}

impl UpdateShipmentRequest {
    fn into_changes(self) -> Result<ShipmentChanges> {
        let date = match self.date {
            Some(raw) => Some(
                parse_shipment_date(&raw)
                    .ok_or_else(|| AppError::Validation("Invalid date".to_string()))?,
            ),
            None => None,
        };

        Ok(ShipmentChanges {
            sender_name: self.sender,
            receiver_name: self.receiver,
            address: self.address,
            date,
            content: self.content,
        })
    }
}

#[derive(Serialize)]
struct CreatedResponse {
    message: &'static str,
    data: Shipment,
}

#[derive(Serialize)]
struct FoundResponse {
    status: &'static str,
    message: &'static str,
    data: Shipment,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct DoneResponse {
    message: &'static str,
    arrival_date: DateTime<Utc>,
}

fn request_failed(rejection: JsonRejection) -> AppError {
    tracing::debug!("Rejected shipment payload: {}", rejection);
    AppError::UnprocessableEntity("Request failed".to_string())
}

/// Reads a positive shipment id from the path.
fn shipment_id(path: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    match path {
        Ok(Path(id)) if id > 0 => Ok(id),
        _ => Err(AppError::Validation("Invalid shipment id".to_string())),
    }
}

/// Lists the caller's shipments.
#[axum::debug_handler]
pub async fn list_shipments(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<Response> {
    let shipments = shipment_service::list_shipments(&state, account.account_id).await?;
    Ok((StatusCode::OK, Json(shipments)).into_response())
}

/// Creates a shipment owned by the caller.
#[axum::debug_handler]
pub async fn create_shipment(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    payload: std::result::Result<Json<CreateShipmentRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload.map_err(request_failed)?;
    validate_payload(&payload)?;

    let shipment =
        shipment_service::create_shipment(&state, account.account_id, payload.into_new_shipment()?)
            .await?;

    let response = CreatedResponse {
        message: "Shipment created",
        data: shipment,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Fetches one of the caller's shipments.
#[axum::debug_handler]
pub async fn get_shipment(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = shipment_id(path)?;
    let shipment = shipment_service::get_shipment(&state, account.account_id, id).await?;

    let response = FoundResponse {
        status: "success",
        message: "Shipment found",
        data: shipment,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Partially updates one of the caller's shipments.
#[axum::debug_handler]
pub async fn update_shipment(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateShipmentRequest>, JsonRejection>,
) -> Result<Response> {
    let id = shipment_id(path)?;
    let Json(payload) = payload.map_err(request_failed)?;
    validate_payload(&payload)?;

    shipment_service::update_shipment(&state, account.account_id, id, payload.into_changes()?)
        .await?;

    let response = StatusResponse {
        status: "success",
        message: "Shipment updated",
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Marks one of the caller's shipments as delivered.
#[axum::debug_handler]
pub async fn mark_shipment_done(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = shipment_id(path)?;
    let arrival_date = shipment_service::mark_done(&state, account.account_id, id).await?;

    let response = DoneResponse {
        message: "Status changed to selesai",
        arrival_date,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Deletes one of the caller's shipments.
#[axum::debug_handler]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Response> {
    let id = shipment_id(path)?;
    shipment_service::delete_shipment(&state, account.account_id, id).await?;

    let response = StatusResponse {
        status: "success",
        message: "Shipment deleted",
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
