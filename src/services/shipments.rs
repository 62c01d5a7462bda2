use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, Result},
    models::shipment::{NewShipment, Shipment, ShipmentChanges},
    state::AppState,
};

const NOT_FOUND: &str = "Shipment not found";

/// Lists every shipment owned by `account_id`.
pub async fn list_shipments(state: &AppState, account_id: i64) -> Result<Vec<Shipment>> {
    state.shipments.list_by_account(account_id).await
}

/// Creates a shipment owned by `account_id`.
///
/// The owner always comes from the authenticated account, never from the
/// request body.
pub async fn create_shipment(
    state: &AppState,
    account_id: i64,
    shipment: NewShipment,
) -> Result<Shipment> {
    let shipment = state.shipments.insert(account_id, shipment).await?;
    tracing::info!("📦 Shipment {} created for account {}", shipment.id, account_id);
    Ok(shipment)
}

/// Fetches a single shipment of `account_id`.
pub async fn get_shipment(state: &AppState, account_id: i64, id: i64) -> Result<Shipment> {
    state
        .shipments
        .find_owned(id, account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
}

/// Overwrites the supplied fields of a shipment.
pub async fn update_shipment(
    state: &AppState,
    account_id: i64,
    id: i64,
    changes: ShipmentChanges,
) -> Result<()> {
    if changes.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let affected = state.shipments.update_owned(id, account_id, changes).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Cannot track package".to_string()));
    }

    tracing::info!("📦 Shipment {} updated", id);
    Ok(())
}

/// Marks a shipment as delivered now and returns its arrival date.
///
/// Repeating the call keeps the `selesai` status and moves the arrival date.
pub async fn mark_done(state: &AppState, account_id: i64, id: i64) -> Result<DateTime<Utc>> {
    let arrival_date = state
        .shipments
        .mark_done(id, account_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    tracing::info!("📦 Shipment {} delivered at {}", id, arrival_date);
    Ok(arrival_date)
}

/// Deletes a shipment.
pub async fn delete_shipment(state: &AppState, account_id: i64, id: i64) -> Result<()> {
    let affected = state.shipments.delete_owned(id, account_id).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Cannot delete package".to_string()));
    }

    tracing::info!("🗑️ Shipment {} deleted", id);
    Ok(())
}
