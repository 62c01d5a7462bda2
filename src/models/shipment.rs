use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Delivery state of a shipment.
///
/// `Dikirim` is the only initial state and `Selesai` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "shipment_status")]
pub enum ShipmentStatus {
    /// In transit.
    #[default]
    #[postgres(name = "dikirim")]
    Dikirim,
    /// Delivered.
    #[postgres(name = "selesai")]
    Selesai,
}

/// Represents a shipment ("paket") owned by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// The unique identifier for the shipment.
    pub id: i64,
    /// Name of the sender.
    #[serde(rename = "sender")]
    pub sender_name: String,
    /// Name of the receiver.
    #[serde(rename = "receiver")]
    pub receiver_name: String,
    /// Delivery address.
    pub address: String,
    /// Shipping date.
    pub date: DateTime<Utc>,
    /// Set once the shipment is marked as delivered.
    #[serde(rename = "arrival")]
    pub arrival_date: Option<DateTime<Utc>>,
    /// Description of the package content.
    pub content: String,
    /// Current delivery state.
    pub status: ShipmentStatus,
    /// The ID of the account that owns the shipment.
    pub account_id: i64,
}

impl TryFrom<&Row> for Shipment {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender_name: row.try_get("sender_name")?,
            receiver_name: row.try_get("receiver_name")?,
            address: row.try_get("address")?,
            date: row.try_get("date")?,
            arrival_date: row.try_get("arrival_date")?,
            content: row.try_get("content")?,
            status: row.try_get("status")?,
            account_id: row.try_get("account_id")?,
        })
    }
}

/// Validated fields of a shipment about to be created.
#[derive(Debug, Clone)]
pub struct NewShipment {
    pub sender_name: String,
    pub receiver_name: String,
    pub address: String,
    pub date: DateTime<Utc>,
    pub content: String,
}

/// Validated subset of fields to overwrite on an existing shipment.
#[derive(Debug, Clone, Default)]
pub struct ShipmentChanges {
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
    pub address: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

impl ShipmentChanges {
    /// Whether no field would be touched.
    pub fn is_empty(&self) -> bool {
        self.sender_name.is_none()
            && self.receiver_name.is_none()
            && self.address.is_none()
            && self.date.is_none()
            && self.content.is_none()
    }
}
