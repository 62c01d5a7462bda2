use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;

use crate::error::Result;
use crate::models::shipment::{NewShipment, Shipment, ShipmentChanges, ShipmentStatus};

/// Durable storage for shipments.
///
/// Every lookup and mutation is scoped to the owning account, so a shipment
/// belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Lists the shipments owned by `account_id`, oldest first.
    async fn list_by_account(&self, account_id: i64) -> Result<Vec<Shipment>>;

    /// Inserts a shipment in the `dikirim` state.
    async fn insert(&self, account_id: i64, shipment: NewShipment) -> Result<Shipment>;

    /// Finds a single shipment.
    async fn find_owned(&self, id: i64, account_id: i64) -> Result<Option<Shipment>>;

    /// Overwrites the supplied fields. Returns the number of rows touched.
    async fn update_owned(&self, id: i64, account_id: i64, changes: ShipmentChanges) -> Result<u64>;

    /// Moves a shipment to `selesai` with the given arrival date in a single
    /// statement. Returns the stored arrival date, or `None` if no row matched.
    async fn mark_done(
        &self,
        id: i64,
        account_id: i64,
        arrived_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>>;

    /// Deletes a shipment. Returns the number of rows removed.
    async fn delete_owned(&self, id: i64, account_id: i64) -> Result<u64>;
}

/// PostgreSQL-backed [`ShipmentRepository`].
#[derive(Clone)]
pub struct PgShipmentRepository {
    pool: Pool,
}

impl PgShipmentRepository {
    /// Creates a new `PgShipmentRepository`.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShipmentRepository for PgShipmentRepository {
    async fn list_by_account(&self, account_id: i64) -> Result<Vec<Shipment>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, sender_name, receiver_name, address, date, arrival_date,
                       content, status, account_id
                FROM shipments
                WHERE account_id = $1
                ORDER BY id ASC
                "#,
                &[&account_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(Shipment::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    async fn insert(&self, account_id: i64, shipment: NewShipment) -> Result<Shipment> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO shipments (sender_name, receiver_name, address, date, content, account_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, sender_name, receiver_name, address, date, arrival_date,
                          content, status, account_id
                "#,
                &[
                    &shipment.sender_name,
                    &shipment.receiver_name,
                    &shipment.address,
                    &shipment.date,
                    &shipment.content,
                    &account_id,
                ],
            )
            .await?;
        Ok(Shipment::try_from(&row)?)
    }

    async fn find_owned(&self, id: i64, account_id: i64) -> Result<Option<Shipment>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, sender_name, receiver_name, address, date, arrival_date,
                       content, status, account_id
                FROM shipments
                WHERE id = $1 AND account_id = $2
                "#,
                &[&id, &account_id],
            )
            .await?;
        Ok(row.as_ref().map(Shipment::try_from).transpose()?)
    }

    async fn update_owned(&self, id: i64, account_id: i64, changes: ShipmentChanges) -> Result<u64> {
        let client = self.pool.get().await?;
        let affected = client
            .execute(
                r#"
                UPDATE shipments
                SET
                    sender_name = COALESCE($3, sender_name),
                    receiver_name = COALESCE($4, receiver_name),
                    address = COALESCE($5, address),
                    date = COALESCE($6, date),
                    content = COALESCE($7, content)
                WHERE id = $1 AND account_id = $2
                "#,
                &[
                    &id,
                    &account_id,
                    &changes.sender_name,
                    &changes.receiver_name,
                    &changes.address,
                    &changes.date,
                    &changes.content,
                ],
            )
            .await?;
        Ok(affected)
    }

    async fn mark_done(
        &self,
        id: i64,
        account_id: i64,
        arrived_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE shipments
                SET status = $3, arrival_date = $4
                WHERE id = $1 AND account_id = $2
                RETURNING arrival_date
                "#,
                &[&id, &account_id, &ShipmentStatus::Selesai, &arrived_at],
            )
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("arrival_date")?)),
            None => Ok(None),
        }
    }

    async fn delete_owned(&self, id: i64, account_id: i64) -> Result<u64> {
        let client = self.pool.get().await?;
        let affected = client
            .execute(
                "DELETE FROM shipments WHERE id = $1 AND account_id = $2",
                &[&id, &account_id],
            )
            .await?;
        Ok(affected)
    }
}
