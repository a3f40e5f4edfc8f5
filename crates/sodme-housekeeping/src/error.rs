use thiserror::Error;

#[derive(Debug, Error)]
pub enum HousekeepingError {
    #[error("orphaned order {order_id} could not be cancelled: {reason}")]
    OrphanedOrdersError { order_id: uuid::Uuid, reason: String },
}
