//! Customer deletion protocol.
//!
//! A customer may only be removed once nothing references it. The checks run
//! in a fixed order, each one short-circuiting the rest:
//!
//! ```text
//! start -> id-resolved -> users-checked -> orders-checked -> deleted
//!   |          |               |                |              |
//!   v          v               v                v              v
//! not-found  not-found      conflict         conflict      not-found
//! ```
//!
//! The sequence is not wrapped in a transaction. A dependent row inserted
//! between the checks and the delete surfaces as a foreign key violation,
//! which is reported as [`DeleteOutcome::Referenced`] rather than an error.

use customer_desk_core::CustomerRowId;

use crate::db::{RepositoryError, Store};

/// Where the deletion protocol stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed.
    Deleted,
    /// No customer has this row key (at resolve time or at delete time).
    NotFound,
    /// At least one `customer_user` row points at the customer.
    LinkedUsers,
    /// At least one `order_recored` row carries the customer's `id`.
    LinkedOrders,
    /// The database refused the delete because of a foreign key.
    Referenced,
}

/// Run the deletion protocol for one customer row.
///
/// # Errors
///
/// Returns `RepositoryError` for any failure other than a foreign key
/// violation.
pub async fn delete_customer<S: Store>(
    store: &S,
    row: CustomerRowId,
) -> Result<DeleteOutcome, RepositoryError> {
    match run_protocol(store, row).await {
        Err(RepositoryError::Referenced(constraint)) => {
            tracing::warn!(%row, %constraint, "Delete blocked by foreign key");
            Ok(DeleteOutcome::Referenced)
        }
        other => other,
    }
}

async fn run_protocol<S: Store>(
    store: &S,
    row: CustomerRowId,
) -> Result<DeleteOutcome, RepositoryError> {
    let Some(customer_id) = store.customer_business_id(row).await? else {
        return Ok(DeleteOutcome::NotFound);
    };

    if store.count_linked_users(row).await? > 0 {
        return Ok(DeleteOutcome::LinkedUsers);
    }

    if store.count_linked_orders(&customer_id).await? > 0 {
        return Ok(DeleteOutcome::LinkedOrders);
    }

    if store.delete_customer(row).await? == 0 {
        // Removed by someone else after the id was resolved
        return Ok(DeleteOutcome::NotFound);
    }

    tracing::info!(%row, %customer_id, "Customer deleted");
    Ok(DeleteOutcome::Deleted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    #[tokio::test]
    async fn test_unknown_row_stops_at_resolve() {
        let store = MemoryStore::new();
        let outcome = delete_customer(&store, CustomerRowId::new(9999)).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_linked_users_block_before_orders_are_counted() {
        let store = MemoryStore::new();
        let customer = store.seed("C1", "Acme", None);
        store.link_user(customer.row);
        store.link_order("C1");

        let outcome = delete_customer(&store, customer.row).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::LinkedUsers);
        // resolve + users count only
        assert_eq!(store.calls(), 2);
        assert!(store.contains(customer.row));
    }

    #[tokio::test]
    async fn test_linked_orders_block_delete() {
        let store = MemoryStore::new();
        let customer = store.seed("C1", "Acme", None);
        store.link_order("C1");

        let outcome = delete_customer(&store, customer.row).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::LinkedOrders);
        assert!(store.contains(customer.row));
    }

    #[tokio::test]
    async fn test_orders_for_other_customers_do_not_block() {
        let store = MemoryStore::new();
        let customer = store.seed("C1", "Acme", None);
        store.link_order("C2");

        let outcome = delete_customer(&store, customer.row).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(!store.contains(customer.row));
    }

    #[tokio::test]
    async fn test_row_gone_at_delete_time_is_not_found() {
        let store = MemoryStore::vanishing_delete();
        let customer = store.seed("C1", "Acme", None);

        let outcome = delete_customer(&store, customer.row).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
        // resolve + both counts + delete
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_an_outcome() {
        let store = MemoryStore::racing_delete();
        let customer = store.seed("C1", "Acme", None);

        let outcome = delete_customer(&store, customer.row).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Referenced);
    }

    #[tokio::test]
    async fn test_infrastructure_failure_is_an_error() {
        let store = MemoryStore::failing();
        let result = delete_customer(&store, CustomerRowId::new(1)).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
