//! Customer JSON API route handlers.
//!
//! Each handler is a single try/fail unit: validate, make the store call(s),
//! map the result. Nothing is retried.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use customer_desk_core::{Customer, CustomerFields, CustomerInput, CustomerRowId};

use crate::db::{RepositoryError, Store};
use crate::error::{AppError, Result};
use crate::extract::{INVALID_BODY, Payload, PayloadRejection};
use crate::services::{DeleteOutcome, delete_customer};
use crate::state::AppState;

const NOT_FOUND: &str = "Customer not found.";
const LINKED_USERS: &str = "Cannot delete this customer because linked users exist.";
const LINKED_ORDERS: &str = "Cannot delete this customer because linked orders exist.";
const REFERENCED: &str = "Cannot delete this customer because it is referenced by other records.";

const LIST_FAILED: &str = "Error executing stored procedure.";
const FETCH_FAILED: &str = "Error fetching customer from database.";
const CREATE_FAILED: &str = "Error adding customer to database.";
const UPDATE_FAILED: &str = "Error updating customer in database.";
const DELETE_FAILED: &str = "Error deleting customer from database.";

/// Query parameters for the customer list.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term; absent means list everything.
    #[serde(default)]
    pub search: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND.to_owned())
}

/// Turn the opaque path key into a row ID.
///
/// A key that is not a row number cannot match anything, so it is reported
/// as not found without touching the database.
fn resolve_row(key: &str) -> Result<CustomerRowId> {
    CustomerRowId::from_key(key).ok_or_else(not_found)
}

/// Map a failed insert or update: uniqueness violations become 409.
fn write_error(message: &'static str, err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(field) => AppError::Conflict(field.message().to_owned()),
        other => AppError::database(message, other),
    }
}

/// Validate a create/update body, treating a missing body as empty.
fn required_fields(
    body: std::result::Result<Payload<CustomerInput>, PayloadRejection>,
) -> Result<CustomerFields> {
    let Payload(input) = body.map_err(|rejection| {
        tracing::debug!(detail = rejection.detail(), "Undecodable customer body");
        AppError::BadRequest(INVALID_BODY.to_owned())
    })?;

    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// List customers matching a search term.
///
/// GET /api/customers?search=
pub async fn index<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>> {
    let term = query.search.unwrap_or_default();
    let customers = state
        .store()
        .search_customers(&term)
        .await
        .map_err(|e| AppError::database(LIST_FAILED, e))?;

    Ok(Json(customers))
}

/// Fetch a single customer.
///
/// GET /api/customers/{row}
pub async fn show<S: Store>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
) -> Result<Json<Customer>> {
    let row = resolve_row(&key)?;
    let customer = state
        .store()
        .get_customer(row)
        .await
        .map_err(|e| AppError::database(FETCH_FAILED, e))?
        .ok_or_else(not_found)?;

    Ok(Json(customer))
}

/// Create a customer.
///
/// POST /api/customers
pub async fn create<S: Store>(
    State(state): State<AppState<S>>,
    body: std::result::Result<Payload<CustomerInput>, PayloadRejection>,
) -> Result<(StatusCode, Json<Customer>)> {
    let fields = required_fields(body)?;
    let customer = state
        .store()
        .insert_customer(&fields)
        .await
        .map_err(|e| write_error(CREATE_FAILED, e))?;

    tracing::info!(row = %customer.row, customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Replace every editable field of a customer.
///
/// PUT /api/customers/{row}
pub async fn update<S: Store>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
    body: std::result::Result<Payload<CustomerInput>, PayloadRejection>,
) -> Result<Json<Customer>> {
    let fields = required_fields(body)?;
    let row = resolve_row(&key)?;
    let customer = state
        .store()
        .update_customer(row, &fields)
        .await
        .map_err(|e| write_error(UPDATE_FAILED, e))?
        .ok_or_else(not_found)?;

    Ok(Json(customer))
}

/// Delete a customer that nothing references.
///
/// DELETE /api/customers/{row}
pub async fn destroy<S: Store>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
) -> Result<Json<Value>> {
    let row = resolve_row(&key)?;
    let outcome = delete_customer(state.store(), row)
        .await
        .map_err(|e| AppError::database(DELETE_FAILED, e))?;

    match outcome {
        DeleteOutcome::Deleted => Ok(Json(json!({ "message": "Customer deleted successfully." }))),
        DeleteOutcome::NotFound => Err(not_found()),
        DeleteOutcome::LinkedUsers => Err(AppError::Conflict(LINKED_USERS.to_owned())),
        DeleteOutcome::LinkedOrders => Err(AppError::Conflict(LINKED_ORDERS.to_owned())),
        DeleteOutcome::Referenced => Err(AppError::Conflict(REFERENCED.to_owned())),
    }
}
