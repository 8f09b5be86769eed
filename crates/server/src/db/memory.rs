//! In-memory [`Store`] for handler tests.
//!
//! Mirrors the constraints the real schema enforces (unique `id` and email,
//! restrictive foreign keys) and counts calls so tests can assert that a
//! request never reached the database.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use customer_desk_core::{Customer, CustomerFields, CustomerRowId, LoginCredentials};

use super::{ConflictField, RepositoryError, Store};

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    next_row: i32,
    workers: Vec<(String, String)>,
    /// `customer_user.customer_row`
    customer_users: Vec<CustomerRowId>,
    /// `order_recored.customer_id`
    orders: Vec<String>,
}

/// Shared-nothing test double for the database.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    failing: bool,
    /// Pretend a dependent row appears between the checks and the delete.
    race_on_delete: bool,
    /// Pretend the row is removed by someone else just before the delete.
    vanish_on_delete: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails like a lost connection.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// A store whose delete statement hits a foreign key violation.
    pub fn racing_delete() -> Self {
        Self {
            race_on_delete: true,
            ..Self::default()
        }
    }

    /// A store whose delete statement finds no row to remove.
    pub fn vanishing_delete() -> Self {
        Self {
            vanish_on_delete: true,
            ..Self::default()
        }
    }

    pub fn with_worker(self, username: &str, password: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .workers
            .push((username.to_owned(), password.to_owned()));
        self
    }

    /// Insert a customer directly, bypassing the call counter.
    pub fn seed(&self, id: &str, name: &str, email: Option<&str>) -> Customer {
        let mut tables = self.tables.lock().unwrap();
        tables.next_row += 1;
        let customer = Customer {
            row: CustomerRowId::new(tables.next_row),
            id: id.to_owned(),
            name: name.to_owned(),
            phone: None,
            email: email.map(str::to_owned),
            company_name: None,
        };
        tables.customers.push(customer.clone());
        customer
    }

    pub fn link_user(&self, row: CustomerRowId) {
        self.tables.lock().unwrap().customer_users.push(row);
    }

    pub fn link_order(&self, customer_id: &str) {
        self.tables.lock().unwrap().orders.push(customer_id.to_owned());
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, row: CustomerRowId) -> bool {
        self.tables
            .lock()
            .unwrap()
            .customers
            .iter()
            .any(|c| c.row == row)
    }

    fn enter(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn check_unique(
    customers: &[Customer],
    fields: &CustomerFields,
    except: Option<CustomerRowId>,
) -> Result<(), RepositoryError> {
    let others = customers.iter().filter(|c| Some(c.row) != except);
    for other in others {
        if other.id == fields.id {
            return Err(RepositoryError::Conflict(ConflictField::Id));
        }
        if fields.email.is_some() && other.email == fields.email {
            return Err(RepositoryError::Conflict(ConflictField::Email));
        }
    }
    Ok(())
}

impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.enter()
    }

    async fn check_login(&self, credentials: &LoginCredentials) -> Result<bool, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        let (Some(user), Some(pass)) = (
            credentials.bounded_username(),
            credentials.bounded_password(),
        ) else {
            return Ok(false);
        };
        Ok(tables.workers.iter().any(|(u, p)| u == user && p == pass))
    }

    async fn search_customers(&self, term: &str) -> Result<Vec<Customer>, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        let term = term.to_lowercase();
        Ok(tables
            .customers
            .iter()
            .filter(|c| {
                term.is_empty()
                    || c.id.to_lowercase().contains(&term)
                    || c.name.to_lowercase().contains(&term)
            })
            .cloned()
            .collect())
    }

    async fn get_customer(&self, row: CustomerRowId) -> Result<Option<Customer>, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.customers.iter().find(|c| c.row == row).cloned())
    }

    async fn insert_customer(&self, fields: &CustomerFields) -> Result<Customer, RepositoryError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        check_unique(&tables.customers, fields, None)?;
        tables.next_row += 1;
        let customer = fields.clone().into_customer(CustomerRowId::new(tables.next_row));
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        row: CustomerRowId,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.customers.iter().any(|c| c.row == row) {
            return Ok(None);
        }
        check_unique(&tables.customers, fields, Some(row))?;
        let updated = fields.clone().into_customer(row);
        for slot in tables.customers.iter_mut().filter(|c| c.row == row) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn customer_business_id(
        &self,
        row: CustomerRowId,
    ) -> Result<Option<String>, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .customers
            .iter()
            .find(|c| c.row == row)
            .map(|c| c.id.clone()))
    }

    async fn count_linked_users(&self, row: CustomerRowId) -> Result<i64, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        let count = tables.customer_users.iter().filter(|r| **r == row).count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn count_linked_orders(&self, customer_id: &str) -> Result<i64, RepositoryError> {
        self.enter()?;
        let tables = self.tables.lock().unwrap();
        let count = tables.orders.iter().filter(|id| *id == customer_id).count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn delete_customer(&self, row: CustomerRowId) -> Result<u64, RepositoryError> {
        self.enter()?;
        if self.race_on_delete {
            return Err(RepositoryError::Referenced(
                "customer_user_customer_row_fkey".to_owned(),
            ));
        }
        let mut tables = self.tables.lock().unwrap();
        if self.vanish_on_delete {
            tables.customers.retain(|c| c.row != row);
            return Ok(0);
        }
        let before = tables.customers.len();
        tables.customers.retain(|c| c.row != row);
        Ok(u64::try_from(before - tables.customers.len()).unwrap())
    }
}
