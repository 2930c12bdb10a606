//! Persistence capabilities the directory depends on.
//!
//! The builder and the HTTP handlers only ever see these traits; the
//! SQL-backed implementation lives in `platform-db`, and [`MemoryStore`]
//! serves tests and database-less runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Compensation, Employee};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid employee id: {0}")]
    InvalidId(String),
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Key-value persistence for employee records.
///
/// `read` returns a private snapshot with dehydrated reports; callers may
/// mutate it freely without affecting the canonical copy. `save` persists
/// the record dehydrated and echoes the stored shape back.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn read(&self, id: &str) -> Result<Option<Employee>, StoreError>;
    async fn save(&self, employee: Employee) -> Result<Employee, StoreError>;
}

/// Passthrough persistence for compensation records, keyed by employee id.
#[async_trait]
pub trait CompensationStore: Send + Sync {
    async fn read(&self, employee_id: &str) -> Result<Option<Compensation>, StoreError>;
    async fn save(&self, compensation: Compensation) -> Result<Compensation, StoreError>;
}

/// In-memory store double. Accepts arbitrary id strings, unlike the SQL
/// store which requires UUIDs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    compensations: RwLock<HashMap<String, Compensation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn read(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let employees = self
            .employees
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("employee map poisoned")))?;
        Ok(employees.get(id).cloned())
    }

    async fn save(&self, employee: Employee) -> Result<Employee, StoreError> {
        let stored = employee.dehydrate();
        let mut employees = self
            .employees
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("employee map poisoned")))?;
        employees.insert(stored.employee_id.clone(), stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl CompensationStore for MemoryStore {
    async fn read(&self, employee_id: &str) -> Result<Option<Compensation>, StoreError> {
        let compensations = self
            .compensations
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("compensation map poisoned")))?;
        Ok(compensations.get(employee_id).cloned())
    }

    async fn save(&self, compensation: Compensation) -> Result<Compensation, StoreError> {
        let mut compensations = self
            .compensations
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("compensation map poisoned")))?;
        compensations.insert(compensation.employee.employee_id.clone(), compensation.clone());
        Ok(compensation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn save_dehydrates_direct_reports() {
        let store = MemoryStore::new();
        let report = Employee {
            employee_id: "r-1".into(),
            first_name: Some("Report".into()),
            ..Employee::default()
        };
        let manager = Employee {
            employee_id: "m-1".into(),
            first_name: Some("Manager".into()),
            direct_reports: vec![report],
            ..Employee::default()
        };

        let saved = EmployeeStore::save(&store, manager).await.unwrap();
        assert_eq!(saved.direct_reports, vec![Employee::dehydrated("r-1")]);

        let read = EmployeeStore::read(&store, "m-1").await.unwrap().unwrap();
        assert_eq!(read, saved);
        assert_eq!(read.first_name.as_deref(), Some("Manager"));
    }

    #[tokio::test]
    async fn read_returns_none_for_unknown_id() {
        let store = MemoryStore::new();
        assert!(EmployeeStore::read(&store, "missing").await.unwrap().is_none());
        assert!(CompensationStore::read(&store, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn compensation_roundtrip_keeps_snapshot() {
        let store = MemoryStore::new();
        let compensation = Compensation {
            employee: Employee {
                employee_id: "e-9".into(),
                position: Some("CTO".into()),
                ..Employee::default()
            },
            salary: 175_000,
            effective_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        CompensationStore::save(&store, compensation.clone())
            .await
            .unwrap();
        let read = CompensationStore::read(&store, "e-9").await.unwrap().unwrap();
        assert_eq!(read, compensation);
    }
}
