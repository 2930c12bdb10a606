//! sea-orm implementations of the directory store capabilities.

use async_trait::async_trait;
use chrono::Utc;
use directory::{Compensation, CompensationStore, Employee, EmployeeStore, StoreError};
use entity::{compensations, employees};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, EntityTrait};
use uuid::Uuid;

use crate::DbPool;

/// Store implementation over the `employees`/`compensations` tables.
///
/// Ids on this backend must be UUID strings: reading anything else is a
/// miss, saving anything else is rejected.
#[derive(Clone)]
pub struct SqlStore {
    pool: DbPool,
}

impl SqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sea_orm::DbErr) -> StoreError {
    StoreError::Backend(anyhow::Error::new(err))
}

fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))
}

fn employee_from_model(model: employees::Model) -> Employee {
    let direct_reports = model
        .direct_reports
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str())
                .map(Employee::dehydrated)
                .collect()
        })
        .unwrap_or_default();
    Employee {
        employee_id: model.id.to_string(),
        first_name: model.first_name,
        last_name: model.last_name,
        position: model.position,
        department: model.department,
        direct_reports,
    }
}

#[async_trait]
impl EmployeeStore for SqlStore {
    async fn read(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let model = employees::Entity::find_by_id(id)
            .one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(model.map(employee_from_model))
    }

    async fn save(&self, employee: Employee) -> Result<Employee, StoreError> {
        let stored = employee.dehydrate();
        let id = parse_id(&stored.employee_id)?;
        let report_ids: Vec<&str> = stored
            .direct_reports
            .iter()
            .map(|report| report.employee_id.as_str())
            .collect();
        let now = Utc::now();
        let model = employees::ActiveModel {
            id: Set(id),
            first_name: Set(stored.first_name.clone()),
            last_name: Set(stored.last_name.clone()),
            position: Set(stored.position.clone()),
            department: Set(stored.department.clone()),
            direct_reports: Set(serde_json::json!(report_ids)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        employees::Entity::insert(model)
            .on_conflict(
                OnConflict::column(employees::Column::Id)
                    .update_columns([
                        employees::Column::FirstName,
                        employees::Column::LastName,
                        employees::Column::Position,
                        employees::Column::Department,
                        employees::Column::DirectReports,
                        employees::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.pool)
            .await
            .map_err(backend)?;
        Ok(stored)
    }
}

#[async_trait]
impl CompensationStore for SqlStore {
    async fn read(&self, employee_id: &str) -> Result<Option<Compensation>, StoreError> {
        let Ok(id) = Uuid::parse_str(employee_id) else {
            return Ok(None);
        };
        let model = compensations::Entity::find_by_id(id)
            .one(&self.pool)
            .await
            .map_err(backend)?;
        model
            .map(|model| {
                let employee = serde_json::from_value(model.employee)
                    .map_err(|err| StoreError::Backend(anyhow::Error::new(err)))?;
                Ok(Compensation {
                    employee,
                    salary: model.salary,
                    effective_date: model.effective_date,
                })
            })
            .transpose()
    }

    async fn save(&self, compensation: Compensation) -> Result<Compensation, StoreError> {
        let id = parse_id(&compensation.employee.employee_id)?;
        let snapshot = serde_json::to_value(&compensation.employee)
            .map_err(|err| StoreError::Backend(anyhow::Error::new(err)))?;
        let model = compensations::ActiveModel {
            employee_id: Set(id),
            employee: Set(snapshot),
            salary: Set(compensation.salary),
            effective_date: Set(compensation.effective_date),
            created_at: Set(Utc::now().into()),
        };
        compensations::Entity::insert(model)
            .on_conflict(
                OnConflict::column(compensations::Column::EmployeeId)
                    .update_columns([
                        compensations::Column::Employee,
                        compensations::Column::Salary,
                        compensations::Column::EffectiveDate,
                    ])
                    .to_owned(),
            )
            .exec(&self.pool)
            .await
            .map_err(backend)?;
        Ok(compensation)
    }
}
