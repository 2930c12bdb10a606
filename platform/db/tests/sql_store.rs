use std::sync::Arc;

use chrono::NaiveDate;
use directory::{
    Compensation, CompensationStore, Employee, EmployeeStore, ReportingStructureBuilder,
    StoreError,
};
use platform_db::SqlStore;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use uuid::Uuid;

async fn sqlite_store() -> SqlStore {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    bootstrap_sqlite(&conn).await;
    SqlStore::new(conn)
}

async fn bootstrap_sqlite(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE employees (
            id TEXT PRIMARY KEY,
            first_name TEXT,
            last_name TEXT,
            position TEXT,
            department TEXT,
            direct_reports TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE compensations (
            employee_id TEXT PRIMARY KEY,
            employee TEXT NOT NULL,
            salary INTEGER NOT NULL,
            effective_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ))
    .await
    .unwrap();
}

fn employee(id: Uuid, first_name: &str, reports: &[Uuid]) -> Employee {
    Employee {
        employee_id: id.to_string(),
        first_name: Some(first_name.into()),
        last_name: Some("Doe".into()),
        position: Some("Developer".into()),
        department: Some("Engineering".into()),
        direct_reports: reports
            .iter()
            .map(|id| Employee::dehydrated(id.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn employee_save_and_read_roundtrip() {
    let store = sqlite_store().await;
    let report_id = Uuid::new_v4();
    let id = Uuid::new_v4();

    let saved = EmployeeStore::save(&store, employee(id, "Ada", &[report_id]))
        .await
        .unwrap();
    assert_eq!(
        saved.direct_reports,
        vec![Employee::dehydrated(report_id.to_string())]
    );

    let read = EmployeeStore::read(&store, &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, saved);
}

#[tokio::test]
async fn second_save_replaces_the_record() {
    let store = sqlite_store().await;
    let id = Uuid::new_v4();
    EmployeeStore::save(&store, employee(id, "Before", &[]))
        .await
        .unwrap();

    let mut updated = employee(id, "After", &[]);
    updated.position = Some("Manager".into());
    EmployeeStore::save(&store, updated).await.unwrap();

    let read = EmployeeStore::read(&store, &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.first_name.as_deref(), Some("After"));
    assert_eq!(read.position.as_deref(), Some("Manager"));
}

#[tokio::test]
async fn non_uuid_ids_miss_on_read_and_fail_on_save() {
    let store = sqlite_store().await;
    assert!(EmployeeStore::read(&store, "not-a-uuid")
        .await
        .unwrap()
        .is_none());

    let err = EmployeeStore::save(&store, Employee::dehydrated("not-a-uuid"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidId(_)));
}

#[tokio::test]
async fn reporting_structure_builds_over_sql_store() {
    let store = sqlite_store().await;
    let bottom = Uuid::new_v4();
    let middle = Uuid::new_v4();
    let top = Uuid::new_v4();
    for record in [
        employee(bottom, "Bottom", &[]),
        employee(middle, "Middle", &[bottom]),
        employee(top, "Top", &[middle]),
    ] {
        EmployeeStore::save(&store, record).await.unwrap();
    }

    let builder = ReportingStructureBuilder::new(Arc::new(store));
    let structure = builder.build(&top.to_string()).await.unwrap();
    assert_eq!(structure.number_of_reports, 2);
    let hydrated_middle = &structure.employee.direct_reports[0];
    assert_eq!(hydrated_middle.first_name.as_deref(), Some("Middle"));
    assert_eq!(
        hydrated_middle.direct_reports[0].employee_id,
        bottom.to_string()
    );
}

#[tokio::test]
async fn compensation_roundtrip_and_overwrite() {
    let store = sqlite_store().await;
    let id = Uuid::new_v4();
    let snapshot = employee(id, "Paid", &[]);
    let compensation = Compensation {
        employee: snapshot.clone(),
        salary: 120_000,
        effective_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
    };
    CompensationStore::save(&store, compensation.clone())
        .await
        .unwrap();

    let read = CompensationStore::read(&store, &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, compensation);

    let raise = Compensation {
        salary: 130_000,
        ..compensation
    };
    CompensationStore::save(&store, raise.clone()).await.unwrap();
    let read = CompensationStore::read(&store, &id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.salary, 130_000);
}
