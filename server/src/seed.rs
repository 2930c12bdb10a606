//! Demo organization fixtures.
//!
//! The same five-person org the project's sample dataset ships with; useful
//! for local runs and exercised by the integration tests.

use directory::{Employee, EmployeeStore, StoreError};
use tracing::info;

pub const LENNON_ID: &str = "16a596ae-edd3-4847-99fe-c4518e82c86f";
pub const MCCARTNEY_ID: &str = "b7839309-3348-463b-a7e3-5de1c168beb3";
pub const STARR_ID: &str = "03aa1462-ffa9-4978-901b-7c001562cf6f";
pub const BEST_ID: &str = "62c1084e-6e34-4630-93fd-9153afb65309";
pub const HARRISON_ID: &str = "c0c2293d-16bd-4603-8e08-638a9d18b22c";

fn employee(id: &str, first: &str, last: &str, position: &str, reports: &[&str]) -> Employee {
    Employee {
        employee_id: id.into(),
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        position: Some(position.into()),
        department: Some("Engineering".into()),
        direct_reports: reports
            .iter()
            .map(|id| Employee::dehydrated(*id))
            .collect(),
    }
}

/// Store the demo org: Lennon manages McCartney and Starr; Starr manages
/// Best and Harrison.
pub async fn seed_demo_org(store: &dyn EmployeeStore) -> Result<(), StoreError> {
    let org = [
        employee(
            LENNON_ID,
            "John",
            "Lennon",
            "Development Manager",
            &[MCCARTNEY_ID, STARR_ID],
        ),
        employee(MCCARTNEY_ID, "Paul", "McCartney", "Developer I", &[]),
        employee(STARR_ID, "Ringo", "Starr", "Developer V", &[BEST_ID, HARRISON_ID]),
        employee(BEST_ID, "Pete", "Best", "Developer II", &[]),
        employee(HARRISON_ID, "George", "Harrison", "Developer III", &[]),
    ];
    let count = org.len();
    for record in org {
        store.save(record).await?;
    }
    info!(count, "seeded demo organization");
    Ok(())
}
