//! Employee directory domain.
//!
//! Persistence is abstracted behind the [`store`] capability traits so the
//! reporting-structure builder and the HTTP surface can run against either
//! the SQL-backed store or the in-memory one.

mod error;
pub mod model;
pub mod reporting;
pub mod store;

pub use error::DirectoryError;
pub use model::{Compensation, Employee, ReportingStructure};
pub use reporting::ReportingStructureBuilder;
pub use store::{CompensationStore, EmployeeStore, MemoryStore, StoreError};
