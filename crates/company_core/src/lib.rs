//! Department and employee records over an embedded document store.
//! This crate owns the record schema, its validation rules and the
//! repositories that persist and query records.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{ConfigError, LogConfig, StoreConfig, StoreTarget};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{validate_department_document, Department, NewDepartment};
pub use model::employee::{
    validate_employee_document, Employee, EmployeeChanges, EmployeeFilter, EmployeeRows,
    NewEmployee, Populate, PopulatedEmployee,
};
pub use model::id::{RecordId, RecordIdError};
pub use model::validation::{FieldError, ValidationError};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::{RepoError, RepoResult};
pub use store::{Store, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
