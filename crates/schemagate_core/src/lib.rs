//! Core domain logic for SchemaGate.
//!
//! Holds the `Company` entity mapping for `dbo.Company_List`, its validation
//! rules, SQLite-backed persistence, and the TypeORM entity annotator that
//! derives class-validator decorators from the same column metadata.

pub mod annotate;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;
pub mod service;

pub use annotate::{annotate_entity, annotate_file, AnnotateError, AnnotateOptions};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::company::{Company, CompanyInput, CompanyValidationError, ValidationErrors};
pub use model::date::{format_date_string, parse_date_string};
pub use model::id::{CompanyGroupId, CompanyId};
pub use model::money::Money;
pub use repo::company_repo::{
    CompanyListQuery, CompanyRepository, RepoError, RepoResult, SqliteCompanyRepository,
};
pub use schema::{company_schema, render_sqlite_ddl, EntitySchema};
pub use service::company_service::{CompanyService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
