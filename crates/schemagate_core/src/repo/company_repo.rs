//! Company repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `Company_List` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Company::validate()` before SQL mutations.
//! - `CompanyId` uniqueness is enforced by storage and surfaced as
//!   `RepoError::DuplicateId`.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::company::{Company, CompanyValidationError};
use crate::model::date::{format_date_string, parse_date_string};
use crate::model::id::{CompanyGroupId, CompanyId};
use crate::model::money::Money;
use crate::schema::company_schema;
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, Row};
use thiserror::Error;

const COMPANY_SELECT_SQL: &str = "SELECT
    CompanyId,
    CompanyName,
    BaseRate,
    DefaultCurrencyId,
    EnterUserId,
    EnterDate,
    TaxRate,
    CompanyGroupId
FROM Company_List";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for company persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] CompanyValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("company not found: {0}")]
    NotFound(CompanyId),
    #[error("company id already exists: {0}")]
    DuplicateId(CompanyId),
    #[error("company has not been persisted yet (companyId is unset)")]
    MissingId,
    #[error("no free smallint value left for a generated companyId")]
    IdSpaceExhausted,
    #[error("invalid persisted company data: {0}")]
    InvalidData(String),
    #[error(
        "connection is not initialized (expected schema version {expected_version}, got {actual_version})"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table is missing: {0}")]
    MissingRequiredTable(&'static str),
    #[error("required column is missing: {table}.{column}")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing companies.
#[derive(Debug, Clone, Default)]
pub struct CompanyListQuery {
    pub company_group_id: Option<CompanyGroupId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for company CRUD operations.
pub trait CompanyRepository {
    fn create_company(&self, company: &Company) -> RepoResult<CompanyId>;
    fn update_company(&self, company: &Company) -> RepoResult<()>;
    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>>;
    fn list_companies(&self, query: &CompanyListQuery) -> RepoResult<Vec<Company>>;
    fn delete_company(&self, id: CompanyId) -> RepoResult<()>;
}

/// SQLite-backed company repository.
pub struct SqliteCompanyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompanyRepository<'conn> {
    /// Wraps a connection after checking it carries the migrated schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when storage does
    ///   not match the `Company` mapping.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_company_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CompanyRepository for SqliteCompanyRepository<'_> {
    fn create_company(&self, company: &Company) -> RepoResult<CompanyId> {
        company.validate()?;

        let inserted = self.conn.query_row(
            "INSERT INTO Company_List (
                CompanyId,
                CompanyName,
                BaseRate,
                DefaultCurrencyId,
                EnterUserId,
                EnterDate,
                TaxRate,
                CompanyGroupId
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING CompanyId;",
            params![
                company.company_id.map(CompanyId::get),
                company.company_name.as_deref(),
                company.base_rate.map(Money::minor_units),
                company.default_currency_id,
                company.enter_user_id,
                format_date_string(&company.enter_date),
                company.tax_rate,
                company.company_group_id.map(CompanyGroupId::get),
            ],
            |row| row.get::<_, i16>(0),
        );

        let id = match inserted {
            Ok(id) => CompanyId::new(id),
            Err(err) => {
                return Err(match (company.company_id, constraint_kind(&err)) {
                    (Some(id), Some(Constraint::Key)) => RepoError::DuplicateId(id),
                    // Next rowid left the smallint CHECK range.
                    (None, Some(Constraint::Check)) => RepoError::IdSpaceExhausted,
                    _ => err.into(),
                });
            }
        };

        info!("event=company_create module=repo status=ok company_id={id}");
        Ok(id)
    }

    fn update_company(&self, company: &Company) -> RepoResult<()> {
        let id = company.company_id.ok_or(RepoError::MissingId)?;
        company.validate()?;

        let changed = self.conn.execute(
            "UPDATE Company_List
             SET
                CompanyName = ?1,
                BaseRate = ?2,
                DefaultCurrencyId = ?3,
                EnterUserId = ?4,
                EnterDate = ?5,
                TaxRate = ?6,
                CompanyGroupId = ?7
             WHERE CompanyId = ?8;",
            params![
                company.company_name.as_deref(),
                company.base_rate.map(Money::minor_units),
                company.default_currency_id,
                company.enter_user_id,
                format_date_string(&company.enter_date),
                company.tax_rate,
                company.company_group_id.map(CompanyGroupId::get),
                id.get(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=company_update module=repo status=ok company_id={id}");
        Ok(())
    }

    fn get_company(&self, id: CompanyId) -> RepoResult<Option<Company>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPANY_SELECT_SQL} WHERE CompanyId = ?1;"))?;

        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_company_row(row)?));
        }

        Ok(None)
    }

    fn list_companies(&self, query: &CompanyListQuery) -> RepoResult<Vec<Company>> {
        let mut sql = format!("{COMPANY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(group) = query.company_group_id {
            sql.push_str(" AND CompanyGroupId = ?");
            bind_values.push(Value::Integer(i64::from(group.get())));
        }

        sql.push_str(" ORDER BY CompanyId ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut companies = Vec::new();

        while let Some(row) = rows.next()? {
            companies.push(parse_company_row(row)?);
        }

        debug!(
            "event=company_list module=repo status=ok count={}",
            companies.len()
        );
        Ok(companies)
    }

    fn delete_company(&self, id: CompanyId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM Company_List WHERE CompanyId = ?1;", [id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        info!("event=company_delete module=repo status=ok company_id={id}");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Key,
    Check,
}

fn constraint_kind(err: &rusqlite::Error) -> Option<Constraint> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }
    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => Some(Constraint::Key),
        ffi::SQLITE_CONSTRAINT_CHECK => Some(Constraint::Check),
        _ => None,
    }
}

fn parse_company_row(row: &Row<'_>) -> RepoResult<Company> {
    let company_id: i16 = row.get("CompanyId")?;

    let enter_date_text: String = row.get("EnterDate")?;
    let enter_date = parse_date_string(&enter_date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{enter_date_text}` in Company_List.EnterDate"
        ))
    })?;

    let company = Company {
        company_id: Some(CompanyId::new(company_id)),
        company_name: row.get("CompanyName")?,
        base_rate: row
            .get::<_, Option<i64>>("BaseRate")?
            .map(Money::from_minor_units),
        default_currency_id: row.get("DefaultCurrencyId")?,
        enter_user_id: row.get("EnterUserId")?,
        enter_date,
        tax_rate: row.get("TaxRate")?,
        company_group_id: row
            .get::<_, Option<i32>>("CompanyGroupId")?
            .map(CompanyGroupId::new),
    };
    company.validate()?;
    Ok(company)
}

fn ensure_company_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let schema = company_schema();
    if !table_exists(conn, schema.table)? {
        return Err(RepoError::MissingRequiredTable(schema.table));
    }

    let present = table_columns(conn, schema.table)?;
    for column in schema.storage_columns() {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: schema.table,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
