//! Company use-case service.
//!
//! # Responsibility
//! - Turn validated `CompanyInput` payloads into persisted companies.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Inputs are validated in full before any repository call.
//! - Service layer remains storage-agnostic.

use crate::model::company::{Company, CompanyInput, ValidationErrors};
use crate::model::id::CompanyId;
use crate::repo::company_repo::{CompanyListQuery, CompanyRepository, RepoError};
use log::warn;
use thiserror::Error;

/// Service error for company use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input violated one or more declared rules.
    #[error("company input rejected: {0}")]
    Validation(#[from] ValidationErrors),
    /// Persistence-layer failure.
    #[error(transparent)]
    Repo(#[from] RepoError),
    /// Internal consistency mismatch between write and read-back.
    #[error("inconsistent company state: {0}")]
    InconsistentState(&'static str),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case facade over a company repository.
pub struct CompanyService<R: CompanyRepository> {
    repo: R,
}

impl<R: CompanyRepository> CompanyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates an input payload, applies defaults and persists it.
    ///
    /// # Contract
    /// - Every violated rule is reported together in `ServiceError::Validation`.
    /// - Returns the stored record as read back from the repository.
    pub fn register(&self, input: CompanyInput) -> ServiceResult<Company> {
        let company = input.into_company().map_err(|errors| {
            warn!(
                "event=company_register module=service status=error error_code=validation_failed violations={}",
                errors.errors().len()
            );
            errors
        })?;

        let id = self.repo.create_company(&company)?;
        self.repo
            .get_company(id)?
            .ok_or(ServiceError::InconsistentState(
                "registered company not found in read-back",
            ))
    }

    /// Replaces a stored company with the given field values.
    pub fn update(&self, company: &Company) -> ServiceResult<Company> {
        self.repo.update_company(company)?;
        let id = company.company_id.ok_or(RepoError::MissingId)?;
        self.repo
            .get_company(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated company not found in read-back",
            ))
    }

    pub fn get(&self, id: CompanyId) -> ServiceResult<Option<Company>> {
        Ok(self.repo.get_company(id)?)
    }

    pub fn list(&self, query: &CompanyListQuery) -> ServiceResult<Vec<Company>> {
        Ok(self.repo.list_companies(query)?)
    }

    /// Deletes a company; missing ids surface as `RepoError::NotFound`.
    pub fn remove(&self, id: CompanyId) -> ServiceResult<()> {
        Ok(self.repo.delete_company(id)?)
    }
}
