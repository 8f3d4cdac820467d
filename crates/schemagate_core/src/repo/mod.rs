//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Company::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to DB transport errors.

pub mod company_repo;
