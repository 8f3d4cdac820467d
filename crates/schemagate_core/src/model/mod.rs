//! Domain model for the company entity.
//!
//! # Responsibility
//! - Define the company record and its inbound validated shape.
//! - Provide the value types its columns need (money, ids, dates).
//!
//! # Invariants
//! - Field constraints come from the `schema` mapping, never duplicated literals.

pub mod company;
pub mod date;
pub mod id;
pub mod money;
