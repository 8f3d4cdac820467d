//! Company domain model.
//!
//! # Responsibility
//! - Define the canonical `Company` record stored in `Company_List`.
//! - Define `CompanyInput`, the validated inbound shape of the same record.
//! - Apply declared column defaults when a record is created.
//!
//! # Invariants
//! - `company_name` is at most `COMPANY_NAME_MAX_LEN` characters.
//! - `enter_user_id` and `enter_date` are always present on a `Company`.
//! - `company_id` is `None` only before the row is first persisted.

use super::date::parse_date_string;
use super::id::{CompanyGroupId, CompanyId};
use super::money::Money;
use crate::schema::{COMPANY_NAME_MAX_LEN, DEFAULT_BASE_RATE, DEFAULT_CURRENCY_ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Single rule violation on a company record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompanyValidationError {
    #[error("companyName must be at most {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a valid ISO 8601 date string, got `{value}`")]
    InvalidDate { field: &'static str, value: String },
    #[error("{0} must be a finite number")]
    NonFiniteNumber(&'static str),
    #[error("malformed company input: {0}")]
    Malformed(String),
}

/// Every rule violated by one input, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<CompanyValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[CompanyValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &CompanyValidationError) -> bool {
        self.0.contains(error)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<CompanyValidationError> for ValidationErrors {
    fn from(value: CompanyValidationError) -> Self {
        Self(vec![value])
    }
}

/// Canonical company / business-partner record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Database-generated key; `None` until persisted.
    pub company_id: Option<CompanyId>,
    pub company_name: Option<String>,
    pub base_rate: Option<Money>,
    pub default_currency_id: Option<i16>,
    /// User who entered the record.
    pub enter_user_id: i32,
    pub enter_date: DateTime<Utc>,
    pub tax_rate: Option<f64>,
    /// Many-to-one join column to the owning company group.
    pub company_group_id: Option<CompanyGroupId>,
}

impl Company {
    /// Creates an unsaved company stamped with the current time.
    ///
    /// # Invariants
    /// - `base_rate` and `default_currency_id` take their declared defaults.
    pub fn new(enter_user_id: i32) -> Self {
        Self::entered_at(enter_user_id, Utc::now())
    }

    /// Creates an unsaved company with an explicit entry timestamp.
    pub fn entered_at(enter_user_id: i32, enter_date: DateTime<Utc>) -> Self {
        Self {
            company_id: None,
            company_name: None,
            base_rate: Some(Money::from_minor_units(DEFAULT_BASE_RATE)),
            default_currency_id: Some(DEFAULT_CURRENCY_ID),
            enter_user_id,
            enter_date,
            tax_rate: None,
            company_group_id: None,
        }
    }

    /// Validates field-level rules.
    pub fn validate(&self) -> Result<(), CompanyValidationError> {
        if let Some(name) = &self.company_name {
            check_name_length(name)?;
        }
        if let Some(tax_rate) = self.tax_rate {
            if !tax_rate.is_finite() {
                return Err(CompanyValidationError::NonFiniteNumber("taxRate"));
            }
        }
        Ok(())
    }
}

/// Inbound company payload with every field optional.
///
/// This is the validated counterpart of `Company`: required fields are
/// checked here rather than by the type system, so callers get every
/// violation at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyInput {
    pub company_id: Option<i16>,
    pub company_name: Option<String>,
    pub base_rate: Option<Money>,
    pub default_currency_id: Option<i16>,
    pub enter_user_id: Option<i32>,
    /// ISO 8601 date string.
    pub enter_date: Option<String>,
    pub tax_rate: Option<f64>,
    pub company_group_id: Option<i32>,
}

impl CompanyInput {
    /// Parses a JSON document; wrong field types are reported as violations.
    pub fn from_json(text: &str) -> Result<Self, ValidationErrors> {
        serde_json::from_str(text)
            .map_err(|err| CompanyValidationError::Malformed(err.to_string()).into())
    }

    /// Checks every declared rule and collects all violations.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if let Some(name) = &self.company_name {
            if let Err(err) = check_name_length(name) {
                errors.push(err);
            }
        }
        if self.enter_user_id.is_none() {
            errors.push(CompanyValidationError::MissingField("enterUserId"));
        }
        match &self.enter_date {
            None => errors.push(CompanyValidationError::MissingField("enterDate")),
            Some(value) if parse_date_string(value).is_none() => {
                errors.push(CompanyValidationError::InvalidDate {
                    field: "enterDate",
                    value: value.clone(),
                });
            }
            Some(_) => {}
        }
        if matches!(self.tax_rate, Some(rate) if !rate.is_finite()) {
            errors.push(CompanyValidationError::NonFiniteNumber("taxRate"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Validates and converts into a `Company`, filling declared defaults
    /// for `baseRate` and `defaultCurrencyId`.
    pub fn into_company(self) -> Result<Company, ValidationErrors> {
        self.validate()?;

        let enter_user_id = self
            .enter_user_id
            .ok_or(CompanyValidationError::MissingField("enterUserId"))?;
        let enter_date = self
            .enter_date
            .as_deref()
            .and_then(parse_date_string)
            .ok_or(CompanyValidationError::MissingField("enterDate"))?;

        let mut company = Company::entered_at(enter_user_id, enter_date);
        company.company_id = self.company_id.map(CompanyId::new);
        company.company_name = self.company_name;
        if let Some(base_rate) = self.base_rate {
            company.base_rate = Some(base_rate);
        }
        if let Some(currency) = self.default_currency_id {
            company.default_currency_id = Some(currency);
        }
        company.tax_rate = self.tax_rate;
        company.company_group_id = self.company_group_id.map(CompanyGroupId::new);
        Ok(company)
    }
}

fn check_name_length(name: &str) -> Result<(), CompanyValidationError> {
    let actual = name.chars().count();
    if actual > COMPANY_NAME_MAX_LEN {
        return Err(CompanyValidationError::NameTooLong {
            max: COMPANY_NAME_MAX_LEN,
            actual,
        });
    }
    Ok(())
}
