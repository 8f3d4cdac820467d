//! Column-level metadata and the validation rules derived from it.

use std::fmt::{Display, Formatter};

/// Semantic type of an entity property, as declared in TypeScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
    /// Binary or otherwise unvalidated payloads (`Buffer`).
    Other,
}

impl ColumnType {
    /// Maps a TypeScript type name to its column type.
    ///
    /// Returns `None` for types the annotator does not understand.
    pub fn from_ts_type(name: &str) -> Option<Self> {
        match name.trim() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "Date" => Some(Self::Date),
            "boolean" => Some(Self::Boolean),
            "Buffer" => Some(Self::Other),
            _ => None,
        }
    }

    /// Type-check rule attached to every column of this type.
    pub fn type_rule(self) -> Option<ValidationRule> {
        match self {
            Self::String => Some(ValidationRule::IsString),
            Self::Number => Some(ValidationRule::IsNumber),
            Self::Date => Some(ValidationRule::IsDateString),
            Self::Boolean => Some(ValidationRule::IsBoolean),
            Self::Other => None,
        }
    }
}

/// Declarative field rule, named after its class-validator decorator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    IsOptional,
    IsString,
    MaxLength(u32),
    IsNumber,
    IsDateString,
    IsBoolean,
}

impl ValidationRule {
    /// Decorator function name as exported by `class-validator`.
    pub fn decorator_name(self) -> &'static str {
        match self {
            Self::IsOptional => "IsOptional",
            Self::IsString => "IsString",
            Self::MaxLength(_) => "MaxLength",
            Self::IsNumber => "IsNumber",
            Self::IsDateString => "IsDateString",
            Self::IsBoolean => "IsBoolean",
        }
    }
}

/// Renders the rule as a decorator, e.g. `@MaxLength(60)`.
impl Display for ValidationRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxLength(length) => write!(f, "@MaxLength({length})"),
            other => write!(f, "@{}()", other.decorator_name()),
        }
    }
}

/// Database-side default of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// Literal SQL value, e.g. `0`.
    Literal(&'static str),
    /// Current timestamp supplied by the database at insert time.
    CurrentTimestamp,
}

/// One mapped column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Property name on the entity (`companyName`).
    pub property: &'static str,
    /// Column name in the table (`CompanyName`).
    pub column: &'static str,
    /// Declared SQL Server type (`varchar`, `money`, ...).
    pub sql_type: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    /// Maximum character length for string columns.
    pub length: Option<u32>,
    /// Binary precision for floating point columns.
    pub precision: Option<u32>,
    pub default: Option<ColumnDefault>,
    pub primary: bool,
    /// Value is assigned by the database on insert.
    pub generated: bool,
}

impl ColumnDef {
    /// Validation rules in the order the annotator emits them.
    pub fn rules(&self) -> Vec<ValidationRule> {
        let mut rules = Vec::with_capacity(3);
        if self.nullable {
            rules.push(ValidationRule::IsOptional);
        }
        if let Some(rule) = self.column_type.type_rule() {
            rules.push(rule);
        }
        if self.column_type == ColumnType::String {
            if let Some(length) = self.length {
                rules.push(ValidationRule::MaxLength(length));
            }
        }
        rules
    }

    /// Returns whether inserts may omit this column.
    pub fn has_default(&self) -> bool {
        self.default.is_some() || self.generated || self.nullable
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnType, ValidationRule};

    #[test]
    fn maps_known_typescript_types() {
        assert_eq!(ColumnType::from_ts_type("string"), Some(ColumnType::String));
        assert_eq!(ColumnType::from_ts_type(" Date "), Some(ColumnType::Date));
        assert_eq!(ColumnType::from_ts_type("Buffer"), Some(ColumnType::Other));
        assert_eq!(ColumnType::from_ts_type("bigint"), None);
    }

    #[test]
    fn rules_render_as_decorators() {
        assert_eq!(ValidationRule::IsOptional.to_string(), "@IsOptional()");
        assert_eq!(ValidationRule::MaxLength(60).to_string(), "@MaxLength(60)");
        assert_eq!(ColumnType::Other.type_rule(), None);
    }
}
