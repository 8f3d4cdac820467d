//! Static entity-to-table mapping metadata.
//!
//! # Responsibility
//! - Describe the columns, indexes and relations an entity maps onto.
//! - Derive per-column validation rules from declared column metadata.
//! - Render the SQLite table definition used by local storage.
//!
//! # Invariants
//! - Column order matches declaration order on the entity.
//! - Every index references properties that exist in `columns`.
//! - Only many-to-one relations own a join column on this table.

mod column;
mod company;
mod ddl;

pub use column::{ColumnDef, ColumnDefault, ColumnType, ValidationRule};
pub use company::{company_schema, COMPANY_NAME_MAX_LEN, DEFAULT_BASE_RATE, DEFAULT_CURRENCY_ID};
pub use ddl::render_sqlite_ddl;

/// Kind of ORM association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    ManyToOne,
    OneToMany,
    OneToOne,
    ManyToMany,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        Self::ManyToOne,
        Self::OneToMany,
        Self::OneToOne,
        Self::ManyToMany,
    ];

    /// TypeORM decorator name for this association.
    pub fn decorator_name(self) -> &'static str {
        match self {
            Self::ManyToOne => "ManyToOne",
            Self::OneToMany => "OneToMany",
            Self::OneToOne => "OneToOne",
            Self::ManyToMany => "ManyToMany",
        }
    }
}

/// Foreign-key column owned by the declaring side of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinColumnDef {
    /// Column name on this table.
    pub name: &'static str,
    /// Property on the target entity the column points at.
    pub referenced_property: &'static str,
}

/// Association to another entity, resolved by the ORM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    pub kind: RelationKind,
    pub property: &'static str,
    pub target: &'static str,
    /// Property on the target pointing back at this entity.
    pub inverse: &'static str,
    pub join_column: Option<JoinColumnDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub properties: &'static [&'static str],
    pub unique: bool,
}

/// Complete mapping of one entity onto one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub table: &'static str,
    pub schema: Option<&'static str>,
    pub columns: &'static [ColumnDef],
    pub indexes: &'static [IndexDef],
    pub relations: &'static [RelationDef],
}

impl EntitySchema {
    /// Looks up a column by entity property name.
    pub fn column(&self, property: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|column| column.property == property)
    }

    /// Returns the primary key column, if declared.
    pub fn primary_key(&self) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|column| column.primary)
    }

    /// `schema.table`, or the bare table name when no schema is declared.
    pub fn qualified_table(&self) -> String {
        match self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.to_string(),
        }
    }

    /// Join columns owned by this table.
    pub fn join_columns(&self) -> impl Iterator<Item = &'static JoinColumnDef> {
        self.relations
            .iter()
            .filter_map(|relation| relation.join_column.as_ref())
    }

    /// Every physical column name stored on the table, mapped columns first.
    pub fn storage_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .map(|column| column.column)
            .chain(self.join_columns().map(|join| join.name))
            .collect()
    }
}
