//! Mapping of the `Company` entity onto `dbo.Company_List`.

use super::column::{ColumnDef, ColumnDefault, ColumnType};
use super::{EntitySchema, IndexDef, JoinColumnDef, RelationDef, RelationKind};

/// Maximum length of `companyName`.
pub const COMPANY_NAME_MAX_LEN: usize = 60;
/// Declared default of `baseRate`.
pub const DEFAULT_BASE_RATE: i64 = 0;
/// Declared default of `defaultCurrencyId`.
pub const DEFAULT_CURRENCY_ID: i16 = 1;

const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        property: "companyId",
        column: "CompanyId",
        sql_type: "smallint",
        column_type: ColumnType::Number,
        nullable: false,
        length: None,
        precision: None,
        default: None,
        primary: true,
        generated: true,
    },
    ColumnDef {
        property: "companyName",
        column: "CompanyName",
        sql_type: "varchar",
        column_type: ColumnType::String,
        nullable: true,
        length: Some(COMPANY_NAME_MAX_LEN as u32),
        precision: None,
        default: None,
        primary: false,
        generated: false,
    },
    ColumnDef {
        property: "baseRate",
        column: "BaseRate",
        sql_type: "money",
        column_type: ColumnType::Number,
        nullable: true,
        length: None,
        precision: None,
        default: Some(ColumnDefault::Literal("0")),
        primary: false,
        generated: false,
    },
    ColumnDef {
        property: "defaultCurrencyId",
        column: "DefaultCurrencyId",
        sql_type: "smallint",
        column_type: ColumnType::Number,
        nullable: true,
        length: None,
        precision: None,
        default: Some(ColumnDefault::Literal("1")),
        primary: false,
        generated: false,
    },
    ColumnDef {
        property: "enterUserId",
        column: "EnterUserId",
        sql_type: "int",
        column_type: ColumnType::Number,
        nullable: false,
        length: None,
        precision: None,
        default: None,
        primary: false,
        generated: false,
    },
    ColumnDef {
        property: "enterDate",
        column: "EnterDate",
        sql_type: "datetime",
        column_type: ColumnType::Date,
        nullable: false,
        length: None,
        precision: None,
        default: Some(ColumnDefault::CurrentTimestamp),
        primary: false,
        generated: false,
    },
    ColumnDef {
        property: "taxRate",
        column: "TaxRate",
        sql_type: "float",
        column_type: ColumnType::Number,
        nullable: true,
        length: None,
        precision: Some(53),
        default: None,
        primary: false,
        generated: false,
    },
];

const INDEXES: &[IndexDef] = &[IndexDef {
    name: "PK_Locations",
    properties: &["companyId"],
    unique: true,
}];

const RELATIONS: &[RelationDef] = &[
    RelationDef {
        kind: RelationKind::ManyToOne,
        property: "companyGroup",
        target: "CompanyGroups",
        inverse: "companies",
        join_column: Some(JoinColumnDef {
            name: "CompanyGroupId",
            referenced_property: "companyGroupId",
        }),
    },
    RelationDef {
        kind: RelationKind::OneToMany,
        property: "externalSupplyCompanys",
        target: "ExternalSupplyCompany",
        inverse: "company",
        join_column: None,
    },
    RelationDef {
        kind: RelationKind::OneToMany,
        property: "quoteSummarys",
        target: "QuoteSummary",
        inverse: "company",
        join_column: None,
    },
];

static COMPANY_SCHEMA: EntitySchema = EntitySchema {
    entity: "Company",
    table: "Company_List",
    schema: Some("dbo"),
    columns: COLUMNS,
    indexes: INDEXES,
    relations: RELATIONS,
};

/// Returns the mapping of `Company` to `dbo.Company_List`.
pub fn company_schema() -> &'static EntitySchema {
    &COMPANY_SCHEMA
}
