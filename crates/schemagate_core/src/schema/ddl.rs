//! SQLite DDL rendering for an entity mapping.
//!
//! SQLite has no schemas, so the table is created under its bare name and
//! the declared schema is carried in a leading comment only.

use super::column::{ColumnDef, ColumnDefault};
use super::EntitySchema;

const SMALLINT_RANGE: (i32, i32) = (i16::MIN as i32, i16::MAX as i32);
/// Same text layout as `format_date_string`.
const SQLITE_NOW_EXPR: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Renders `CREATE TABLE` plus one `CREATE INDEX` per declared index.
pub fn render_sqlite_ddl(schema: &EntitySchema) -> String {
    let mut definitions: Vec<String> = schema.columns.iter().map(render_column).collect();
    definitions.extend(
        schema
            .join_columns()
            .map(|join| format!("{} INTEGER NULL", join.name)),
    );

    let mut ddl = format!(
        "-- {}\nCREATE TABLE IF NOT EXISTS {} (\n    {}\n);\n",
        schema.qualified_table(),
        schema.table,
        definitions.join(",\n    ")
    );

    for index in schema.indexes {
        let columns: Vec<&str> = index
            .properties
            .iter()
            .filter_map(|property| schema.column(property).map(|column| column.column))
            .collect();
        ddl.push_str(&format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({});\n",
            if index.unique { "UNIQUE " } else { "" },
            index.name,
            schema.table,
            columns.join(", ")
        ));
    }

    ddl
}

fn render_column(column: &ColumnDef) -> String {
    let mut parts = vec![column.column.to_string(), sqlite_affinity(column.sql_type).to_string()];

    if column.primary {
        parts.push("PRIMARY KEY".to_string());
    } else if column.nullable {
        parts.push("NULL".to_string());
    } else {
        parts.push("NOT NULL".to_string());
    }

    match column.default {
        Some(ColumnDefault::Literal(value)) => parts.push(format!("DEFAULT {value}")),
        Some(ColumnDefault::CurrentTimestamp) => parts.push(format!("DEFAULT ({SQLITE_NOW_EXPR})")),
        None => {}
    }

    if column.sql_type == "smallint" {
        parts.push(format!(
            "CHECK ({} IS NULL OR {} BETWEEN {} AND {})",
            column.column, column.column, SMALLINT_RANGE.0, SMALLINT_RANGE.1
        ));
    }
    if let Some(length) = column.length {
        parts.push(format!(
            "CHECK ({} IS NULL OR length({}) <= {length})",
            column.column, column.column
        ));
    }

    parts.join(" ")
}

/// `money` is stored as an integer count of ten-thousandths.
fn sqlite_affinity(sql_type: &str) -> &'static str {
    match sql_type {
        "varchar" | "nvarchar" | "char" | "nchar" | "text" | "datetime" | "date" => "TEXT",
        "float" | "real" => "REAL",
        "varbinary" | "binary" | "image" => "BLOB",
        _ => "INTEGER",
    }
}

#[cfg(test)]
mod tests {
    use super::render_sqlite_ddl;
    use crate::schema::company_schema;

    #[test]
    fn renders_company_list_table_and_unique_index() {
        let ddl = render_sqlite_ddl(company_schema());

        assert!(ddl.starts_with("-- dbo.Company_List\nCREATE TABLE IF NOT EXISTS Company_List ("));
        assert!(ddl.contains("CompanyId INTEGER PRIMARY KEY CHECK"));
        assert!(ddl.contains("CompanyName TEXT NULL CHECK (CompanyName IS NULL OR length(CompanyName) <= 60)"));
        assert!(ddl.contains("BaseRate INTEGER NULL DEFAULT 0"));
        assert!(ddl.contains("EnterUserId INTEGER NOT NULL"));
        assert!(ddl.contains("TaxRate REAL NULL"));
        assert!(ddl.contains("CompanyGroupId INTEGER NULL"));
        assert!(ddl.contains("CREATE UNIQUE INDEX IF NOT EXISTS PK_Locations ON Company_List (CompanyId);"));
    }

    #[test]
    fn rendered_ddl_executes_on_sqlite() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(&render_sqlite_ddl(company_schema())).unwrap();
        conn.execute("INSERT INTO Company_List (EnterUserId) VALUES (7);", [])
            .unwrap();

        let (base_rate, currency): (i64, i64) = conn
            .query_row(
                "SELECT BaseRate, DefaultCurrencyId FROM Company_List;",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((base_rate, currency), (0, 1));
    }
}
