use schemagate_core::schema::ColumnDef;
use schemagate_core::{company_schema, render_sqlite_ddl, EntitySchema};
use std::fmt::Write;

pub fn schema() {
    println!("{}", describe(company_schema()));
}

fn describe(schema: &EntitySchema) -> String {
    let mut out = format!("{} ({})\n\n", schema.entity, schema.qualified_table());

    for column in schema.columns {
        let rules: Vec<String> = column.rules().iter().map(ToString::to_string).collect();
        let presence = if column.has_default() { "" } else { "no-default " };
        let _ = writeln!(
            out,
            "  {:<20} {:<18} {:<12} {presence}{}",
            column.property,
            column.column,
            sql_type_label(column),
            rules.join(" ")
        );
    }
    for relation in schema.relations {
        let _ = writeln!(
            out,
            "  {:<20} @{}({}) <-> {}.{}",
            relation.property,
            relation.kind.decorator_name(),
            relation.target,
            relation.target,
            relation.inverse
        );
    }

    out.push('\n');
    out.push_str(&render_sqlite_ddl(schema));
    out
}

fn sql_type_label(column: &ColumnDef) -> String {
    match column.precision {
        Some(precision) => format!("{}({precision})", column.sql_type),
        None => column.sql_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::describe;
    use schemagate_core::company_schema;

    #[test]
    fn description_lists_columns_relations_and_ddl() {
        let text = describe(company_schema());

        assert!(text.starts_with("Company (dbo.Company_List)\n"));
        assert!(text.contains("float(53)"));
        assert!(text.contains("@ManyToOne(CompanyGroups) <-> CompanyGroups.companies"));
        assert!(text.contains("@OneToMany(QuoteSummary) <-> QuoteSummary.company"));
        assert!(text.contains("CREATE UNIQUE INDEX IF NOT EXISTS PK_Locations"));
    }
}
