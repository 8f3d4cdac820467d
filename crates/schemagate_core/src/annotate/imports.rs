//! Import statement handling for annotated entity sources.

use crate::schema::{ColumnType, RelationKind, ValidationRule};

/// TypeORM names that disappear from the annotated output.
const DROPPED_IMPORTS: &[&str] = &["JoinColumn", "Index"];

/// Tracks which class-validator decorators one run has emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorImports {
    string: bool,
    number: bool,
    date: bool,
    boolean: bool,
    optional: bool,
}

impl ValidatorImports {
    /// Records the decorators a column of `column_type` will receive.
    pub fn register(&mut self, column_type: ColumnType, optional: bool) {
        match column_type {
            ColumnType::String => self.string = true,
            ColumnType::Number => self.number = true,
            ColumnType::Date => self.date = true,
            ColumnType::Boolean => self.boolean = true,
            ColumnType::Other => {}
        }
        self.optional |= optional;
    }

    /// Decorator names to import, in canonical order.
    ///
    /// `MaxLength` rides along with `IsString` whether or not a length was found.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.string {
            names.push(ValidationRule::IsString.decorator_name());
            names.push(ValidationRule::MaxLength(0).decorator_name());
        }
        if self.number {
            names.push(ValidationRule::IsNumber.decorator_name());
        }
        if self.date {
            names.push(ValidationRule::IsDateString.decorator_name());
        }
        if self.boolean {
            names.push(ValidationRule::IsBoolean.decorator_name());
        }
        if self.optional {
            names.push(ValidationRule::IsOptional.decorator_name());
        }
        names
    }

    /// Renders `import { ... } from 'class-validator';`.
    pub fn statement(&self) -> String {
        format!(
            "import {{ {} }} from 'class-validator';",
            self.names().join(", ")
        )
    }
}

/// Drops relative imports and relation / index names from an import block.
pub fn filter_imports(imports: &str) -> String {
    imports
        .split('\n')
        .filter(|line| !line.contains("./") && !is_dropped_name(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_dropped_name(line: &str) -> bool {
    let name = line.trim_matches(|c: char| c == ' ' || c == ',' || c == '\t');
    DROPPED_IMPORTS.contains(&name)
        || RelationKind::ALL
            .iter()
            .any(|kind| kind.decorator_name() == name)
}
