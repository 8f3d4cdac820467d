//! TypeORM entity → class-validator annotated entity.
//!
//! # Responsibility
//! - Read a TypeORM entity declaration and attach one validation decorator
//!   set per mapped column (`@IsOptional`, type check, `@MaxLength`).
//! - Drop relation members and index decorators from the output.
//! - Emit the matching `class-validator` import statement.
//!
//! # Invariants
//! - Input is processed as blank-line-separated blocks; a column's decorators
//!   and field line must not be separated by a blank line.
//! - Decorator bookkeeping is per call; concurrent runs never share state.
//! - Source column lines are preserved verbatim; only the field line is
//!   rewritten (`?:` for optional fields, `= default` for literal defaults).

mod column;
mod imports;

pub use column::ColumnBlock;
pub use imports::{filter_imports, ValidatorImports};

use crate::schema::RelationKind;
use log::{debug, info};
use std::path::{Path, PathBuf};
use thiserror::Error;

const JOIN_COLUMN_DECORATOR: &str = "@JoinColumn";
const DEFAULT_IGNORED_MARKER: &str = "XUtils";

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("entity source declares no columns")]
    NoColumns,
    #[error("field `{property}` has unsupported type `{type_name}`")]
    UnsupportedType { property: String, type_name: String },
    #[error("column block has no field declaration: `{line}`")]
    MissingFieldDeclaration { line: String },
    #[error("malformed column options object: `{line}`")]
    MalformedOptions { line: String },
    #[error("malformed column length: `{line}`")]
    MalformedLength { line: String },
    #[error("failed to read entity source `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Annotator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateOptions {
    /// Column defaults mentioning any of these markers are database-side
    /// functions and are not copied into field initializers.
    pub ignored_default_markers: Vec<String>,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            ignored_default_markers: vec![DEFAULT_IGNORED_MARKER.to_string()],
        }
    }
}

impl AnnotateOptions {
    pub fn is_ignored_default(&self, value: &str) -> bool {
        self.ignored_default_markers
            .iter()
            .any(|marker| value.contains(marker.as_str()))
    }
}

/// Annotates entity source text.
///
/// # Errors
/// - `NoColumns` when nothing but imports and relations was found.
/// - Column-level parse errors from [`ColumnBlock::parse`].
pub fn annotate_entity(source: &str, options: &AnnotateOptions) -> Result<String, AnnotateError> {
    let normalized = source.replace("\r\n", "\n");
    let mut import_block = "";
    let mut used = ValidatorImports::default();
    let mut columns: Vec<ColumnBlock> = Vec::new();

    for block in normalized.split("\n\n") {
        if block.starts_with("import") {
            import_block = block;
            continue;
        }
        if block.trim().is_empty() {
            continue;
        }
        if is_relation_block(block) {
            debug!("event=annotate_skip module=annotate reason=relation");
            continue;
        }

        let column = ColumnBlock::parse(block, options)?;
        used.register(column.column_type(), column.is_optional());
        columns.push(column);
    }

    let first = columns.first_mut().ok_or(AnnotateError::NoColumns)?;
    first.strip_index_decorators();

    let mut output = filter_imports(import_block);
    output.push('\n');
    output.push_str(&used.statement());
    output.push_str("\n\n");
    for column in &columns {
        output.push_str(&column.render());
        output.push_str("\n\n");
    }
    output.push('}');

    debug!(
        "event=annotate module=annotate status=ok columns={}",
        columns.len()
    );
    Ok(output)
}

/// Reads and annotates an entity file.
pub fn annotate_file(
    path: impl AsRef<Path>,
    options: &AnnotateOptions,
) -> Result<String, AnnotateError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| AnnotateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let output = annotate_entity(&source, options)?;
    info!(
        "event=annotate_file module=annotate status=ok bytes_in={} bytes_out={}",
        source.len(),
        output.len()
    );
    Ok(output)
}

fn is_relation_block(block: &str) -> bool {
    block.contains(JOIN_COLUMN_DECORATOR)
        || RelationKind::ALL
            .iter()
            .any(|kind| block.contains(&format!("@{}", kind.decorator_name())))
}

#[cfg(test)]
mod tests {
    use super::{annotate_entity, AnnotateError, AnnotateOptions};

    #[test]
    fn rejects_source_without_columns() {
        let source = "import { Entity } from \"typeorm\";\n\n";
        let err = annotate_entity(source, &AnnotateOptions::default()).unwrap_err();
        assert!(matches!(err, AnnotateError::NoColumns));
    }

    #[test]
    fn boolean_and_crlf_sources_are_annotated() {
        let source = "import { Column, Entity } from \"typeorm\";\r\n\r\n@Entity(\"Flags\")\r\nexport class Flag {\r\n  @Column(\"bit\", { name: \"IsDeleted\", nullable: true })\r\n  isDeleted: boolean | null;\r\n}\r\n";
        let output = annotate_entity(source, &AnnotateOptions::default()).unwrap();

        assert_eq!(
            output,
            "import { Column, Entity } from \"typeorm\";\nimport { IsBoolean, IsOptional } from 'class-validator';\n\n@Entity(\"Flags\")\nexport class Flag {\n  @Column(\"bit\", { name: \"IsDeleted\", nullable: true })\n  @IsOptional()\n  @IsBoolean()\n  isDeleted?: boolean | null;\n\n}"
        );
    }

    #[test]
    fn unsupported_field_type_names_the_property() {
        let source = "@Entity(\"T\")\nexport class T {\n  @Column(\"bigint\")\n  total: bigint;\n}";
        let err = annotate_entity(source, &AnnotateOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "field `total` has unsupported type `bigint`");
    }
}
