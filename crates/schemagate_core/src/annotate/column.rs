//! One column declaration block of a TypeORM entity.
//!
//! A block is the decorator lines of a column followed by its field line,
//! e.g. `@Column("varchar", { length: 60 })` + `companyName: string | null;`.

use super::{AnnotateError, AnnotateOptions};
use crate::schema::{ColumnType, ValidationRule};
use once_cell::sync::Lazy;
use regex::Regex;

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_$][\w$]*)(\?)?\s*:\s*([^;=]+?)\s*(?:=\s*[^;]*)?;?\s*$")
        .expect("valid field regex")
});
// Key-anchored so commas inside strings or arrays never split an entry.
static LENGTH_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[,\s])["']?length["']?\s*:\s*([^,\s]+)"#)
        .expect("valid length key regex")
});
static LENGTH_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"length\s*:\s*([^,\s]+)\s*,?\s*$").expect("valid length regex"));

const COLUMN_DECORATORS: &[&str] = &["@Column", "@Primary"];
const DEFAULT_KEY: &str = "default: ";
const DEFAULT_TRIM_CHARS: &[char] = &['(', ')', ' ', '=', '>', '}', '{', '"', ',', '\n'];

/// Parsed column block, ready to be re-emitted with validation decorators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBlock {
    lines: Vec<String>,
    property: String,
    column_type: ColumnType,
    optional: bool,
    max_length: Option<u32>,
    default: Option<String>,
}

impl ColumnBlock {
    /// Parses a blank-line-delimited block.
    ///
    /// # Errors
    /// - `MissingFieldDeclaration` when the block has no `name: type;` line.
    /// - `UnsupportedType` when the field type has no validator mapping.
    /// - `MalformedOptions` / `MalformedLength` for unreadable `length` values.
    pub fn parse(block: &str, options: &AnnotateOptions) -> Result<Self, AnnotateError> {
        let lines: Vec<String> = block
            .split('\n')
            .skip_while(|line| line.trim().is_empty())
            .map(str::to_string)
            .collect();

        let mut body = lines.clone();
        trim_tail(&mut body);
        let field_line = body
            .last()
            .ok_or_else(|| AnnotateError::MissingFieldDeclaration {
                line: block.trim().to_string(),
            })?;
        let (property, column_type, optional) = parse_field(field_line)?;

        let mut max_length = None;
        let mut default = None;
        for raw in &body {
            let mut line = raw.trim().to_string();
            if line.contains("default: (") {
                let (head, value) = separate_default(&line);
                default = (!options.is_ignored_default(&value)).then_some(value);
                line = head;
            }
            if column_type != ColumnType::String {
                continue;
            }
            if COLUMN_DECORATORS.iter().any(|prefix| line.starts_with(prefix))
                && line.contains('{')
                && line.contains('}')
            {
                max_length = find_length_in_options(&line)?;
            } else if line.contains("length: ") {
                max_length = Some(find_length(&line)?);
            }
        }

        Ok(Self {
            lines,
            property,
            column_type,
            optional,
            max_length,
            default: default.filter(|value| !value.is_empty()),
        })
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Validation decorators this column receives, in emission order.
    pub fn rules(&self) -> Vec<ValidationRule> {
        let mut rules = Vec::with_capacity(3);
        if self.optional {
            rules.push(ValidationRule::IsOptional);
        }
        rules.extend(self.column_type.type_rule());
        if let Some(length) = self.max_length {
            rules.push(ValidationRule::MaxLength(length));
        }
        rules
    }

    /// Drops `@Index(...)` decorators preceding `@Entity` in the block.
    ///
    /// No-op unless the block starts with `@Index`.
    pub fn strip_index_decorators(&mut self) {
        let starts_with_index = self
            .lines
            .first()
            .is_some_and(|line| line.contains("@Index"));
        if !starts_with_index {
            return;
        }
        if let Some(entity_at) = self
            .lines
            .iter()
            .position(|line| line.starts_with("@Entity"))
        {
            self.lines.drain(..entity_at);
        }
    }

    /// Source lines followed by the validation decorators and the
    /// rewritten field line.
    pub fn render(&self) -> String {
        let mut lines = self.lines.clone();
        trim_tail(&mut lines);
        let Some(mut field) = lines.pop() else {
            return String::new();
        };
        let indent: String = field.chars().take_while(|c| c.is_whitespace()).collect();

        if self.optional {
            field = add_optional(&field);
        }
        if let Some(default) = &self.default {
            field = add_default(&field, default);
        }

        lines.extend(self.rules().iter().map(|rule| format!("{indent}{rule}")));
        lines.push(field);
        lines.join("\n")
    }
}

/// Removes trailing lines too short to carry content, such as a closing `}`.
fn trim_tail(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|line| line.trim().len() < 2) {
        lines.pop();
    }
}

/// Reads `(property, type, optional)` from a `name: type;` line.
pub(crate) fn parse_field(line: &str) -> Result<(String, ColumnType, bool), AnnotateError> {
    let captures = FIELD_RE
        .captures(line)
        .ok_or_else(|| AnnotateError::MissingFieldDeclaration {
            line: line.trim().to_string(),
        })?;
    let property = captures[1].to_string();
    let marked_optional = captures.get(2).is_some();

    let mut nullable = false;
    let mut base = None;
    for part in captures[3].split('|').map(str::trim) {
        match part {
            "null" | "undefined" => nullable = true,
            other if base.is_none() => base = Some(other),
            _ => {}
        }
    }

    let type_name = base.unwrap_or("null");
    let column_type =
        ColumnType::from_ts_type(type_name).ok_or_else(|| AnnotateError::UnsupportedType {
            property: property.clone(),
            type_name: type_name.to_string(),
        })?;

    Ok((property, column_type, nullable || marked_optional))
}

/// Reads `length` from the last `{ ... }` options object on a line.
///
/// Returns `Ok(None)` when the object declares no length.
pub(crate) fn find_length_in_options(line: &str) -> Result<Option<u32>, AnnotateError> {
    let normalized = line.replace('}', "{");
    let segments: Vec<&str> = normalized.split('{').collect();
    if segments.len() < 3 {
        return Err(AnnotateError::MalformedOptions {
            line: line.to_string(),
        });
    }
    let body = segments[segments.len() - 2];

    let Some(captures) = LENGTH_KEY_RE.captures(body) else {
        return Ok(None);
    };
    captures[1]
        .parse::<u32>()
        .map(Some)
        .map_err(|_| AnnotateError::MalformedLength {
            line: line.to_string(),
        })
}

/// Reads `N` from a standalone `length: N,` line.
pub(crate) fn find_length(line: &str) -> Result<u32, AnnotateError> {
    LENGTH_LINE_RE
        .captures(line)
        .and_then(|captures| captures[1].parse::<u32>().ok())
        .ok_or_else(|| AnnotateError::MalformedLength {
            line: line.to_string(),
        })
}

/// Splits `default: () => "(0)"` off a line.
///
/// Returns the line with the default removed (and the options object
/// closed again when anything precedes it) plus the bare default value.
pub(crate) fn separate_default(line: &str) -> (String, String) {
    let (head, tail) = match line.split_once(DEFAULT_KEY) {
        Some(parts) => parts,
        None => return (line.to_string(), String::new()),
    };
    let value = tail.trim_matches(DEFAULT_TRIM_CHARS).to_string();
    let head = if head.is_empty() {
        String::new()
    } else {
        format!("{head}}})")
    };
    (head, value)
}

/// Marks the field optional: `name: T` becomes `name?: T`.
pub(crate) fn add_optional(line: &str) -> String {
    match line.split_once(':') {
        Some((name, _)) if name.trim_end().ends_with('?') => line.to_string(),
        Some(_) => line.replacen(':', "?:", 1),
        None => line.to_string(),
    }
}

/// Appends an initializer: `name: T;` becomes `name: T = value;`.
pub(crate) fn add_default(line: &str, default: &str) -> String {
    format!("{} = {default};", line.trim_end_matches(';'))
}
