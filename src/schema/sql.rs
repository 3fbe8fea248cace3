//! CREATE TABLE import
//!
//! Reads a single `CREATE TABLE` statement into a [`Table`]. Only the shape
//! needed by the registry is extracted; types and constraints stay free-form
//! and are never checked against a dialect.

use crate::error::{validation_error, ApiResult};
use crate::models::{Column, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static CREATE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)^\s*CREATE\s+(?:TEMP(?:ORARY)?\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([`"\[\]\w.]+)\s*\((.*)\)\s*;?\s*$"#,
    )
    .expect("CREATE TABLE pattern is valid")
});

/// Leading words of table-level index and check clauses; these only count as
/// a clause when a parenthesised list follows
const INDEX_CLAUSES: &[&str] = &["UNIQUE", "CHECK", "KEY", "INDEX", "FULLTEXT", "SPATIAL"];

/// Words that end a column's type and start its constraints
const CONSTRAINT_WORDS: &[&str] = &[
    "NOT",
    "NULL",
    "DEFAULT",
    "PRIMARY",
    "UNIQUE",
    "REFERENCES",
    "CHECK",
    "CONSTRAINT",
    "FOREIGN",
    "AUTO_INCREMENT",
    "AUTOINCREMENT",
    "COLLATE",
    "GENERATED",
];

/// Parse a `CREATE TABLE` statement into a new table with a fresh id
pub fn parse_create_table(sql: &str) -> ApiResult<Table> {
    let captures = CREATE_TABLE
        .captures(sql)
        .ok_or_else(|| validation_error("Expected a single CREATE TABLE statement"))?;

    let qualified = &captures[1];
    let name = unquote(qualified.rsplit('.').next().unwrap_or(qualified));
    if name.is_empty() {
        return Err(validation_error("CREATE TABLE statement has no table name"));
    }

    let mut columns = Vec::new();
    for definition in split_top_level(&captures[2], ',') {
        if let Some(column) = parse_column(&definition)? {
            columns.push(column);
        }
    }

    Ok(Table::new(name, columns))
}

fn parse_column(definition: &str) -> ApiResult<Option<Column>> {
    let tokens = split_top_level(definition, ' ');
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    if is_table_clause(&tokens) {
        return Ok(None);
    }

    let mut rest = tokens[1..].iter().peekable();
    let mut type_words = Vec::new();
    while let Some(token) = rest.next_if(|t| !is_constraint_word(t)) {
        type_words.push(token.as_str());
    }
    if type_words.is_empty() {
        return Err(validation_error(format!("Column '{}' has no type", unquote(first))));
    }

    let mut column = Column::new(unquote(first), type_words.join(" "));
    let mut constraints = Vec::new();
    while let Some(token) = rest.next() {
        match token.to_ascii_uppercase().as_str() {
            "NOT" if rest.peek().map_or(false, |t| t.eq_ignore_ascii_case("NULL")) => {
                rest.next();
                column.nullable = Some(false);
            }
            "NULL" => column.nullable = Some(true),
            "DEFAULT" => {
                let first = rest
                    .next()
                    .ok_or_else(|| validation_error(format!("Column '{}' has an empty DEFAULT", column.name)))?;
                let mut value = vec![first.as_str()];
                while let Some(token) = rest.next_if(|t| !is_constraint_word(t)) {
                    value.push(token.as_str());
                }
                column.default_value = Some(value.join(" "));
            }
            _ => constraints.push(token.as_str()),
        }
    }
    if !constraints.is_empty() {
        column.constraints = Some(constraints.join(" "));
    }

    Ok(Some(column))
}

/// `PRIMARY KEY ...`, `FOREIGN KEY ...`, `CONSTRAINT ...`, or an index/check
/// word followed by `(` directly or after one name (`UNIQUE KEY name (...)`
/// allowed). A column merely named `key` or `index` is not a clause.
fn is_table_clause(tokens: &[String]) -> bool {
    let upper: Vec<String> = tokens.iter().take(4).map(|t| t.to_ascii_uppercase()).collect();
    let word = |i: usize| upper.get(i).map(String::as_str);
    let opens_list = |i: usize| upper.get(i).map_or(false, |t| t.starts_with('('));

    match word(0) {
        Some("CONSTRAINT") => true,
        Some("PRIMARY") | Some("FOREIGN") => word(1) == Some("KEY"),
        Some(w) if INDEX_CLAUSES.contains(&w) => {
            let skip = usize::from(matches!(word(1), Some("KEY") | Some("INDEX")));
            opens_list(1 + skip) || opens_list(2 + skip)
        }
        _ => false,
    }
}

fn is_constraint_word(token: &str) -> bool {
    CONSTRAINT_WORDS.contains(&token.to_ascii_uppercase().as_str())
}

fn unquote(identifier: &str) -> String {
    identifier
        .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
        .to_string()
}

/// Split on `separator` outside parentheses and quotes; whitespace separators
/// split on any run of whitespace
fn split_top_level(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        let splits = if separator == ' ' {
            c.is_whitespace()
        } else {
            c == separator
        };

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if splits && depth == 0 => {
                let part = current.trim();
                if !part.is_empty() {
                    parts.push(part.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_create_table() {
        let table = parse_create_table(
            "CREATE TABLE orders (
                id UUID PRIMARY KEY,
                email VARCHAR(255) UNIQUE NOT NULL,
                total DECIMAL(10, 2) NOT NULL DEFAULT 0,
                note TEXT NULL,
                user_id UUID REFERENCES users(id),
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            );",
        )
        .unwrap();

        assert_eq!(table.name, "orders");
        assert_eq!(
            table.columns,
            vec![
                Column::new("id", "UUID").with_constraints("PRIMARY KEY"),
                Column::new("email", "VARCHAR(255)")
                    .with_constraints("UNIQUE")
                    .with_nullable(false),
                Column::new("total", "DECIMAL(10, 2)")
                    .with_nullable(false)
                    .with_default("0"),
                Column::new("note", "TEXT").with_nullable(true),
                Column::new("user_id", "UUID").with_constraints("REFERENCES users(id)"),
                Column::new("created_at", "TIMESTAMP WITH TIME ZONE").with_default("NOW()"),
            ]
        );
    }

    #[test]
    fn test_table_level_clauses_are_skipped() {
        let table = parse_create_table(
            r#"create table if not exists public."line_items" (
                order_id INT,
                sku TEXT DEFAULT 'n/a, pending',
                PRIMARY KEY (order_id, sku),
                CONSTRAINT fk_order FOREIGN KEY (order_id) REFERENCES orders(id)
            )"#,
        )
        .unwrap();

        assert_eq!(table.name, "line_items");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].default_value.as_deref(), Some("'n/a, pending'"));
    }

    #[test]
    fn test_columns_named_like_clause_words() {
        let table = parse_create_table(
            "CREATE TABLE api_keys (
                id UUID PRIMARY KEY,
                key VARCHAR(64) NOT NULL,
                index INT,
                check BOOLEAN DEFAULT false,
                UNIQUE KEY uq_key (key),
                INDEX idx_index (index),
                CHECK (index >= 0)
            )",
        )
        .unwrap();

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "key", "index", "check"]);
        assert_eq!(table.columns[1].data_type, "VARCHAR(64)");
        assert_eq!(table.columns[1].nullable, Some(false));
    }

    #[test]
    fn test_default_expression_spans_tokens() {
        let table = parse_create_table(
            "CREATE TABLE sessions (
                expires_at TIMESTAMP DEFAULT now() + interval '1 day' NOT NULL,
                note TEXT DEFAULT NULL
            )",
        )
        .unwrap();

        assert_eq!(
            table.columns[0],
            Column::new("expires_at", "TIMESTAMP")
                .with_default("now() + interval '1 day'")
                .with_nullable(false)
        );
        assert_eq!(table.columns[1].default_value.as_deref(), Some("NULL"));
        assert_eq!(table.columns[1].constraints, None);
    }

    #[test]
    fn test_rejects_non_create_statements() {
        assert!(matches!(
            parse_create_table("SELECT * FROM users"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_create_table("CREATE TABLE broken (id PRIMARY KEY)"),
            Err(AppError::Validation(_))
        ));
    }
}
