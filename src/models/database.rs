//! Database, table and column models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Column of a table. Type and constraints are free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[validate(length(min = 1, max = 63, message = "Column name must be between 1 and 63 characters"))]
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            constraints: None,
            nullable: None,
            default_value: None,
        }
    }

    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Whether the constraint text declares a foreign key (matched as written,
    /// upper case)
    pub fn is_relation(&self) -> bool {
        self.constraints
            .as_deref()
            .map_or(false, |c| c.contains("FOREIGN KEY"))
    }
}

/// Table owned by exactly one database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[validate(length(min = 1, message = "Table id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, max = 63, message = "Table name must be between 1 and 63 characters"))]
    pub name: String,
    #[validate(nested)]
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
}

impl Table {
    /// Build a table with a fresh id stamped now
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            columns,
            created_at: Utc::now(),
        }
    }
}

/// Logical database: a named, owned, ordered list of tables
///
/// `owner` is a user id that nothing checks; removing that user leaves the
/// database untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tables: Vec<Table>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Database {
    /// Build an empty database with a fresh id stamped now
    pub fn new(name: impl Into<String>, owner: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            owner: owner.into(),
            tables: Vec::new(),
            created_at: Utc::now(),
            description,
        }
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Number of columns declaring a foreign key
    pub fn relation_count(&self) -> usize {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter())
            .filter(|c| c.is_relation())
            .count()
    }
}

/// Partial database update; present fields overwrite, absent ones stay
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUpdate {
    #[validate(length(min = 1, max = 100, message = "Database name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Owner must not be empty"))]
    pub owner: Option<String>,
    pub description: Option<String>,
    #[validate(nested)]
    pub tables: Option<Vec<Table>>,
}

/// Partial table update; present fields overwrite, absent ones stay
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    #[validate(length(min = 1, max = 63, message = "Table name must be between 1 and 63 characters"))]
    pub name: Option<String>,
    #[validate(nested)]
    pub columns: Option<Vec<Column>>,
}

/// Request to create a new database
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    #[validate(length(min = 1, max = 100, message = "Database name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Owner is required"))]
    pub owner: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub tables: Vec<CreateTableRequest>,
}

impl CreateDatabaseRequest {
    pub fn into_database(self) -> Database {
        let mut database = Database::new(self.name, self.owner, self.description);
        database.tables = self
            .tables
            .into_iter()
            .map(CreateTableRequest::into_table)
            .collect();
        database
    }
}

/// Request to create a new table
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    #[validate(length(min = 1, max = 63, message = "Table name must be between 1 and 63 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub columns: Vec<Column>,
}

impl CreateTableRequest {
    pub fn into_table(self) -> Table {
        Table::new(self.name, self.columns)
    }
}

/// Request to create a table from a CREATE TABLE statement
#[derive(Debug, Deserialize, Validate)]
pub struct ParseSqlRequest {
    #[validate(length(min = 1, message = "SQL statement is required"))]
    pub sql: String,
}

/// Optional owner filter for listings
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

/// Totals shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStats {
    pub total_databases: usize,
    pub total_tables: usize,
}

impl SchemaStats {
    pub fn of(databases: &[Database]) -> Self {
        Self {
            total_databases: databases.len(),
            total_tables: databases.iter().map(|db| db.tables.len()).sum(),
        }
    }
}

/// Schema view of one database
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub database_id: String,
    pub name: String,
    pub table_count: usize,
    pub column_count: usize,
    pub relation_count: usize,
    pub tables: Vec<Table>,
}

impl From<Database> for SchemaResponse {
    fn from(db: Database) -> Self {
        Self {
            table_count: db.tables.len(),
            column_count: db.column_count(),
            relation_count: db.relation_count(),
            database_id: db.id,
            name: db.name,
            tables: db.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_serializes_camel_case() {
        let column = Column::new("created_at", "TIMESTAMP").with_default("NOW()");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "created_at", "type": "TIMESTAMP", "defaultValue": "NOW()"})
        );
    }

    #[test]
    fn test_relation_count() {
        let mut db = Database::new("shop", "admin", None);
        db.tables.push(Table::new(
            "orders",
            vec![
                Column::new("id", "UUID").with_constraints("PRIMARY KEY"),
                Column::new("user_id", "UUID").with_constraints("FOREIGN KEY"),
                Column::new("product_id", "UUID").with_constraints("foreign key"),
            ],
        ));
        assert_eq!(db.column_count(), 3);
        assert_eq!(db.relation_count(), 1);
    }

    #[test]
    fn test_database_update_validates_tables() {
        let update: DatabaseUpdate = serde_json::from_value(serde_json::json!({
            "tables": [{
                "id": "t1",
                "name": "",
                "columns": [],
                "createdAt": "2024-01-15T10:30:00Z"
            }]
        }))
        .unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateDatabaseRequest = serde_json::from_value(serde_json::json!({
            "name": "",
            "owner": "admin"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }
}
