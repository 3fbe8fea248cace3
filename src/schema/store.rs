//! Schema registry
//!
//! Ordered in-memory collection of databases, each owning its tables.
//! Databases and tables are hard-deleted; nothing cascades to other registries.

use crate::error::{conflict_error, not_found_error, ApiResult};
use crate::models::{AppUser, Database, DatabaseUpdate, SchemaStats, Table, TableUpdate};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Thread-safe schema registry
pub struct SchemaRegistry {
    databases: Arc<RwLock<Vec<Database>>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::with_databases(Vec::new())
    }

    /// Registry pre-populated with `databases`, kept in the given order
    pub fn with_databases(databases: Vec<Database>) -> Self {
        Self {
            databases: Arc::new(RwLock::new(databases)),
        }
    }

    /// Append a pre-built database; its id must not be taken
    pub async fn add_database(&self, database: Database) -> ApiResult<Database> {
        let mut databases = self.databases.write().await;
        if databases.iter().any(|db| db.id == database.id) {
            return Err(conflict_error(format!("Database {} already exists", database.id)));
        }

        info!(
            "Added database '{}' ({}) for owner {} with {} tables",
            database.name,
            database.id,
            database.owner,
            database.tables.len()
        );
        databases.push(database.clone());
        Ok(database)
    }

    /// Get a database by ID
    pub async fn get_database(&self, id: &str) -> ApiResult<Database> {
        let databases = self.databases.read().await;
        databases
            .iter()
            .find(|db| db.id == id)
            .cloned()
            .ok_or_else(|| database_not_found(id))
    }

    /// List every database in insertion order
    pub async fn list_databases(&self) -> Vec<Database> {
        self.databases.read().await.clone()
    }

    /// Merge the patch into the matching database
    ///
    /// A replacement `tables` list must not repeat a table id.
    pub async fn update_database(&self, id: &str, updates: DatabaseUpdate) -> ApiResult<Database> {
        let mut databases = self.databases.write().await;
        let database = databases
            .iter_mut()
            .find(|db| db.id == id)
            .ok_or_else(|| database_not_found(id))?;

        if let Some(tables) = &updates.tables {
            let mut seen = HashSet::new();
            if let Some(table) = tables.iter().find(|t| !seen.insert(t.id.as_str())) {
                return Err(conflict_error(format!(
                    "Table {} appears more than once in database {}",
                    table.id, id
                )));
            }
        }

        if let Some(name) = updates.name {
            database.name = name;
        }
        if let Some(owner) = updates.owner {
            database.owner = owner;
        }
        if let Some(description) = updates.description {
            database.description = Some(description);
        }
        if let Some(tables) = updates.tables {
            database.tables = tables;
        }

        debug!("Updated database {}", id);
        Ok(database.clone())
    }

    /// Remove the matching database, returning it
    pub async fn delete_database(&self, id: &str) -> ApiResult<Database> {
        let mut databases = self.databases.write().await;
        let index = databases
            .iter()
            .position(|db| db.id == id)
            .ok_or_else(|| database_not_found(id))?;

        let removed = databases.remove(index);
        info!("Deleted database '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Append a table to one database's table list
    pub async fn add_table(&self, database_id: &str, table: Table) -> ApiResult<Table> {
        let mut databases = self.databases.write().await;
        let database = databases
            .iter_mut()
            .find(|db| db.id == database_id)
            .ok_or_else(|| database_not_found(database_id))?;

        if database.tables.iter().any(|t| t.id == table.id) {
            return Err(conflict_error(format!(
                "Table {} already exists in database {}",
                table.id, database_id
            )));
        }

        info!(
            "Added table '{}' ({}) with {} columns to database {}",
            table.name,
            table.id,
            table.columns.len(),
            database_id
        );
        database.tables.push(table.clone());
        Ok(table)
    }

    /// Tables of one database, in order
    pub async fn list_tables(&self, database_id: &str) -> ApiResult<Vec<Table>> {
        Ok(self.get_database(database_id).await?.tables)
    }

    /// Merge the patch into one table of one database
    pub async fn update_table(
        &self,
        database_id: &str,
        table_id: &str,
        updates: TableUpdate,
    ) -> ApiResult<Table> {
        let mut databases = self.databases.write().await;
        let database = databases
            .iter_mut()
            .find(|db| db.id == database_id)
            .ok_or_else(|| database_not_found(database_id))?;

        let table = database
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| table_not_found(database_id, table_id))?;

        if let Some(name) = updates.name {
            table.name = name;
        }
        if let Some(columns) = updates.columns {
            table.columns = columns;
        }

        debug!("Updated table {} in database {}", table_id, database_id);
        Ok(table.clone())
    }

    /// Remove exactly one table; the others keep their order
    pub async fn delete_table(&self, database_id: &str, table_id: &str) -> ApiResult<Table> {
        let mut databases = self.databases.write().await;
        let database = databases
            .iter_mut()
            .find(|db| db.id == database_id)
            .ok_or_else(|| database_not_found(database_id))?;

        let index = database
            .tables
            .iter()
            .position(|t| t.id == table_id)
            .ok_or_else(|| table_not_found(database_id, table_id))?;

        let removed = database.tables.remove(index);
        info!("Deleted table '{}' ({}) from database {}", removed.name, removed.id, database_id);
        Ok(removed)
    }

    /// Databases whose owner equals `owner_id`, in order
    pub async fn get_user_databases(&self, owner_id: &str) -> Vec<Database> {
        let databases = self.databases.read().await;
        databases
            .iter()
            .filter(|db| db.owner == owner_id)
            .cloned()
            .collect()
    }

    /// Databases a user may see: everything for admins, owned ones otherwise
    pub async fn visible_databases(&self, user: &AppUser) -> Vec<Database> {
        if user.role.sees_all_databases() {
            self.list_databases().await
        } else {
            self.get_user_databases(&user.id).await
        }
    }

    /// Dashboard totals, optionally limited to one owner
    pub async fn stats(&self, owner_id: Option<&str>) -> SchemaStats {
        let databases = match owner_id {
            Some(owner) => self.get_user_databases(owner).await,
            None => self.list_databases().await,
        };
        SchemaStats::of(&databases)
    }

    /// Number of databases
    pub async fn count(&self) -> usize {
        self.databases.read().await.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn database_not_found(id: &str) -> crate::error::AppError {
    not_found_error(format!("Database {} not found", id))
}

fn table_not_found(database_id: &str, table_id: &str) -> crate::error::AppError {
    not_found_error(format!("Table {} not found in database {}", table_id, database_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::error::AppError;
    use crate::models::{Column, UserStatus};
    use crate::seed;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn seeded() -> SchemaRegistry {
        SchemaRegistry::with_databases(seed::databases())
    }

    fn user(id: &str, role: Role) -> AppUser {
        AppUser {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: id.to_string(),
            email: format!("{}@example.com", id),
            role,
            status: UserStatus::Active,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[tokio::test]
    async fn test_delete_table_from_seeded_database() {
        let registry = seeded();

        let removed = registry.delete_table("1", "1-2").await.unwrap();
        assert_eq!(removed.name, "products");

        let db = registry.get_database("1").await.unwrap();
        assert_eq!(db.tables.len(), 1);
        assert_eq!(db.tables[0].name, "users");
    }

    #[tokio::test]
    async fn test_delete_table_preserves_order() {
        let registry = seeded();
        registry.add_table("1", Table::new("orders", vec![])).await.unwrap();
        registry.add_table("1", Table::new("reviews", vec![])).await.unwrap();

        registry.delete_table("1", "1-2").await.unwrap();

        let names: Vec<String> = registry
            .list_tables("1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["users", "orders", "reviews"]);
    }

    #[tokio::test]
    async fn test_update_table_merges_only_patched_fields() {
        let registry = seeded();
        let table = Table::new("audit_log", vec![Column::new("id", "SERIAL")]);
        let table_id = table.id.clone();
        registry.add_table("1", table.clone()).await.unwrap();

        let updated = registry
            .update_table(
                "1",
                &table_id,
                TableUpdate {
                    name: Some("audit_events".to_string()),
                    columns: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "audit_events");
        assert_eq!(updated.columns, table.columns);
        assert_eq!(updated.created_at, table.created_at);
        assert_eq!(updated.id, table.id);
    }

    #[tokio::test]
    async fn test_update_database_merges_only_patched_fields() {
        let registry = seeded();
        let before = registry.get_database("1").await.unwrap();

        let after = registry
            .update_database(
                "1",
                DatabaseUpdate {
                    description: Some("Renamed store".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.description.as_deref(), Some("Renamed store"));
        assert_eq!(after.name, before.name);
        assert_eq!(after.owner, before.owner);
        assert_eq!(after.tables, before.tables);
    }

    #[tokio::test]
    async fn test_missing_ids_report_not_found_and_leave_state() {
        let registry = seeded();
        let before = registry.list_databases().await;

        assert!(matches!(
            registry.delete_database("nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.add_table("nope", Table::new("t", vec![])).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.delete_table("1", "nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            registry.update_table("1", "nope", TableUpdate::default()).await,
            Err(AppError::NotFound(_))
        ));

        assert_eq!(registry.list_databases().await, before);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_rejected() {
        let registry = seeded();
        let mut duplicate = Database::new("Copy", "admin", None);
        duplicate.id = "1".to_string();

        assert!(matches!(
            registry.add_database(duplicate).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_replacing_tables_rejects_repeated_ids() {
        let registry = seeded();
        let tables = registry.list_tables("1").await.unwrap();
        let repeated = vec![tables[0].clone(), tables[1].clone(), tables[0].clone()];

        let result = registry
            .update_database(
                "1",
                DatabaseUpdate {
                    name: Some("Renamed".to_string()),
                    tables: Some(repeated),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        let database = registry.get_database("1").await.unwrap();
        assert_eq!(database.name, "E-commerce Platform");
        let ids: Vec<&str> = database.tables.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1-1", "1-2"]);
    }

    #[tokio::test]
    async fn test_delete_database() {
        let registry = seeded();
        let extra = registry
            .add_database(Database::new("Analytics", "user1", None))
            .await
            .unwrap();

        registry.delete_database("1").await.unwrap();

        let remaining = registry.list_databases().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, extra.id);
    }

    #[tokio::test]
    async fn test_user_databases_and_visibility() {
        let registry = seeded();
        registry
            .add_database(Database::new("Analytics", "user1", None))
            .await
            .unwrap();
        registry
            .add_database(Database::new("Blog", "admin", None))
            .await
            .unwrap();

        let owned: Vec<String> = registry
            .get_user_databases("admin")
            .await
            .into_iter()
            .map(|db| db.name)
            .collect();
        assert_eq!(owned, vec!["E-commerce Platform", "Blog"]);

        assert_eq!(registry.visible_databases(&user("user1", Role::User)).await.len(), 1);
        assert_eq!(registry.visible_databases(&user("user1", Role::Admin)).await.len(), 3);
        assert!(registry.get_user_databases("ghost").await.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let registry = seeded();
        registry
            .add_database(Database::new("Analytics", "user1", None))
            .await
            .unwrap();

        assert_eq!(
            registry.stats(None).await,
            SchemaStats {
                total_databases: 2,
                total_tables: 2
            }
        );
        assert_eq!(
            registry.stats(Some("user1")).await,
            SchemaStats {
                total_databases: 1,
                total_tables: 0
            }
        );
    }
}
