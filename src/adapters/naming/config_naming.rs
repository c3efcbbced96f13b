use std::collections::HashMap;

use crate::config::app_config::{AppConfig, TableEntry};
use crate::core::traits::naming::SchemaNaming;

/// Default primary-key column when a table has no config entry.
const DEFAULT_PRIMARY_KEY: &str = "id";

/// Schema naming driven by the `[tables]` config section.
///
/// Tables absent from the config fall back to their physical names and an
/// `id` primary key, so partial configs are fine. Multi-database hosts key
/// their entries the same way they key logger calls (`conn.user` works
/// unchanged).
pub struct ConfigNaming {
    tables: HashMap<String, TableEntry>,
}

impl ConfigNaming {
    pub fn new(tables: HashMap<String, TableEntry>) -> Self {
        Self { tables }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.tables.clone())
    }
}

impl SchemaNaming for ConfigNaming {
    fn table_label(&self, table: &str) -> String {
        self.tables
            .get(table)
            .and_then(|entry| entry.label.clone())
            .unwrap_or_else(|| table.to_string())
    }

    fn field_label(&self, table: &str, column: &str) -> String {
        self.tables
            .get(table)
            .and_then(|entry| entry.fields.get(column).cloned())
            .unwrap_or_else(|| column.to_string())
    }

    fn primary_key(&self, table: &str) -> String {
        self.tables
            .get(table)
            .and_then(|entry| entry.primary_key.clone())
            .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string())
    }
}
