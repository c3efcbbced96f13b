/// Port for mapping physical schema names to display names.
///
/// The host ORM reports physical table and column names; log lines usually
/// want human labels (`user` → `用户`). Implementations also decide each
/// table's primary-key column.
pub trait SchemaNaming {
    /// Display label for a table. `table` is whatever key the host passed
    /// to the logger, so qualified `connection.table` keys work too.
    fn table_label(&self, table: &str) -> String;

    /// Display label for a column of a table.
    fn field_label(&self, table: &str, column: &str) -> String;

    /// Primary-key column for a table.
    fn primary_key(&self, table: &str) -> String;
}

/// Pass-through naming: physical names as labels, `id` as the primary key.
/// Keeps zero-config call sites simple.
pub struct IdentityNaming;

impl SchemaNaming for IdentityNaming {
    fn table_label(&self, table: &str) -> String {
        table.to_string()
    }

    fn field_label(&self, _table: &str, column: &str) -> String {
        column.to_string()
    }

    fn primary_key(&self, _table: &str) -> String {
        "id".to_string()
    }
}
