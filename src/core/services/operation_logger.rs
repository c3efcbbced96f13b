use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::errors::Result;
use crate::core::models::change::{ChangeKind, FieldDelta, RowChange};
use crate::core::models::field_value::{FieldValue, Row};
use crate::core::services::json_fields;
use crate::core::services::log_buffer::LogBuffer;
use crate::core::traits::formatter::ChangeFormatter;
use crate::core::traits::naming::SchemaNaming;

/// The call-in surface for host ORM hooks.
///
/// Combines a `ChangeFormatter` with a `SchemaNaming` to turn row lifecycle
/// events into formatted lines, and owns the `LogBuffer` they accumulate in.
/// Transaction hooks pass straight through to the buffer, so the log
/// commits and rolls back with the host transaction.
///
/// Every message is fully computed before the buffer is touched; a
/// formatting error leaves the buffer exactly as it was. Batch operations
/// format every row first and append only when all rows succeeded.
pub struct OperationLogger<F: ChangeFormatter, N: SchemaNaming> {
    buffer: LogBuffer,
    formatter: F,
    naming: N,
    timestamps: bool,
}

impl<F: ChangeFormatter, N: SchemaNaming> OperationLogger<F, N> {
    /// A logger with an empty, enabled buffer and no timestamp prefixes.
    pub fn new(formatter: F, naming: N) -> Self {
        Self {
            buffer: LogBuffer::new(),
            formatter,
            naming,
            timestamps: false,
        }
    }

    /// Prefix each line with an RFC 3339 UTC timestamp.
    pub fn with_timestamps(mut self, on: bool) -> Self {
        self.timestamps = on;
        self
    }

    // ─── Row lifecycle hooks ─────────────────────────────────────────

    /// Record an inserted row. Covers insert, insert-or-ignore and
    /// insert-returning-id hooks; pass the row as inserted, with the
    /// primary key included once it is known.
    pub fn created(&mut self, table: &str, row: &Row) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        let line = self.format_created(table, row)?;
        self.push(table, ChangeKind::Created, line);
        Ok(())
    }

    /// Record a multi-row insert: one line per row, all or nothing.
    pub fn batch_created(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        let lines = rows
            .iter()
            .map(|row| self.format_created(table, row))
            .collect::<Result<Vec<_>>>()?;
        for line in lines {
            self.push(table, ChangeKind::Created, line);
        }
        Ok(())
    }

    /// Record an update of one row. `old` is the row as currently stored,
    /// `new` the assignment set; only assignments whose value actually
    /// changed are logged, and an update that changed nothing logs nothing.
    pub fn updated(&mut self, table: &str, old: &Row, new: &Row) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        if let Some(line) = self.format_updated(table, old, new)? {
            self.push(table, ChangeKind::Updated, line);
        }
        Ok(())
    }

    /// Record an update matching several rows: the same assignment set
    /// applied to each stored row, one line per row that actually changed.
    pub fn batch_updated(&mut self, table: &str, old_rows: &[Row], new: &Row) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        let mut lines = Vec::new();
        for old in old_rows {
            if let Some(line) = self.format_updated(table, old, new)? {
                lines.push(line);
            }
        }
        for line in lines {
            self.push(table, ChangeKind::Updated, line);
        }
        Ok(())
    }

    /// Record a deleted row, logging its last stored values.
    pub fn deleted(&mut self, table: &str, row: &Row) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        let line = self.format_deleted(table, row)?;
        self.push(table, ChangeKind::Deleted, line);
        Ok(())
    }

    /// Record a multi-row delete: one line per row, all or nothing.
    pub fn batch_deleted(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        if !self.buffer.is_enabled() {
            return Ok(());
        }
        let lines = rows
            .iter()
            .map(|row| self.format_deleted(table, row))
            .collect::<Result<Vec<_>>>()?;
        for line in lines {
            self.push(table, ChangeKind::Deleted, line);
        }
        Ok(())
    }

    /// Record an increment hook: logged as an update whose new value is the
    /// raw expression `` `column` + amount ``, after any extra assignments
    /// the host bundled with it.
    pub fn incremented(
        &mut self,
        table: &str,
        old: &Row,
        column: &str,
        amount: i64,
        extra: &Row,
    ) -> Result<()> {
        self.arithmetic_update(table, old, column, '+', amount, extra)
    }

    /// Record a decrement hook; see `incremented`.
    pub fn decremented(
        &mut self,
        table: &str,
        old: &Row,
        column: &str,
        amount: i64,
        extra: &Row,
    ) -> Result<()> {
        self.arithmetic_update(table, old, column, '-', amount, extra)
    }

    fn arithmetic_update(
        &mut self,
        table: &str,
        old: &Row,
        column: &str,
        op: char,
        amount: i64,
        extra: &Row,
    ) -> Result<()> {
        let mut new = extra.clone();
        new.set(column, FieldValue::Expr(format!("`{column}` {op} {amount}")));
        self.updated(table, old, &new)
    }

    // ─── Transaction hooks ───────────────────────────────────────────

    pub fn begin_transaction(&mut self) {
        self.buffer.begin_transaction();
    }

    pub fn commit(&mut self) {
        self.buffer.commit();
    }

    pub fn roll_back(&mut self) {
        self.buffer.roll_back();
    }

    // ─── Reader surface ──────────────────────────────────────────────

    /// The committed log, one line per recorded change.
    pub fn get_log(&self) -> String {
        self.buffer.get_log()
    }

    pub fn clear_log(&mut self) {
        self.buffer.clear_log();
    }

    pub fn enable(&mut self) {
        self.buffer.enable();
    }

    pub fn disable(&mut self) {
        self.buffer.disable();
    }

    pub fn is_enabled(&self) -> bool {
        self.buffer.is_enabled()
    }

    /// Direct access to the underlying buffer.
    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut LogBuffer {
        &mut self.buffer
    }

    // ─── Change assembly ─────────────────────────────────────────────

    fn format_created(&self, table: &str, row: &Row) -> Result<String> {
        let pk = self.naming.primary_key(table);
        let change = RowChange {
            table: table.to_string(),
            kind: ChangeKind::Created,
            primary_key: (pk.clone(), pk_value(row, &pk)),
            fields: row
                .iter()
                .filter(|(column, _)| *column != pk)
                .map(|(column, value)| FieldDelta {
                    column: column.to_string(),
                    old: None,
                    new: Some(value.clone()),
                })
                .collect(),
        };
        self.formatter.format(&change, &self.naming)
    }

    fn format_updated(&self, table: &str, old: &Row, new: &Row) -> Result<Option<String>> {
        let pk = self.naming.primary_key(table);
        let fields: Vec<FieldDelta> = new
            .iter()
            .filter_map(|(column, new_value)| {
                let old_value = if json_fields::is_json_path(column) {
                    json_fields::resolve_path(old, column).unwrap_or(FieldValue::Null)
                } else {
                    old.get(column).cloned().unwrap_or(FieldValue::Null)
                };
                (old_value != *new_value).then(|| FieldDelta {
                    column: column.to_string(),
                    old: Some(old_value),
                    new: Some(new_value.clone()),
                })
            })
            .collect();

        if fields.is_empty() {
            return Ok(None);
        }

        let change = RowChange {
            table: table.to_string(),
            kind: ChangeKind::Updated,
            primary_key: (
                pk.clone(),
                match pk_value(old, &pk) {
                    FieldValue::Null => pk_value(new, &pk),
                    value => value,
                },
            ),
            fields,
        };
        self.formatter.format(&change, &self.naming).map(Some)
    }

    fn format_deleted(&self, table: &str, row: &Row) -> Result<String> {
        let pk = self.naming.primary_key(table);
        let change = RowChange {
            table: table.to_string(),
            kind: ChangeKind::Deleted,
            primary_key: (pk.clone(), pk_value(row, &pk)),
            fields: row
                .iter()
                .filter(|(column, _)| *column != pk)
                .map(|(column, value)| FieldDelta {
                    column: column.to_string(),
                    old: Some(value.clone()),
                    new: None,
                })
                .collect(),
        };
        self.formatter.format(&change, &self.naming)
    }

    fn push(&mut self, table: &str, kind: ChangeKind, line: String) {
        debug!(table, ?kind, "row change logged");
        let line = if self.timestamps {
            stamp(&line, Utc::now())
        } else {
            line
        };
        self.buffer.append(line);
    }
}

fn pk_value(row: &Row, pk: &str) -> FieldValue {
    row.get(pk).cloned().unwrap_or(FieldValue::Null)
}

/// Timestamp prefix applied when `with_timestamps` is on.
fn stamp(line: &str, at: DateTime<Utc>) -> String {
    format!("[{}] {line}", at.format("%Y-%m-%dT%H:%M:%SZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Result;
    use crate::core::traits::naming::IdentityNaming;
    use chrono::TimeZone;

    /// Bare-bones formatter: `<kind> <table>[<pk>] col:old=>new,...`
    struct PlainFormatter;

    impl ChangeFormatter for PlainFormatter {
        fn format(&self, change: &RowChange, naming: &dyn SchemaNaming) -> Result<String> {
            let kind = match change.kind {
                ChangeKind::Created => "create",
                ChangeKind::Updated => "update",
                ChangeKind::Deleted => "delete",
            };
            let fields = change
                .fields
                .iter()
                .map(|d| {
                    let old = d.old.as_ref().map(|v| v.to_string()).unwrap_or_default();
                    let new = d.new.as_ref().map(|v| v.to_string()).unwrap_or_default();
                    format!("{}:{old}=>{new}", d.column)
                })
                .collect::<Vec<_>>()
                .join(",");
            Ok(format!(
                "{kind} {}[{}] {fields}",
                naming.table_label(&change.table),
                change.primary_key.1
            ))
        }
    }

    fn logger() -> OperationLogger<PlainFormatter, IdentityNaming> {
        OperationLogger::new(PlainFormatter, IdentityNaming)
    }

    #[test]
    fn created_excludes_pk_from_fields() {
        let mut log = logger();
        let row = Row::new().with("id", 7).with("name", "Alice");
        log.created("user", &row).unwrap();

        assert_eq!(log.get_log(), "create user[7] name:=>Alice");
    }

    #[test]
    fn created_without_pk_renders_null() {
        let mut log = logger();
        log.created("user", &Row::new().with("name", "Alice")).unwrap();

        assert_eq!(log.get_log(), "create user[null] name:=>Alice");
    }

    #[test]
    fn updated_logs_only_changed_assignments() {
        let mut log = logger();
        let old = Row::new().with("id", 1).with("name", "Alice").with("age", 30);
        let new = Row::new().with("name", "Alice").with("age", 31);
        log.updated("user", &old, &new).unwrap();

        assert_eq!(log.get_log(), "update user[1] age:30=>31");
    }

    #[test]
    fn unchanged_update_logs_nothing() {
        let mut log = logger();
        let old = Row::new().with("id", 1).with("name", "Alice");
        let new = Row::new().with("name", "Alice");
        log.updated("user", &old, &new).unwrap();

        assert_eq!(log.get_log(), "");
    }

    #[test]
    fn updated_resolves_json_paths() {
        let mut log = logger();
        let old = Row::new()
            .with("id", 1)
            .with("doc", r#"{"name":"Alice"}"#);
        let new = Row::new().with("doc->name", "Bob");
        log.updated("user", &old, &new).unwrap();

        assert_eq!(log.get_log(), "update user[1] doc->name:Alice=>Bob");
    }

    #[test]
    fn incremented_renders_raw_expression_after_extra() {
        let mut log = logger();
        let old = Row::new().with("id", 1).with("name", "Alice").with("age", 30);
        let extra = Row::new().with("name", "Chance");
        log.incremented("user", &old, "age", 5, &extra).unwrap();

        assert_eq!(
            log.get_log(),
            "update user[1] name:Alice=>Chance,age:30=>`age` + 5"
        );
    }

    #[test]
    fn decremented_by_one() {
        let mut log = logger();
        let old = Row::new().with("id", 1).with("age", 30);
        log.decremented("user", &old, "age", 1, &Row::new()).unwrap();

        assert_eq!(log.get_log(), "update user[1] age:30=>`age` - 1");
    }

    #[test]
    fn batch_created_appends_one_line_per_row() {
        let mut log = logger();
        let rows = vec![
            Row::new().with("id", 1).with("name", "a"),
            Row::new().with("id", 2).with("name", "b"),
        ];
        log.batch_created("user", &rows).unwrap();

        assert_eq!(log.get_log(), "create user[1] name:=>a\ncreate user[2] name:=>b");
    }

    #[test]
    fn batch_updated_skips_rows_without_changes() {
        let mut log = logger();
        let old_rows = vec![
            Row::new().with("id", 1).with("age", 30),
            Row::new().with("id", 2).with("age", 31),
        ];
        let new = Row::new().with("age", 31);
        log.batch_updated("user", &old_rows, &new).unwrap();

        assert_eq!(log.get_log(), "update user[1] age:30=>31");
    }

    #[test]
    fn disabled_logger_skips_all_hooks() {
        let mut log = logger();
        log.disable();
        log.created("user", &Row::new().with("id", 1)).unwrap();
        log.deleted("user", &Row::new().with("id", 1)).unwrap();
        log.enable();

        assert_eq!(log.get_log(), "");
    }

    #[test]
    fn transaction_hooks_gate_visibility() {
        let mut log = logger();
        log.begin_transaction();
        log.created("user", &Row::new().with("id", 1).with("name", "a"))
            .unwrap();
        assert_eq!(log.get_log(), "");
        log.commit();
        assert_eq!(log.get_log(), "create user[1] name:=>a");
    }

    #[test]
    fn stamp_prefixes_rfc3339_utc() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(stamp("entry", at), "[2026-01-02T03:04:05Z] entry");
    }

    #[test]
    fn timestamped_lines_carry_a_prefix() {
        let mut log = logger().with_timestamps(true);
        log.created("user", &Row::new().with("id", 1)).unwrap();

        let line = log.get_log();
        assert!(line.starts_with('['), "expected timestamp prefix: {line}");
        assert!(line.ends_with("create user[1] "));
    }
}
