use std::fmt;

use serde::{Deserialize, Serialize};

/// A single column value as seen by the ORM hook layer.
///
/// Host row payloads are dynamically typed; this enum pins each value to an
/// explicit kind so formatting is deterministic. `Expr` carries a raw SQL
/// fragment (e.g. `` `age` + 1 `` from an increment) that is logged verbatim
/// and never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Null,
    Expr(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Expr(e) => f.write_str(e),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(serde_json::Number::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        // Non-finite floats have no JSON representation; log them as null.
        serde_json::Number::from_f64(n)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

/// One row of column assignments, in the order the host supplied them.
///
/// Log lines list fields in assignment order, so this is a Vec of pairs
/// rather than a map. `set` keeps map semantics (last assignment to a
/// column wins); lookups are linear, which is fine at row width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, FieldValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert: `Row::new().with("name", "Alice").with("age", 30)`.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Insert or replace a column assignment. Replacing keeps the column's
    /// original position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Returns the value for the given column, if present.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Iterates column/value pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<C: Into<String>, V: Into<FieldValue>> FromIterator<(C, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_preserves_assignment_order() {
        let row = Row::new().with("name", "Alice").with("age", 30).with("email", "a@b.c");
        let columns: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["name", "age", "email"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut row = Row::new().with("name", "Alice").with("age", 30);
        row.set("name", "Bob");

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("name"), Some(&FieldValue::Text("Bob".into())));
        let columns: Vec<&str> = row.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["name", "age"]);
    }

    #[test]
    fn display_renders_each_kind() {
        assert_eq!(FieldValue::Text("hi".into()).to_string(), "hi");
        assert_eq!(FieldValue::from(42i64).to_string(), "42");
        assert_eq!(FieldValue::from(2.5f64).to_string(), "2.5");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::Expr("`age` + 1".into()).to_string(), "`age` + 1");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(FieldValue::from(f64::NAN), FieldValue::Null);
        assert_eq!(FieldValue::from(f64::INFINITY), FieldValue::Null);
    }

    #[test]
    fn integer_numbers_display_without_fraction() {
        // 25 must log as "25", not "25.0"
        assert_eq!(FieldValue::from(25i64).to_string(), "25");
    }
}
