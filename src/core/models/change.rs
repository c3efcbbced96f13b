use serde::{Deserialize, Serialize};

use crate::core::models::field_value::FieldValue;

/// The kind of row operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One column's before/after pair within a change.
///
/// - Created: `old` is `None`, `new` is `Some`
/// - Updated: both are `Some` (and differ)
/// - Deleted: `old` is `Some`, `new` is `None`
///
/// For JSON path assignments the column keeps its full path form
/// (`doc->a->b`), matching what the host wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDelta {
    pub column: String,
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
}

/// A fully resolved single-row change, ready for formatting.
///
/// `table` is the opaque key the host passed in (a qualified
/// `connection.table` string works unchanged); display names are resolved
/// later through `SchemaNaming`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChange {
    pub table: String,
    pub kind: ChangeKind,
    /// Primary-key column and its value for this row. The value is `Null`
    /// when the host did not supply it.
    pub primary_key: (String, FieldValue),
    pub fields: Vec<FieldDelta>,
}
