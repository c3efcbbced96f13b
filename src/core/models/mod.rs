pub mod change;
pub mod field_value;
