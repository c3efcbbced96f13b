//! # rowlog
//!
//! Human-readable audit trail for ORM row operations.
//!
//! Call the [`OperationLogger`] hooks from your ORM's lifecycle events and
//! read back one formatted line per change. Lines written inside a
//! transaction stay pending until the transaction commits and are discarded
//! on rollback, so the audit trail never mentions work the database threw
//! away. Nesting is unlimited and mirrors the host transaction manager.
//!
//! ## Quick start
//!
//! ```
//! use rowlog::{AppConfig, OperationLogger, Row};
//!
//! # fn main() -> rowlog::Result<()> {
//! let mut log = OperationLogger::from_config(&AppConfig::default())?;
//!
//! log.begin_transaction();
//! log.created("user", &Row::new().with("id", 1).with("name", "张三"))?;
//! log.commit();
//!
//! assert_eq!(log.get_log(), "创建 user (id:1)：name：张三");
//! # Ok(())
//! # }
//! ```
//!
//! Table and column display names, the template locale (`zh-cn` or `en`),
//! per-template overrides, and the initial enabled state all come from
//! [`AppConfig`] (see `rowlog.toml`), or plug your own [`ChangeFormatter`]
//! and [`SchemaNaming`] implementations into [`OperationLogger::new`].
//!
//! The transactional accumulator is usable on its own as [`LogBuffer`] when
//! the host does its own message formatting.

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::formatters::template_formatter::{TemplateFormatter, TemplateSet};
pub use crate::adapters::naming::config_naming::ConfigNaming;
pub use crate::config::app_config::AppConfig;
pub use crate::core::errors::{Result, RowlogError};
pub use crate::core::models::change::{ChangeKind, FieldDelta, RowChange};
pub use crate::core::models::field_value::{FieldValue, Row};
pub use crate::core::services::log_buffer::LogBuffer;
pub use crate::core::services::operation_logger::OperationLogger;
pub use crate::core::traits::formatter::ChangeFormatter;
pub use crate::core::traits::naming::{IdentityNaming, SchemaNaming};
