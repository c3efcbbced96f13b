use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::adapters::formatters::template_formatter::TemplateSet;
use crate::core::errors::{Result, RowlogError};

/// Top-level rowlog configuration, conventionally read from `rowlog.toml`.
///
/// Everything is optional: a missing section falls back to defaults
/// (enabled, `zh-cn` templates, physical names, `id` primary keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rowlog: RowlogSection,
    #[serde(default)]
    pub templates: TemplatesSection,
    #[serde(default)]
    pub tables: HashMap<String, TableEntry>,
}

impl AppConfig {
    /// Load and validate a configuration file.
    ///
    /// Validation happens here, up front: an unknown locale, a template
    /// override with a bad placeholder, or an empty label fails the load
    /// instead of surfacing mid-request.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RowlogError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| RowlogError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })?;

        // Resolving the template set exercises locale and override checks
        config.template_set()?;

        for (table, entry) in &config.tables {
            if table.is_empty() {
                return Err(RowlogError::InvalidConfig {
                    detail: "empty table key in [tables]".to_string(),
                });
            }
            entry.validate(table)?;
        }

        Ok(config)
    }

    /// The effective template set: the locale's built-ins with any
    /// `[templates]` overrides applied, validated.
    pub fn template_set(&self) -> Result<TemplateSet> {
        let mut set = TemplateSet::for_locale(&self.rowlog.locale)?;
        self.templates.apply_to(&mut set);
        set.validate()?;
        Ok(set)
    }
}

/// The `[rowlog]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RowlogSection {
    /// Initial state of the enable/disable gate.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Built-in template set to start from: `zh-cn` or `en`.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Prefix each line with an RFC 3339 UTC timestamp.
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for RowlogSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            locale: default_locale(),
            timestamps: false,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_locale() -> String {
    "zh-cn".to_string()
}

/// The `[templates]` section: per-slot overrides of the locale set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesSection {
    pub created: Option<String>,
    pub updated: Option<String>,
    pub deleted: Option<String>,
    pub field: Option<String>,
    pub field_change: Option<String>,
    pub field_separator: Option<String>,
}

impl TemplatesSection {
    fn apply_to(&self, set: &mut TemplateSet) {
        let slots = [
            (&self.created, &mut set.created),
            (&self.updated, &mut set.updated),
            (&self.deleted, &mut set.deleted),
            (&self.field, &mut set.field),
            (&self.field_change, &mut set.field_change),
            (&self.field_separator, &mut set.field_separator),
        ];
        for (override_value, slot) in slots {
            if let Some(value) = override_value {
                *slot = value.clone();
            }
        }
    }
}

/// A table entry in `[tables]`: display label, primary key, field labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableEntry {
    pub label: Option<String>,
    pub primary_key: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl TableEntry {
    fn validate(&self, table: &str) -> Result<()> {
        if let Some(label) = &self.label
            && label.is_empty()
        {
            return Err(RowlogError::InvalidConfig {
                detail: format!("empty label for table '{table}'"),
            });
        }
        if let Some(pk) = &self.primary_key
            && pk.is_empty()
        {
            return Err(RowlogError::InvalidConfig {
                detail: format!("empty primary_key for table '{table}'"),
            });
        }
        for (column, label) in &self.fields {
            if label.is_empty() {
                return Err(RowlogError::InvalidConfig {
                    detail: format!("empty label for field '{table}.{column}'"),
                });
            }
        }
        Ok(())
    }
}
