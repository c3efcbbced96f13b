use std::sync::OnceLock;

use regex::Regex;

use crate::core::errors::{Result, RowlogError};
use crate::core::models::change::{ChangeKind, FieldDelta, RowChange};
use crate::core::traits::formatter::ChangeFormatter;
use crate::core::traits::naming::SchemaNaming;

/// Locale names with a built-in template set.
pub const BUILTIN_LOCALES: &[&str] = &["zh-cn", "en"];

/// Placeholders valid in the created/updated/deleted line templates.
const LINE_PLACEHOLDERS: &[&str] = &["table", "pk_name", "pk", "fields"];
/// Placeholders valid in the `field` fragment.
const FIELD_PLACEHOLDERS: &[&str] = &["label", "value"];
/// Placeholders valid in the `field_change` fragment.
const CHANGE_PLACEHOLDERS: &[&str] = &["label", "old", "new"];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}").expect("placeholder pattern is valid")
    })
}

/// One complete set of message templates.
///
/// Line templates describe the whole entry; the `field` fragment renders one
/// column of a create/delete, `field_change` one column of an update, and
/// fragments are joined with `field_separator`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet {
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub field: String,
    pub field_change: String,
    pub field_separator: String,
}

impl TemplateSet {
    /// Chinese templates: `创建 用户 (id:1)：姓名：张三，…`.
    pub fn zh_cn() -> Self {
        Self {
            created: "创建 {table} ({pk_name}:{pk})：{fields}".to_string(),
            updated: "修改 {table} ({pk_name}:{pk})：{fields}".to_string(),
            deleted: "删除 {table} ({pk_name}:{pk})：{fields}".to_string(),
            field: "{label}：{value}".to_string(),
            field_change: "{label} 由 {old} 改为 {new}".to_string(),
            field_separator: "，".to_string(),
        }
    }

    pub fn en() -> Self {
        Self {
            created: "created {table} ({pk_name}:{pk}): {fields}".to_string(),
            updated: "updated {table} ({pk_name}:{pk}): {fields}".to_string(),
            deleted: "deleted {table} ({pk_name}:{pk}): {fields}".to_string(),
            field: "{label}: {value}".to_string(),
            field_change: "{label}: {old} => {new}".to_string(),
            field_separator: ", ".to_string(),
        }
    }

    /// Look up a built-in set by locale name. Case-insensitive; `_` and `-`
    /// are interchangeable.
    pub fn for_locale(name: &str) -> Result<Self> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "zh-cn" => Ok(Self::zh_cn()),
            "en" => Ok(Self::en()),
            _ => Err(RowlogError::UnknownLocale {
                name: name.to_string(),
                available: BUILTIN_LOCALES.join(", "),
            }),
        }
    }

    /// Every (slot name, template text, allowed placeholders) triple,
    /// for validation.
    fn slots(&self) -> [(&'static str, &str, &'static [&'static str]); 6] {
        [
            ("created", &self.created, LINE_PLACEHOLDERS),
            ("updated", &self.updated, LINE_PLACEHOLDERS),
            ("deleted", &self.deleted, LINE_PLACEHOLDERS),
            ("field", &self.field, FIELD_PLACEHOLDERS),
            ("field_change", &self.field_change, CHANGE_PLACEHOLDERS),
            ("field_separator", &self.field_separator, &[]),
        ]
    }

    /// Reject templates referencing placeholders their slot does not provide.
    pub fn validate(&self) -> Result<()> {
        for (slot, template, allowed) in self.slots() {
            for m in placeholder_regex().find_iter(template) {
                let name = &m.as_str()[1..m.as_str().len() - 1];
                if !allowed.contains(&name) {
                    return Err(RowlogError::InvalidTemplate {
                        slot: slot.to_string(),
                        detail: format!("unknown placeholder '{{{name}}}'"),
                        allowed: allowed.join(", "),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Formatter rendering row changes through a `TemplateSet`.
#[derive(Debug)]
pub struct TemplateFormatter {
    templates: TemplateSet,
}

impl TemplateFormatter {
    /// Validates the set up front so malformed templates surface at
    /// construction, not in the middle of a request.
    pub fn new(templates: TemplateSet) -> Result<Self> {
        templates.validate()?;
        Ok(Self { templates })
    }

    fn render(template: &str, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for m in placeholder_regex().find_iter(template) {
            let name = &m.as_str()[1..m.as_str().len() - 1];
            // Validation guarantees every placeholder is known
            let value = vars
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
                .unwrap_or("");
            out.push_str(&template[last..m.start()]);
            out.push_str(value);
            last = m.end();
        }
        out.push_str(&template[last..]);
        out
    }

    fn render_field(&self, delta: &FieldDelta, kind: ChangeKind, label: &str) -> String {
        match kind {
            ChangeKind::Updated => {
                let old = delta.old.as_ref().map(|v| v.to_string()).unwrap_or_default();
                let new = delta.new.as_ref().map(|v| v.to_string()).unwrap_or_default();
                Self::render(
                    &self.templates.field_change,
                    &[("label", label), ("old", &old), ("new", &new)],
                )
            }
            ChangeKind::Created | ChangeKind::Deleted => {
                let value = match kind {
                    ChangeKind::Created => &delta.new,
                    _ => &delta.old,
                };
                let value = value.as_ref().map(|v| v.to_string()).unwrap_or_default();
                Self::render(
                    &self.templates.field,
                    &[("label", label), ("value", &value)],
                )
            }
        }
    }
}

impl ChangeFormatter for TemplateFormatter {
    fn format(&self, change: &RowChange, naming: &dyn SchemaNaming) -> Result<String> {
        let fields = change
            .fields
            .iter()
            .map(|delta| {
                let label = naming.field_label(&change.table, &delta.column);
                self.render_field(delta, change.kind, &label)
            })
            .collect::<Vec<_>>()
            .join(&self.templates.field_separator);

        let line = match change.kind {
            ChangeKind::Created => &self.templates.created,
            ChangeKind::Updated => &self.templates.updated,
            ChangeKind::Deleted => &self.templates.deleted,
        };

        let table = naming.table_label(&change.table);
        let pk = change.primary_key.1.to_string();
        Ok(Self::render(
            line,
            &[
                ("table", &table),
                ("pk_name", &change.primary_key.0),
                ("pk", &pk),
                ("fields", &fields),
            ],
        ))
    }
}
