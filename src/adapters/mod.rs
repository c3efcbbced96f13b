pub mod formatters;
pub mod naming;

use crate::adapters::formatters::template_formatter::TemplateFormatter;
use crate::adapters::naming::config_naming::ConfigNaming;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::operation_logger::OperationLogger;

impl OperationLogger<TemplateFormatter, ConfigNaming> {
    /// Wire the default adapters from a validated config: locale templates
    /// with overrides applied, config-driven naming, and the configured
    /// enabled/timestamps state.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let formatter = TemplateFormatter::new(config.template_set()?)?;
        let naming = ConfigNaming::from_config(config);

        let mut logger =
            OperationLogger::new(formatter, naming).with_timestamps(config.rowlog.timestamps);
        if !config.rowlog.enabled {
            logger.disable();
        }
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::field_value::Row;

    #[test]
    fn from_config_defaults_produce_zh_cn_lines() {
        let config = AppConfig::default();
        let mut logger = OperationLogger::from_config(&config).unwrap();

        let row = Row::new().with("id", 1).with("name", "张三");
        logger.created("user", &row).unwrap();

        assert_eq!(logger.get_log(), "创建 user (id:1)：name：张三");
    }

    #[test]
    fn from_config_respects_disabled_gate() {
        let config: AppConfig = toml::from_str(
            r#"
            [rowlog]
            enabled = false
            "#,
        )
        .unwrap();
        let mut logger = OperationLogger::from_config(&config).unwrap();

        logger.created("user", &Row::new().with("id", 1)).unwrap();
        assert_eq!(logger.get_log(), "");
        assert!(!logger.is_enabled());
    }

    #[test]
    fn from_config_applies_table_mappings() {
        let config: AppConfig = toml::from_str(
            r#"
            [rowlog]
            locale = "zh-cn"

            [tables.user]
            label = "用户"
            [tables.user.fields]
            name = "姓名"
            "#,
        )
        .unwrap();
        let mut logger = OperationLogger::from_config(&config).unwrap();

        let row = Row::new().with("id", 1).with("name", "张三");
        logger.created("user", &row).unwrap();

        assert_eq!(logger.get_log(), "创建 用户 (id:1)：姓名：张三");
    }
}
