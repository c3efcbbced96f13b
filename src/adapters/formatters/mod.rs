pub mod template_formatter;
