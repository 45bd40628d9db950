pub mod config;
pub mod templates;

pub use config::{Config, ConfigError};
pub use templates::{FsTemplateSource, HttpTemplateSource, LocationTemplateSource, TemplateError, TemplateSource, load_templates};
