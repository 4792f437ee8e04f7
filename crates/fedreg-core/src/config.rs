//! Editor configuration, loaded from TOML.
//!
//! ```toml
//! [ids]
//! prefix = "urn:segment:id:"
//! generator = "ulid"   # or "counter"
//!
//! [validation]
//! block_save_on_error = true
//!
//! [[templates]]
//! id = "rest-binding"
//! segment_type = "ServiceBinding"
//!
//! [templates.values]
//! serviceType = "REST"
//! bindingType = ["Catalog_1.0"]
//! ```

use crate::{
    ThisError,
    id::{CounterIds, DEFAULT_ID_PREFIX, IdSource, UlidIds},
    template::{Template, TemplateBook},
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// EditorConfig
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub ids: IdConfig,
    pub templates: Vec<Template>,
    pub validation: ValidationConfig,
}

impl EditorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn template_book(&self) -> TemplateBook {
        TemplateBook::new(self.templates.clone())
    }
}

///
/// IdConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdConfig {
    pub prefix: String,
    pub generator: IdGenerator,
}

impl IdConfig {
    /// Build the configured id source.
    #[must_use]
    pub fn source(&self) -> Box<dyn IdSource> {
        match self.generator {
            IdGenerator::Counter => Box::new(CounterIds::new(self.prefix.clone())),
            IdGenerator::Ulid => Box::new(UlidIds::new(self.prefix.clone())),
        }
    }
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ID_PREFIX.to_string(),
            generator: IdGenerator::default(),
        }
    }
}

///
/// IdGenerator
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum IdGenerator {
    Counter,
    #[default]
    Ulid,
}

///
/// ValidationConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Refuse to hand an invalid tree to the record store.
    pub block_save_on_error: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            block_save_on_error: true,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateValue;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EditorConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config.ids.prefix, DEFAULT_ID_PREFIX);
        assert_eq!(config.ids.generator, IdGenerator::Ulid);
        assert!(config.validation.block_save_on_error);
        assert!(config.templates.is_empty());
    }

    #[test]
    fn templates_parse_single_and_list_values() {
        let config = EditorConfig::from_toml_str(
            r#"
            [ids]
            prefix = "seg-"
            generator = "counter"

            [[templates]]
            id = "rest-binding"
            segment_type = "ServiceBinding"

            [templates.values]
            serviceType = "REST"
            bindingType = ["Catalog_1.0", "Catalog_2.0"]
            "#,
        )
        .expect("config should parse");

        let book = config.template_book();
        let template = book.get("rest-binding").expect("template should load");

        assert_eq!(
            template.values.get("serviceType"),
            Some(&TemplateValue::One("REST".into()))
        );
        assert_eq!(
            template.values.get("bindingType"),
            Some(&TemplateValue::Many(vec!["Catalog_1.0".into(), "Catalog_2.0".into()]))
        );
        assert_eq!(config.ids.source().next_id(), "seg-1");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = EditorConfig::from_toml_str("[ids]\nsuffix = \"x\"\n");

        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EditorConfig::from_path("/nonexistent/fedreg.toml");

        assert!(matches!(err, Err(ConfigError::Read { .. })));
    }
}
