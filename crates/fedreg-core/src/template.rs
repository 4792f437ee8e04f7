use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// TemplateValue
///
/// A seeded value: one string or a list of them.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    One(String),
    Many(Vec<String>),
}

impl From<&TemplateValue> for FieldValue {
    fn from(value: &TemplateValue) -> Self {
        match value {
            TemplateValue::One(s) => Self::Text(s.clone()),
            TemplateValue::Many(items) => Self::List(items.clone()),
        }
    }
}

///
/// Template
///
/// Named auto-population data for a freshly added segment. Keys name
/// schema attributes or custom slots of `segment_type`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Template {
    pub id: String,
    pub segment_type: String,

    #[serde(default)]
    pub values: BTreeMap<String, TemplateValue>,
}

///
/// TemplateBook
///

#[derive(Clone, Debug, Default)]
pub struct TemplateBook {
    templates: Vec<Template>,
}

impl TemplateBook {
    #[must_use]
    pub const fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates that apply to `segment_type`.
    pub fn for_type<'a>(&'a self, segment_type: &'a str) -> impl Iterator<Item = &'a Template> {
        self.templates
            .iter()
            .filter(move |t| t.segment_type == segment_type)
    }

    pub fn insert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }
}

impl From<Vec<Template>> for TemplateBook {
    fn from(templates: Vec<Template>) -> Self {
        Self::new(templates)
    }
}

///
/// TESTS
///
