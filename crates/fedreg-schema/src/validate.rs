//! Registry self-checks, run once by whoever owns the table.

use crate::prelude::*;
use std::collections::BTreeSet;

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("registry validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

pub(crate) fn validate_registry(registry: &Registry) -> Result<(), SchemaError> {
    let mut issues = Vec::new();
    let mut seen_types = BTreeSet::new();

    for schema in registry.segments() {
        if !seen_types.insert(schema.segment_type) {
            issues.push(format!("duplicate segment type '{}'", schema.segment_type));
        }

        validate_attributes(registry, schema, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(issues))
    }
}

fn validate_attributes(registry: &Registry, schema: &SegmentSchema, issues: &mut Vec<String>) {
    let ty = schema.segment_type;
    let mut seen = BTreeSet::new();

    for attr in schema.attributes {
        if !seen.insert(attr.name) {
            issues.push(format!("{ty}: duplicate attribute '{}'", attr.name));
        }

        match &attr.entry {
            Entry::Group(_) => {
                if let Some(target) = attr.target_type()
                    && !registry.contains(target)
                {
                    issues.push(format!(
                        "{ty}.{}: group targets unknown segment type '{target}'",
                        attr.name
                    ));
                }
            }
            Entry::Plain(def) | Entry::Slot(def) => {
                if def.value_type.is_geo() && def.multi_valued {
                    issues.push(format!(
                        "{ty}.{}: {} fields cannot be multi-valued",
                        attr.name, def.value_type
                    ));
                }
                if !def.multi_valued && def.defaults.len() > 1 {
                    issues.push(format!(
                        "{ty}.{}: single-valued field declares {} defaults",
                        attr.name,
                        def.defaults.len()
                    ));
                }
            }
        }
    }
}

///
/// TESTS
///
