use crate::prelude::*;

///
/// FieldDef
///
/// Descriptor for a simple (non-group) attribute. The same descriptor is
/// used for direct attributes and for slot-backed attributes; the
/// distinction lives on [`Entry`](super::Entry).
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct FieldDef {
    pub display_name: &'static str,
    pub description: &'static str,
    pub value_type: ValueType,
    pub multi_valued: bool,

    /// Values used when the record carries nothing for this attribute.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub defaults: &'static [&'static str],

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub constraints: &'static [Constraint],
}

impl FieldDef {
    #[must_use]
    pub const fn new(
        display_name: &'static str,
        description: &'static str,
        value_type: ValueType,
    ) -> Self {
        Self {
            display_name,
            description,
            value_type,
            multi_valued: false,
            defaults: &[],
            constraints: &[],
        }
    }

    #[must_use]
    pub const fn text(display_name: &'static str, description: &'static str) -> Self {
        Self::new(display_name, description, ValueType::String)
    }

    #[must_use]
    pub const fn multi(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    #[must_use]
    pub const fn with_defaults(mut self, defaults: &'static [&'static str]) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub const fn with_constraints(mut self, constraints: &'static [Constraint]) -> Self {
        self.constraints = constraints;
        self
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.constraints.iter().any(Constraint::is_required)
    }
}
