use serde::Serialize;

///
/// Constraint
///
/// A declared check on the value(s) of one field. Constraints are attached
/// per field in the registry and evaluated by the tree; nothing here is
/// inferred from the value type.
///
/// Text checks (`MinLen`, `MaxLen`, `Pattern`, `OneOf`) and numeric checks
/// (`Min`, `Max`) apply to every value of a multi-valued field.
///

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[remain::sorted]
pub enum Constraint {
    /// Numeric upper bound, inclusive.
    Max(f64),
    /// Maximum length in characters.
    MaxLen(usize),
    /// Numeric lower bound, inclusive.
    Min(f64),
    /// Minimum length in characters.
    MinLen(usize),
    /// Value must be one of the listed literals.
    OneOf(&'static [&'static str]),
    /// Value must match the regular expression.
    Pattern(&'static str),
    /// At least one non-empty value must be present.
    Required,
}

impl Constraint {
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}
