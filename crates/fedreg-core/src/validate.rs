use crate::{ThisError, value::FieldValue};
use fedreg_schema::prelude::Constraint;
use regex_lite::Regex;
use std::collections::BTreeMap;

///
/// ValidateError
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error("validation failed")]
    ValidationFailed(BTreeMap<String, Vec<String>>),
}

impl ValidateError {
    /// Issues keyed by rendered tree path.
    #[must_use]
    pub const fn issues(&self) -> &BTreeMap<String, Vec<String>> {
        match self {
            Self::ValidationFailed(issues) => issues,
        }
    }
}

///
/// PathSegment
///

#[derive(Clone, Copy, Debug)]
pub enum PathSegment<'a> {
    Field(&'a str),
    Index(usize),
}

///
/// Issues
///
/// Collects field issues by path while a segment tree is walked.
///

#[derive(Debug, Default)]
pub struct Issues {
    path: Vec<String>,
    issues: BTreeMap<String, Vec<String>>,
}

impl Issues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, seg: PathSegment<'_>) {
        let rendered = render_path(&self.path, Some(seg));
        self.path.push(rendered);
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    pub(crate) fn add_issues_at(&mut self, key: &str, messages: &[String]) {
        if messages.is_empty() {
            return;
        }

        let path = render_path(&self.path, Some(PathSegment::Field(key)));
        self.issues
            .entry(path)
            .or_default()
            .extend(messages.iter().cloned());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidateError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidateError::ValidationFailed(self.issues))
        }
    }
}

// The path stack holds already-rendered prefixes, so only the last one and
// the extra segment need joining.
fn render_path(path: &[String], extra: Option<PathSegment<'_>>) -> String {
    use std::fmt::Write;

    let mut out = path.last().cloned().unwrap_or_default();

    match extra {
        Some(PathSegment::Field(s)) => {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(s);
        }
        Some(PathSegment::Index(i)) => {
            let _ = write!(out, "[{i}]");
        }
        None => {}
    }

    out
}

/// Check one field's value against its declared constraints.
///
/// `decode_miss` flags a wire value that did not decode as its declared
/// type; it only becomes an issue when the field is required.
#[must_use]
pub fn check_field(value: &FieldValue, constraints: &[Constraint], decode_miss: bool) -> Vec<String> {
    let mut issues = Vec::new();
    let texts = value.texts();

    for constraint in constraints {
        match constraint {
            Constraint::Required => {
                if decode_miss {
                    issues.push("value could not be read in its declared format".to_string());
                } else if value.is_empty() {
                    issues.push("a value is required".to_string());
                }
            }
            Constraint::MinLen(min) => {
                for text in &texts {
                    if text.chars().count() < *min {
                        issues.push(format!("'{text}' is shorter than {min} characters"));
                    }
                }
            }
            Constraint::MaxLen(max) => {
                for text in &texts {
                    if text.chars().count() > *max {
                        issues.push(format!("'{text}' is longer than {max} characters"));
                    }
                }
            }
            Constraint::Pattern(pattern) => match Regex::new(pattern) {
                Ok(re) => {
                    for text in &texts {
                        if !re.is_match(text) {
                            issues.push(format!("'{text}' does not match the expected format"));
                        }
                    }
                }
                Err(err) => issues.push(format!("invalid pattern '{pattern}': {err}")),
            },
            Constraint::OneOf(allowed) => {
                for text in &texts {
                    if !allowed.contains(text) {
                        issues.push(format!(
                            "'{text}' is not one of: {}",
                            allowed.join(", ")
                        ));
                    }
                }
            }
            Constraint::Min(min) => check_number(&texts, &mut issues, |n| {
                (n < *min).then(|| format!("{n} is less than {min}"))
            }),
            Constraint::Max(max) => check_number(&texts, &mut issues, |n| {
                (n > *max).then(|| format!("{n} is greater than {max}"))
            }),
        }
    }

    issues
}

fn check_number(texts: &[&str], issues: &mut Vec<String>, check: impl Fn(f64) -> Option<String>) {
    for text in texts {
        match text.trim().parse::<f64>() {
            Ok(n) => issues.extend(check(n)),
            Err(_) => issues.push(format!("'{text}' is not a number")),
        }
    }
}

///
/// TESTS
///
