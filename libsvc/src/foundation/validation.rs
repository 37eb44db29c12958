use std::{error::Error, fmt::Display};

use serde::Serialize;
use validator::validate_email;

/// The rule a field value failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Required,
    TooShort { limit: usize },
    TooLong { limit: usize },
    NotAnEmail,
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required => write!(f, "is required"),
            Rule::TooShort { limit } => write!(f, "must be at least {} characters", limit),
            Rule::TooLong { limit } => write!(f, "must be at most {} characters", limit),
            Rule::NotAnEmail => write!(f, "is not a valid email"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    #[serde(flatten)]
    pub rule: Rule,
}

impl Violation {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.rule)
    }
}

/// A non-empty, ordered set of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(pub(crate) Vec<Violation>);

impl Violations {
    /// Returns `None` when there is nothing to report.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self(violations))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Whether `field` broke `rule`.
    pub fn contains(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|v| v.field == field && v.rule == rule)
    }

    /// Whether `field` broke any rule.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl Error for Violations {}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Grammar a non-blank value must follow on top of its length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Email,
}

/// Declarative rules for one field. Length bounds are inclusive and are
/// counted in UTF-16 code units of the raw value, so a character outside
/// the Basic Multilingual Plane counts twice.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
    pub format: Format,
}

impl FieldRules {
    pub const fn text(field: &'static str, min: usize, max: usize) -> Self {
        Self {
            field,
            min,
            max,
            format: Format::Text,
        }
    }

    pub const fn email(field: &'static str, min: usize, max: usize) -> Self {
        Self {
            field,
            min,
            max,
            format: Format::Email,
        }
    }

    pub fn check(&self, value: Option<&str>) -> Vec<Violation> {
        let value = match value {
            Some(v) if !is_blank(v) => v,
            _ => return vec![Violation::new(self.field, Rule::Required)],
        };

        let mut violations = Vec::new();
        let length = value.encode_utf16().count();
        if length < self.min {
            violations.push(Violation::new(self.field, Rule::TooShort { limit: self.min }));
        }
        if length > self.max {
            violations.push(Violation::new(self.field, Rule::TooLong { limit: self.max }));
        }
        if self.format == Format::Email && !validate_email(value) {
            violations.push(Violation::new(self.field, Rule::NotAnEmail));
        }
        violations
    }
}

/// Absent values are handled by the caller; this covers empty strings and
/// strings made only of control characters and spaces (U+0000 to U+0020).
/// Other Unicode whitespace such as U+2003 is content.
pub fn is_blank(value: &str) -> bool {
    value.trim_matches(|c: char| c <= ' ').is_empty()
}

/// Creates a string field that is validated against a `FieldRules` entry
/// upon parsing.
///
/// Input:
/// - The field name
/// - The `FieldRules` the value must satisfy
///
/// The created struct implements the Debug and Display trait, as well as
/// the AsRef trait to `str`.
#[macro_export]
macro_rules! validated_field {
    ( $name:ident, $rules:expr ) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub const RULES: $crate::foundation::validation::FieldRules = $rules;

            pub fn parse(
                v: Option<String>,
            ) -> Result<$name, Vec<$crate::foundation::validation::Violation>> {
                let violations = Self::RULES.check(v.as_deref());
                match v {
                    Some(v) if violations.is_empty() => Ok(Self(v)),
                    _ => Err(violations),
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}
