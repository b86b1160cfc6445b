//! Declarative validation rules and the pipeline that evaluates them.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::field::{FieldDescriptor, FieldValue};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static ISO_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("valid phone pattern"));

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Enter a valid email address";
pub const DATE_MESSAGE: &str = "Use YYYY-MM-DD format";
pub const PHONE_MESSAGE: &str = "Phone number must have exactly 11 digits";
pub const ADDRESS_MESSAGE: &str = "Address is required";

type CheckCallback = dyn Fn(&FieldValue) -> Option<String> + Send + Sync;
pub type SharedCheck = Arc<CheckCallback>;

/// Field names that carry rules regardless of how the descriptor is declared.
/// Every descriptor built through [`FieldDescriptor::new`] picks these up.
const NAME_CONVENTIONS: &[(&str, ConventionalRule)] = &[
    ("phone", ConventionalRule::Phone),
    ("address", ConventionalRule::NonBlank),
];

#[derive(Clone, Copy)]
enum ConventionalRule {
    Phone,
    NonBlank,
}

/// Rules attached to a field. Evaluation order is fixed by [`Rule::rank`],
/// not by the order rules were attached.
#[derive(Clone)]
pub enum Rule {
    /// Blank values fail.
    Required,
    /// Single `@`, no whitespace, a dot in the domain.
    Email,
    /// Literal `YYYY-MM-DD`.
    IsoDate,
    /// Exactly 11 digits.
    Phone,
    /// Blank values fail even when the field is not required.
    NonBlank,
    /// Caller check, runs last. `None` or an empty message means valid.
    Custom(SharedCheck),
}

impl Rule {
    fn rank(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::Email => 1,
            Rule::IsoDate => 2,
            Rule::Phone => 3,
            Rule::NonBlank => 4,
            Rule::Custom(_) => 5,
        }
    }

    pub(crate) fn same_variant(&self, other: &Rule) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    fn check(&self, value: &FieldValue) -> Result<(), ValidationError> {
        let text = value.as_text().unwrap_or_default();
        match self {
            Rule::Required => fail_if(value.is_blank(), REQUIRED_MESSAGE),
            Rule::Email => fail_if(!EMAIL_PATTERN.is_match(text), EMAIL_MESSAGE),
            Rule::IsoDate => fail_if(!ISO_DATE_PATTERN.is_match(text), DATE_MESSAGE),
            Rule::Phone => fail_if(!PHONE_PATTERN.is_match(text), PHONE_MESSAGE),
            Rule::NonBlank => fail_if(value.is_blank(), ADDRESS_MESSAGE),
            Rule::Custom(check) => match check(value) {
                Some(message) if !message.is_empty() => Err(ValidationError::new(message)),
                _ => Ok(()),
            },
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rule::Required => "Required",
            Rule::Email => "Email",
            Rule::IsoDate => "IsoDate",
            Rule::Phone => "Phone",
            Rule::NonBlank => "NonBlank",
            Rule::Custom(_) => "Custom",
        };
        f.write_str(label)
    }
}

fn fail_if(failed: bool, message: &str) -> Result<(), ValidationError> {
    if failed {
        Err(ValidationError::new(message))
    } else {
        Ok(())
    }
}

/// Rules implied by a field's name.
pub(crate) fn conventional_rules(name: &str) -> Vec<Rule> {
    NAME_CONVENTIONS
        .iter()
        .filter(|(conventional, _)| *conventional == name)
        .map(|(_, rule)| match rule {
            ConventionalRule::Phone => Rule::Phone,
            ConventionalRule::NonBlank => Rule::NonBlank,
        })
        .collect()
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Runs the field's rules in precedence order; the first failure wins.
pub fn validate_field(field: &FieldDescriptor, value: &FieldValue) -> Result<(), ValidationError> {
    let mut ordered: Vec<&Rule> = field.rules.iter().collect();
    ordered.sort_by_key(|rule| rule.rank());
    ordered.into_iter().try_for_each(|rule| rule.check(value))
}
