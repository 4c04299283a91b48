//! Checks for single text values against a field's primitive kind.

use crate::error::ValueError;
use crate::types::{FieldDefinition, TypeKind};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Literals accepted for boolean fields, compared case-insensitively.
pub const BOOLEAN_LITERALS: [&str; 4] = ["true", "false", "1", "0"];

/// Check `value` against `field`'s kind.
///
/// Callers pass the already-trimmed text, which may be empty. `Text` and
/// `Unresolved` fields accept anything.
pub fn validate_value(value: &str, field: &FieldDefinition) -> Result<(), ValueError> {
    check_kind(value, field.kind, field.enum_values.as_deref().unwrap_or_default())
}

/// Compare `value` with the field's `fixed` attribute, if it declares one.
///
/// Not part of [`validate_value`]; the validator only runs this when
/// [`Validator::with_fixed_values`](crate::Validator::with_fixed_values) is on.
pub fn check_fixed(value: &str, field: &FieldDefinition) -> Result<(), ValueError> {
    match &field.fixed {
        Some(expected) if value != expected => Err(ValueError::FixedMismatch {
            expected: expected.clone(),
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Check `value` against a bare kind. `allowed` is only consulted for
/// [`TypeKind::Enum`].
pub fn check_kind(value: &str, kind: TypeKind, allowed: &[String]) -> Result<(), ValueError> {
    match kind {
        TypeKind::Integer if !is_integer(value) => Err(ValueError::ExpectedInteger {
            value: value.to_string(),
        }),
        TypeKind::Float if value.parse::<f64>().is_err() => Err(ValueError::ExpectedFloat {
            value: value.to_string(),
        }),
        TypeKind::Boolean
            if !BOOLEAN_LITERALS
                .iter()
                .any(|literal| literal.eq_ignore_ascii_case(value)) =>
        {
            Err(ValueError::ExpectedBoolean {
                value: value.to_string(),
            })
        }
        TypeKind::Date if !ISO_DATE.is_match(value) => Err(ValueError::ExpectedDate {
            value: value.to_string(),
        }),
        // Case-sensitive: schema literals are matched exactly
        TypeKind::Enum if !allowed.iter().any(|v| v == value) => Err(ValueError::NotInEnum {
            value: value.to_string(),
            allowed: allowed.to_vec(),
        }),
        _ => Ok(()),
    }
}

/// Base-10 integer with an optional sign, of any width.
fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
