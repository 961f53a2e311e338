//! Boundary checks applied before any store access

use crate::error::ValidationError;
use tier_model::{TierConfigPatch, ValidatedPatch};

/// Check a free-text justification and return it trimmed
///
/// # Errors
/// Returns a validation error when the trimmed text is shorter than
/// `min_len` characters.
pub fn check_reason(
    field: &'static str,
    reason: &str,
    min_len: usize,
) -> Result<String, ValidationError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    let len = trimmed.chars().count();
    if len < min_len {
        return Err(ValidationError::new(
            field,
            format!("must be at least {min_len} characters (got {len})"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Narrow a submitted percentage to `u8` within [0, 100]
///
/// # Errors
/// Returns a validation error for values outside the range.
pub fn check_percent(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| {
            ValidationError::new(field, format!("must be between 0 and 100 (got {value})"))
        })
}

/// Range-check a configuration patch
///
/// # Errors
/// Returns the first out-of-range or blank field.
pub fn check_patch(patch: &TierConfigPatch) -> Result<ValidatedPatch, ValidationError> {
    let commission_split = patch
        .commission_split
        .map(|v| check_percent("commission_split", v))
        .transpose()?;
    let leadership_bonus_rate = patch
        .leadership_bonus_rate
        .map(|v| check_percent("leadership_bonus_rate", v))
        .transpose()?;

    let display_name = patch
        .display_name
        .as_deref()
        .map(|name| {
            let name = name.trim();
            if name.is_empty() {
                Err(ValidationError::new("display_name", "cannot be blank"))
            } else {
                Ok(name.to_string())
            }
        })
        .transpose()?;

    Ok(ValidatedPatch {
        display_name,
        description: patch.description.as_ref().map(|d| d.trim().to_string()),
        commission_split,
        leadership_bonus_rate,
        requirements: patch.requirements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_trimmed_before_length_check() {
        assert!(check_reason("reason", "   short    ", 10).is_err());
        assert_eq!(
            check_reason("reason", "  met sales target ", 10).unwrap(),
            "met sales target"
        );
    }

    #[test]
    fn blank_reason_is_required() {
        let err = check_reason("change_reason", "   ", 10).unwrap_err();
        assert_eq!(err.field, "change_reason");
        assert_eq!(err.message, "is required");
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(check_percent("commission_split", 0).unwrap(), 0);
        assert_eq!(check_percent("commission_split", 100).unwrap(), 100);
        assert!(check_percent("commission_split", 101).is_err());
        assert!(check_percent("commission_split", 200).is_err());
        assert!(check_percent("commission_split", -1).is_err());
    }

    #[test]
    fn patch_rejects_out_of_range_split() {
        let patch = TierConfigPatch::new().with_commission_split(200);
        let err = check_patch(&patch).unwrap_err();
        assert_eq!(err.field, "commission_split");
    }

    #[test]
    fn patch_rejects_out_of_range_bonus() {
        for rate in [101, -5] {
            let patch = TierConfigPatch::new()
                .with_commission_split(80)
                .with_leadership_bonus_rate(rate);
            assert_eq!(check_patch(&patch).unwrap_err().field, "leadership_bonus_rate");
        }
    }

    #[test]
    fn patch_rejects_blank_name() {
        let patch = TierConfigPatch::new().with_display_name("  ");
        assert_eq!(check_patch(&patch).unwrap_err().field, "display_name");
    }
}
