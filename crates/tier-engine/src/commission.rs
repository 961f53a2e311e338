//! Commission split arithmetic
//!
//! Money is carried as [`Decimal`] and rounded to cents. The company share is
//! derived by subtraction so the two shares always sum to the gross amount.

use crate::error::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How a gross commission divides between agent and company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    /// Commission on the closed transaction
    pub gross: Decimal,
    /// Agent split applied, percent
    pub split_percent: u8,
    /// Agent's share
    pub agent_share: Decimal,
    /// Company's share
    pub company_share: Decimal,
}

fn percent_of(amount: Decimal, percent: u8) -> Decimal {
    (amount * Decimal::from(percent) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Divide a gross commission by the agent's split
///
/// # Errors
/// Rejects a negative gross amount or a split above 100%.
pub fn split_commission(
    gross: Decimal,
    split_percent: u8,
) -> Result<CommissionBreakdown, ValidationError> {
    if gross.is_sign_negative() && !gross.is_zero() {
        return Err(ValidationError::new(
            "gross",
            format!("must not be negative (got {gross})"),
        ));
    }
    if split_percent > 100 {
        return Err(ValidationError::new(
            "commission_split",
            format!("must be between 0 and 100 (got {split_percent})"),
        ));
    }

    let gross = gross.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let agent_share = percent_of(gross, split_percent);

    Ok(CommissionBreakdown {
        gross,
        split_percent,
        agent_share,
        company_share: gross - agent_share,
    })
}

/// Leadership override earned on downline production
///
/// Negative production earns nothing.
#[must_use]
pub fn leadership_override(downline_production: Decimal, bonus_rate: u8) -> Decimal {
    if downline_production <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    percent_of(downline_production, bonus_rate.min(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn sixty_percent_split() {
        let breakdown = split_commission(dec("12500.00"), 60).unwrap();
        assert_eq!(breakdown.agent_share, dec("7500.00"));
        assert_eq!(breakdown.company_share, dec("5000.00"));
    }

    #[test]
    fn shares_sum_to_gross_with_rounding() {
        let breakdown = split_commission(dec("1000.01"), 75).unwrap();
        assert_eq!(breakdown.agent_share, dec("750.01"));
        assert_eq!(breakdown.agent_share + breakdown.company_share, breakdown.gross);
    }

    #[test]
    fn negative_gross_is_rejected() {
        let err = split_commission(dec("-1"), 60).unwrap_err();
        assert_eq!(err.field, "gross");
    }

    #[test]
    fn override_on_downline() {
        assert_eq!(leadership_override(dec("20000"), 5), dec("1000.00"));
        assert_eq!(leadership_override(dec("-50"), 5), Decimal::ZERO);
        assert_eq!(leadership_override(dec("20000"), 0), Decimal::ZERO);
    }
}
