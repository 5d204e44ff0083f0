use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::types::Money;
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One surcharge tier: [lower_bound, upper_bound) carrying one monthly
/// surcharge amount per premium part (IRMAA has Part B and Part D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub monthly_surcharges: Vec<Money>,
}

impl Tier {
    /// Total annualized surcharge across all parts.
    pub fn annual_surcharge(&self) -> Money {
        let monthly: Decimal = self.monthly_surcharges.iter().sum();
        monthly * dec!(12)
    }
}

/// An ordered, contiguous tier table (IRMAA-style stepped fees).
/// Same shape invariants as a bracket table, but tiers carry flat surcharge
/// amounts rather than marginal rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<Tier>,
}

/// Result of comparing the tiers two income values land in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCrossing {
    /// True iff the two values land in different tiers (by identity, not
    /// by surcharge distance).
    pub crosses: bool,
    pub tier_before: usize,
    pub tier_after: usize,
    /// Annualized surcharge in the after-tier minus the before-tier.
    /// Negative when income falls into a cheaper tier.
    pub annual_surcharge_delta: Money,
}

impl TierTable {
    pub fn new(tiers: Vec<Tier>) -> Self {
        TierTable { tiers }
    }

    /// Same structural invariants as `BracketTable::validate`, plus
    /// non-negative surcharge amounts.
    pub fn validate(&self) -> PlanwiseResult<()> {
        if self.tiers.is_empty() {
            return Err(PlanwiseError::InvalidTable(
                "tier table must contain at least one tier".into(),
            ));
        }

        if !self.tiers[0].lower_bound.is_zero() {
            return Err(PlanwiseError::InvalidTable(format!(
                "first tier must start at 0, found {}",
                self.tiers[0].lower_bound
            )));
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.monthly_surcharges.iter().any(|s| *s < Decimal::ZERO) {
                return Err(PlanwiseError::InvalidTable(format!(
                    "tier {} has a negative surcharge",
                    i
                )));
            }

            let is_last = i == self.tiers.len() - 1;
            match tier.upper_bound {
                Some(upper) => {
                    if is_last {
                        return Err(PlanwiseError::InvalidTable(
                            "final tier must be unbounded".into(),
                        ));
                    }
                    if upper <= tier.lower_bound {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "tier {} has upper bound {} <= lower bound {}",
                            i, upper, tier.lower_bound
                        )));
                    }
                    if self.tiers[i + 1].lower_bound != upper {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "tier {} ends at {} but tier {} starts at {}",
                            i,
                            upper,
                            i + 1,
                            self.tiers[i + 1].lower_bound
                        )));
                    }
                }
                None => {
                    if !is_last {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "tier {} is unbounded but is not the final tier",
                            i
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Locate the tier containing `value`. A value past the last defined bound
/// lands in the open-ended top tier; this never fails for non-negative input.
pub fn lookup_tier<'a>(value: Money, table: &'a TierTable) -> PlanwiseResult<(usize, &'a Tier)> {
    table.validate()?;
    if value < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "value".into(),
            reason: format!("tier lookup value must be >= 0, found {value}"),
        });
    }

    for (i, tier) in table.tiers.iter().enumerate() {
        match tier.upper_bound {
            Some(upper) if value >= upper => continue,
            _ => return Ok((i, tier)),
        }
    }

    // Unreachable after validation (final tier is unbounded), but keep the
    // top tier as the answer rather than panicking.
    let last = table.tiers.len() - 1;
    Ok((last, &table.tiers[last]))
}

/// Does moving from `before` to `after` change the surcharge tier?
///
/// `crosses` is identity-based: equal inputs can never cross, and two values
/// inside the open-ended top tier never cross no matter how far apart.
pub fn tier_crossing(
    before: Money,
    after: Money,
    table: &TierTable,
) -> PlanwiseResult<TierCrossing> {
    let (idx_before, tier_before) = lookup_tier(before, table)?;
    let (idx_after, tier_after) = lookup_tier(after, table)?;

    if idx_before == idx_after {
        return Ok(TierCrossing {
            crosses: false,
            tier_before: idx_before,
            tier_after: idx_after,
            annual_surcharge_delta: Decimal::ZERO,
        });
    }

    Ok(TierCrossing {
        crosses: true,
        tier_before: idx_before,
        tier_after: idx_after,
        annual_surcharge_delta: tier_after.annual_surcharge() - tier_before.annual_surcharge(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Three-tier toy table: no surcharge to 100k, 70+12/mo to 200k,
    /// 170+30/mo above.
    fn toy_table() -> TierTable {
        TierTable::new(vec![
            Tier {
                lower_bound: dec!(0),
                upper_bound: Some(dec!(100_000)),
                monthly_surcharges: vec![dec!(0), dec!(0)],
            },
            Tier {
                lower_bound: dec!(100_000),
                upper_bound: Some(dec!(200_000)),
                monthly_surcharges: vec![dec!(70), dec!(12)],
            },
            Tier {
                lower_bound: dec!(200_000),
                upper_bound: None,
                monthly_surcharges: vec![dec!(170), dec!(30)],
            },
        ])
    }

    // ---------------------------------------------------------------
    // 1. Lookup inside each tier
    // ---------------------------------------------------------------
    #[test]
    fn test_lookup_each_tier() {
        let table = toy_table();
        assert_eq!(lookup_tier(dec!(0), &table).unwrap().0, 0);
        assert_eq!(lookup_tier(dec!(99_999.99), &table).unwrap().0, 0);
        // Boundary value belongs to the higher tier (lower bound inclusive)
        assert_eq!(lookup_tier(dec!(100_000), &table).unwrap().0, 1);
        assert_eq!(lookup_tier(dec!(150_000), &table).unwrap().0, 1);
        assert_eq!(lookup_tier(dec!(200_000), &table).unwrap().0, 2);
    }

    // ---------------------------------------------------------------
    // 2. Value past the last bound lands in the open-ended top tier
    // ---------------------------------------------------------------
    #[test]
    fn test_lookup_open_ended_top() {
        let table = toy_table();
        let (idx, tier) = lookup_tier(dec!(10_000_000), &table).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(tier.annual_surcharge(), dec!(200) * dec!(12));
    }

    // ---------------------------------------------------------------
    // 3. Annual surcharge sums all parts and annualizes
    // ---------------------------------------------------------------
    #[test]
    fn test_annual_surcharge() {
        let table = toy_table();
        assert_eq!(table.tiers[1].annual_surcharge(), dec!(82) * dec!(12));
    }

    // ---------------------------------------------------------------
    // 4. Identical values never cross, delta exactly zero
    // ---------------------------------------------------------------
    #[test]
    fn test_same_value_never_crosses() {
        let table = toy_table();
        for v in [dec!(0), dec!(100_000), dec!(500_000)] {
            let crossing = tier_crossing(v, v, &table).unwrap();
            assert!(!crossing.crosses);
            assert_eq!(crossing.annual_surcharge_delta, dec!(0));
        }
    }

    // ---------------------------------------------------------------
    // 5. Upward crossing -> positive delta
    // ---------------------------------------------------------------
    #[test]
    fn test_upward_crossing() {
        let table = toy_table();
        let crossing = tier_crossing(dec!(95_000), dec!(110_000), &table).unwrap();
        assert!(crossing.crosses);
        assert_eq!(crossing.tier_before, 0);
        assert_eq!(crossing.tier_after, 1);
        assert_eq!(crossing.annual_surcharge_delta, dec!(82) * dec!(12));
    }

    // ---------------------------------------------------------------
    // 6. Downward crossing -> negative delta
    // ---------------------------------------------------------------
    #[test]
    fn test_downward_crossing() {
        let table = toy_table();
        let crossing = tier_crossing(dec!(250_000), dec!(150_000), &table).unwrap();
        assert!(crossing.crosses);
        assert!(crossing.annual_surcharge_delta < dec!(0));
    }

    // ---------------------------------------------------------------
    // 7. Both in the top tier: large move, no crossing
    // ---------------------------------------------------------------
    #[test]
    fn test_top_tier_no_crossing() {
        let table = toy_table();
        let crossing = tier_crossing(dec!(500_000), dec!(5_000_000), &table).unwrap();
        assert!(!crossing.crosses);
        assert_eq!(crossing.annual_surcharge_delta, dec!(0));
    }

    // ---------------------------------------------------------------
    // 8. Validation failures
    // ---------------------------------------------------------------
    #[test]
    fn test_validation_rejects_gap() {
        let table = TierTable::new(vec![
            Tier {
                lower_bound: dec!(0),
                upper_bound: Some(dec!(100_000)),
                monthly_surcharges: vec![dec!(0)],
            },
            Tier {
                lower_bound: dec!(120_000), // gap
                upper_bound: None,
                monthly_surcharges: vec![dec!(70)],
            },
        ]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_surcharge() {
        let table = TierTable::new(vec![Tier {
            lower_bound: dec!(0),
            upper_bound: None,
            monthly_surcharges: vec![dec!(-1)],
        }]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_negative_lookup_value_rejected() {
        let table = toy_table();
        assert!(lookup_tier(dec!(-1), &table).is_err());
    }
}
