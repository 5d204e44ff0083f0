use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::tables::irmaa_tiers_2025;
use crate::tax::tiers::{lookup_tier, tier_crossing, TierTable};
use crate::types::{with_metadata, ComputationOutput, FilingStatus, Money};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Does an income action (conversion, sale, bonus) push MAGI into a higher
/// Medicare surcharge tier?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrmaaInput {
    pub filing_status: FilingStatus,
    pub magi_before: Money,
    pub magi_after: Money,
    /// Override tiers for a different year; defaults to the 2025 edition.
    #[serde(default)]
    pub tier_table: Option<TierTable>,
}

/// Monthly surcharges for one tier, split by part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSurcharges {
    pub tier_index: usize,
    pub monthly_part_b: Money,
    pub monthly_part_d: Money,
    pub annual_total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrmaaOutput {
    pub crosses: bool,
    pub before: TierSurcharges,
    pub after: TierSurcharges,
    pub monthly_delta: Money,
    pub annual_surcharge_delta: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

fn surcharges_for(index: usize, table: &TierTable) -> TierSurcharges {
    let tier = &table.tiers[index];
    let part_b = tier.monthly_surcharges.first().copied().unwrap_or_default();
    let part_d = tier.monthly_surcharges.get(1).copied().unwrap_or_default();
    TierSurcharges {
        tier_index: index,
        monthly_part_b: part_b,
        monthly_part_d: part_d,
        annual_total: tier.annual_surcharge(),
    }
}

/// Compare the IRMAA tier before and after an income change.
///
/// Crossing is by tier identity: a move inside one tier (including the
/// open-ended top tier) never crosses and its delta is exactly zero.
pub fn analyze_irmaa_impact(input: &IrmaaInput) -> PlanwiseResult<ComputationOutput<IrmaaOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.magi_before < Decimal::ZERO || input.magi_after < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "magi".into(),
            reason: "MAGI must be >= 0".into(),
        });
    }

    let default_table = irmaa_tiers_2025(input.filing_status);
    let table = input.tier_table.as_ref().unwrap_or(&default_table);

    let crossing = tier_crossing(input.magi_before, input.magi_after, table)?;
    let before = surcharges_for(crossing.tier_before, table);
    let after = surcharges_for(crossing.tier_after, table);

    if crossing.crosses && crossing.annual_surcharge_delta > Decimal::ZERO {
        // IRMAA uses MAGI from two years prior
        warnings.push(
            "Surcharge applies two years after the income year (IRMAA lookback)".into(),
        );
        let (_, after_tier) = lookup_tier(input.magi_after, table)?;
        let room = input.magi_after - after_tier.lower_bound;
        if room <= dec!(5_000) {
            warnings.push(format!(
                "MAGI is only {room} over the tier threshold; a small reduction avoids the full surcharge"
            ));
        }
    }

    let output = IrmaaOutput {
        crosses: crossing.crosses,
        monthly_delta: crossing.annual_surcharge_delta / dec!(12),
        annual_surcharge_delta: crossing.annual_surcharge_delta,
        before,
        after,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "IRMAA tier crossing (threshold lookup on MAGI before/after)",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "magi_before": input.magi_before.to_string(),
            "magi_after": input.magi_after.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
