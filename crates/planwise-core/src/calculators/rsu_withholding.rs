use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::tables::{
    ordinary_brackets_2025, SUPPLEMENTAL_WAGE_THRESHOLD, SUPPLEMENTAL_WITHHOLDING_RATE,
    SUPPLEMENTAL_WITHHOLDING_RATE_HIGH,
};
use crate::tax::brackets::{incremental_tax, marginal_rate, BracketTable};
use crate::types::{with_metadata, ComputationOutput, FilingStatus, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Will the flat supplemental withholding on an RSU vest cover the real
/// marginal tax, or is there an April surprise?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsuWithholdingInput {
    pub filing_status: FilingStatus,
    pub shares_vesting: Money,
    pub share_price: Money,
    /// Ordinary taxable income apart from this vest.
    pub other_taxable_income: Money,
    /// Supplemental wages already paid this year (prior vests, bonuses);
    /// determines where the 37% mandatory rate starts.
    #[serde(default)]
    pub ytd_supplemental_wages: Money,
    /// Shortfalls above this trigger the estimated-payment warning.
    pub materiality_threshold: Money,
    #[serde(default)]
    pub ordinary_table: Option<BracketTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsuWithholdingOutput {
    pub vest_value: Money,
    pub withheld: Money,
    /// Blended withholding rate actually applied.
    pub withholding_rate: Rate,
    /// True stacked tax on the vest on top of other income.
    pub actual_tax: Money,
    pub actual_marginal_rate: Rate,
    /// actual_tax - withheld; positive means under-withheld.
    pub shortfall: Money,
    pub under_withheld: bool,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare flat supplemental withholding against the true stacked tax.
///
/// Employers withhold 22% on supplemental wages and must withhold 37% on
/// the portion of cumulative supplemental wages above $1M. The real
/// liability is the vest stacked on top of the rest of the year's income.
pub fn analyze_rsu_withholding(
    input: &RsuWithholdingInput,
) -> PlanwiseResult<ComputationOutput<RsuWithholdingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.shares_vesting <= Decimal::ZERO || input.share_price <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "shares_vesting/share_price".into(),
            reason: "vest must have positive shares and price".into(),
        });
    }
    if input.ytd_supplemental_wages < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "ytd_supplemental_wages".into(),
            reason: "YTD supplemental wages must be >= 0".into(),
        });
    }

    let vest_value = input.shares_vesting * input.share_price;

    // Split the vest at the $1M cumulative supplemental-wage line
    let below_threshold = (SUPPLEMENTAL_WAGE_THRESHOLD - input.ytd_supplemental_wages)
        .max(Decimal::ZERO)
        .min(vest_value);
    let above_threshold = vest_value - below_threshold;
    let withheld = below_threshold * SUPPLEMENTAL_WITHHOLDING_RATE
        + above_threshold * SUPPLEMENTAL_WITHHOLDING_RATE_HIGH;
    let withholding_rate = withheld / vest_value;

    let default_table = ordinary_brackets_2025(input.filing_status);
    let table = input.ordinary_table.as_ref().unwrap_or(&default_table);

    let actual_tax = incremental_tax(input.other_taxable_income, vest_value, table)?;
    let actual_marginal_rate = marginal_rate(input.other_taxable_income + vest_value, table)?;

    let shortfall = actual_tax - withheld;
    let under_withheld = shortfall > Decimal::ZERO;
    if shortfall > input.materiality_threshold {
        warnings.push(format!(
            "Withholding is short by {shortfall}; consider a quarterly estimated payment"
        ));
    }

    let output = RsuWithholdingOutput {
        vest_value,
        withheld,
        withholding_rate,
        actual_tax,
        actual_marginal_rate,
        shortfall,
        under_withheld,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "RSU withholding gap (flat supplemental rates vs stacked marginal tax)",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "other_taxable_income": input.other_taxable_income.to_string(),
            "ytd_supplemental_wages": input.ytd_supplemental_wages.to_string(),
            "supplemental_rate": SUPPLEMENTAL_WITHHOLDING_RATE.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
