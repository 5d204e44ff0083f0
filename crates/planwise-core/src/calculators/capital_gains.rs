use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::tables::{ltcg_brackets_2025, niit_threshold, ordinary_brackets_2025, NIIT_RATE};
use crate::tax::brackets::{incremental_tax, marginal_rate, BracketTable};
use crate::types::{with_metadata, ComputationOutput, FilingStatus, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingPeriod {
    ShortTerm,
    LongTerm,
}

/// A sale of appreciated assets on top of existing ordinary income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalGainsInput {
    pub filing_status: FilingStatus,
    /// Taxable ordinary income before the sale.
    pub ordinary_income: Money,
    pub sale_price: Money,
    pub cost_basis: Money,
    pub holding_period: HoldingPeriod,
    /// Flat state rate applied to the whole gain, as a fraction.
    #[serde(default)]
    pub state_tax_rate: Option<Rate>,
    /// Override tables for a different tax year; defaults to the shipped
    /// 2025 edition.
    #[serde(default)]
    pub gains_table: Option<BracketTable>,
    #[serde(default)]
    pub ordinary_table: Option<BracketTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalGainsOutput {
    pub gain: Money,
    /// Gain / cost basis; None when the basis is zero.
    pub gain_ratio: Option<Rate>,
    pub federal_tax: Money,
    pub niit: Money,
    pub state_tax: Money,
    pub total_tax: Money,
    /// Total tax / gain; zero for a zero gain.
    pub effective_rate_on_gain: Rate,
    /// Rate applied to the last dollar of gain.
    pub top_rate_applied: Rate,
    pub net_proceeds: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Tax a sale's gain stacked on top of existing ordinary income.
///
/// Long-term gains stack against the preferential 0/15/20 thresholds with
/// ordinary income filling the lower brackets first; short-term gains are
/// ordinary income. NIIT applies to investment income above the statutory
/// MAGI threshold; an optional flat state rate covers the whole gain.
pub fn calculate_capital_gains(
    input: &CapitalGainsInput,
) -> PlanwiseResult<ComputationOutput<CapitalGainsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.sale_price < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "sale_price".into(),
            reason: "sale price must be >= 0".into(),
        });
    }
    if input.cost_basis < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "cost_basis".into(),
            reason: "cost basis must be >= 0".into(),
        });
    }
    if let Some(rate) = input.state_tax_rate {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(PlanwiseError::InvalidInput {
                field: "state_tax_rate".into(),
                reason: format!("state rate must be within [0, 1), found {rate}"),
            });
        }
    }

    let gain = input.sale_price - input.cost_basis;
    if gain < Decimal::ZERO {
        warnings.push("Sale is at a loss; no tax due (loss harvesting not modeled here)".into());
    }
    let taxable_gain = gain.max(Decimal::ZERO);

    // Gain ratio guards a zero basis (e.g., RSUs vested at zero recorded basis)
    let gain_ratio = if input.cost_basis.is_zero() {
        None
    } else {
        Some(gain / input.cost_basis)
    };

    let default_gains = ltcg_brackets_2025(input.filing_status);
    let default_ordinary = ordinary_brackets_2025(input.filing_status);
    let gains_table = input.gains_table.as_ref().unwrap_or(&default_gains);
    let ordinary_table = input.ordinary_table.as_ref().unwrap_or(&default_ordinary);

    // Stacked federal tax: the gain fills brackets above ordinary income
    let (federal_tax, top_rate_applied) = match input.holding_period {
        HoldingPeriod::LongTerm => (
            incremental_tax(input.ordinary_income, taxable_gain, gains_table)?,
            marginal_rate(input.ordinary_income + taxable_gain, gains_table)?,
        ),
        HoldingPeriod::ShortTerm => (
            incremental_tax(input.ordinary_income, taxable_gain, ordinary_table)?,
            marginal_rate(input.ordinary_income + taxable_gain, ordinary_table)?,
        ),
    };

    // NIIT: 3.8% on the lesser of the gain and MAGI over the threshold
    let magi = input.ordinary_income + taxable_gain;
    let threshold = niit_threshold(input.filing_status);
    let niit = if magi > threshold && taxable_gain > Decimal::ZERO {
        taxable_gain.min(magi - threshold) * NIIT_RATE
    } else {
        Decimal::ZERO
    };

    let state_tax = input.state_tax_rate.unwrap_or(Decimal::ZERO) * taxable_gain;

    let total_tax = federal_tax + niit + state_tax;
    let effective_rate_on_gain = if taxable_gain.is_zero() {
        Decimal::ZERO
    } else {
        total_tax / taxable_gain
    };

    let output = CapitalGainsOutput {
        gain,
        gain_ratio,
        federal_tax,
        niit,
        state_tax,
        total_tax,
        effective_rate_on_gain,
        top_rate_applied,
        net_proceeds: input.sale_price - total_tax,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Capital gains (bracket stacking on top of ordinary income, NIIT, flat state rate)",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "holding_period": input.holding_period,
            "ordinary_income": input.ordinary_income.to_string(),
            "niit_threshold": threshold.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
