use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::projection::compare::{compare, ScenarioComparison, ScenarioOutcome};
use crate::projection::compounding::{project, ProjectionInputs, YearEntry};
use crate::tables::ContributionLimits;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Route after-tax 401(k) dollars through an in-plan Roth conversion, or
/// invest the same dollars in a taxable brokerage account?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MegaBackdoorInput {
    /// After-tax dollars contributed each year (the 415(c) window above the
    /// elective deferral and any employer match).
    pub annual_after_tax_contribution: Money,
    pub growth_rate: Rate,
    pub horizon_years: u32,
    /// Fraction of each year's growth taxed annually in the brokerage
    /// alternative (dividends and distributed gains).
    pub annual_tax_drag: Rate,
    /// Advantage below this is reported as effectively equivalent.
    pub materiality_threshold: Money,
    #[serde(default)]
    pub current_age: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MegaBackdoorOutput {
    pub roth_terminal_balance: Money,
    pub taxable_terminal_balance: Money,
    pub roth_advantage: Money,
    pub comparison: ScenarioComparison,
    pub roth_years: Vec<YearEntry>,
    pub taxable_years: Vec<YearEntry>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project the two destinations for the same after-tax dollars.
///
/// Both paths contribute identically; the Roth sub-balance compounds
/// untaxed while the taxable sub-balance loses a slice of each year's
/// growth to tax. The gap at the horizon is the mega-backdoor advantage.
pub fn analyze_mega_backdoor(
    input: &MegaBackdoorInput,
) -> PlanwiseResult<ComputationOutput<MegaBackdoorOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.annual_after_tax_contribution <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "annual_after_tax_contribution".into(),
            reason: "contribution must be > 0".into(),
        });
    }

    let limits = ContributionLimits::year_2025();
    let window = limits.overall_limit - limits.elective_deferral;
    if input.annual_after_tax_contribution > window {
        warnings.push(format!(
            "Contribution exceeds the {} after-tax window under the {} overall limit \
             (before employer match)",
            window, limits.overall_limit
        ));
    }

    let roth_inputs = ProjectionInputs {
        starting_balance: Decimal::ZERO,
        annual_contribution: input.annual_after_tax_contribution,
        growth_rate: input.growth_rate,
        horizon_years: input.horizon_years,
        tax_drag: None,
        start_age: input.current_age,
        terminal_age: None,
    };
    let taxable_inputs = ProjectionInputs {
        tax_drag: Some(input.annual_tax_drag),
        ..roth_inputs.clone()
    };

    let roth_years = project(&roth_inputs)?;
    let taxable_years = project(&taxable_inputs)?;

    let comparison = compare(
        &[
            ScenarioOutcome {
                name: "mega_backdoor_roth".into(),
                years: roth_years.clone(),
                crossed_surcharge_tier: false,
            },
            ScenarioOutcome {
                name: "taxable_brokerage".into(),
                years: taxable_years.clone(),
                crossed_surcharge_tier: false,
            },
        ],
        input.materiality_threshold,
    )?;

    let roth_terminal = roth_years
        .last()
        .map(|y| y.ending_balance)
        .unwrap_or_default();
    let taxable_terminal = taxable_years
        .last()
        .map(|y| y.ending_balance)
        .unwrap_or_default();

    let output = MegaBackdoorOutput {
        roth_terminal_balance: roth_terminal,
        taxable_terminal_balance: taxable_terminal,
        roth_advantage: roth_terminal - taxable_terminal,
        comparison,
        roth_years,
        taxable_years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mega-backdoor Roth vs taxable brokerage (dual sub-balance projection)",
        &serde_json::json!({
            "annual_after_tax_contribution": input.annual_after_tax_contribution.to_string(),
            "growth_rate": input.growth_rate.to_string(),
            "annual_tax_drag": input.annual_tax_drag.to_string(),
            "horizon_years": input.horizon_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
