use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::tables::ltcg_brackets_2025;
use crate::tax::brackets::{incremental_tax, BracketTable};
use crate::types::{with_metadata, ComputationOutput, FilingStatus, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How much portfolio risk sits in one position, and what diversifying costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationInput {
    pub filing_status: FilingStatus,
    pub position_value: Money,
    pub position_cost_basis: Money,
    pub total_portfolio_value: Money,
    /// Ordinary taxable income the sale gains stack on.
    pub ordinary_income: Money,
    /// Years over which a staged sale spreads the gain.
    pub staged_sale_years: u32,
    #[serde(default)]
    pub gains_table: Option<BracketTable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationBand {
    Diversified,
    Elevated,
    Concentrated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationOutput {
    /// Position share of the portfolio; None when the portfolio is empty.
    pub portfolio_share: Option<Rate>,
    pub band: ConcentrationBand,
    pub unrealized_gain: Money,
    /// Gain / basis; None for a zero basis.
    pub gain_ratio: Option<Rate>,
    /// Stacked long-term tax to sell the whole position this year.
    pub tax_sell_all_now: Money,
    /// Total tax selling 1/N per year, each year's slice stacked on the
    /// same ordinary income.
    pub tax_staged_sale: Money,
    pub staged_sale_savings: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Single-issuer share of the portfolio above which the position counts as
/// elevated, then concentrated.
const ELEVATED_SHARE: Decimal = dec!(0.10);
const CONCENTRATED_SHARE: Decimal = dec!(0.25);

/// Measure concentration and price the two exits.
///
/// A staged sale realizes the same total gain in equal annual slices; each
/// slice restarts at the bottom of the gains brackets above the same
/// ordinary income, which is where the savings come from.
pub fn analyze_concentration(
    input: &ConcentrationInput,
) -> PlanwiseResult<ComputationOutput<ConcentrationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.position_value < Decimal::ZERO
        || input.position_cost_basis < Decimal::ZERO
        || input.total_portfolio_value < Decimal::ZERO
    {
        return Err(PlanwiseError::InvalidInput {
            field: "position/portfolio values".into(),
            reason: "values must be >= 0".into(),
        });
    }
    if input.position_value > input.total_portfolio_value {
        return Err(PlanwiseError::InvalidInput {
            field: "position_value".into(),
            reason: "position cannot exceed the portfolio that contains it".into(),
        });
    }
    if input.staged_sale_years == 0 {
        return Err(PlanwiseError::InvalidInput {
            field: "staged_sale_years".into(),
            reason: "staged sale needs at least one year".into(),
        });
    }

    // Zero-denominator guards
    let portfolio_share = if input.total_portfolio_value.is_zero() {
        None
    } else {
        Some(input.position_value / input.total_portfolio_value)
    };
    let unrealized_gain = (input.position_value - input.position_cost_basis).max(Decimal::ZERO);
    let gain_ratio = if input.position_cost_basis.is_zero() {
        None
    } else {
        Some(unrealized_gain / input.position_cost_basis)
    };

    let band = match portfolio_share {
        Some(share) if share >= CONCENTRATED_SHARE => ConcentrationBand::Concentrated,
        Some(share) if share >= ELEVATED_SHARE => ConcentrationBand::Elevated,
        _ => ConcentrationBand::Diversified,
    };
    if band == ConcentrationBand::Concentrated {
        warnings.push("Position exceeds 25% of the portfolio".into());
    }

    let default_table = ltcg_brackets_2025(input.filing_status);
    let table = input.gains_table.as_ref().unwrap_or(&default_table);

    let tax_sell_all_now = incremental_tax(input.ordinary_income, unrealized_gain, table)?;

    // Each year's slice stacks on ordinary income alone; slices don't stack
    // on each other across years
    let slice = unrealized_gain / Decimal::from(input.staged_sale_years);
    let tax_per_year = incremental_tax(input.ordinary_income, slice, table)?;
    let tax_staged_sale = tax_per_year * Decimal::from(input.staged_sale_years);

    let output = ConcentrationOutput {
        portfolio_share,
        band,
        unrealized_gain,
        gain_ratio,
        tax_sell_all_now,
        tax_staged_sale,
        staged_sale_savings: tax_sell_all_now - tax_staged_sale,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equity concentration (portfolio share, stacked gains for lump vs staged sale)",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "ordinary_income": input.ordinary_income.to_string(),
            "staged_sale_years": input.staged_sale_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base_input() -> ConcentrationInput {
        ConcentrationInput {
            filing_status: FilingStatus::Single,
            position_value: dec!(400_000),
            position_cost_basis: dec!(100_000),
            total_portfolio_value: dec!(1_000_000),
            ordinary_income: dec!(100_000),
            staged_sale_years: 3,
            gains_table: None,
        }
    }

    // ---------------------------------------------------------------
    // 1. Bands by portfolio share
    // ---------------------------------------------------------------
    #[test]
    fn test_bands() {
        let output = analyze_concentration(&base_input()).unwrap();
        assert_eq!(output.result.portfolio_share, Some(dec!(0.40)));
        assert_eq!(output.result.band, ConcentrationBand::Concentrated);
        assert!(!output.warnings.is_empty());

        let mut input = base_input();
        input.position_value = dec!(150_000);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.band, ConcentrationBand::Elevated);

        let mut input = base_input();
        input.position_value = dec!(50_000);
        input.position_cost_basis = dec!(20_000);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.band, ConcentrationBand::Diversified);
    }

    // ---------------------------------------------------------------
    // 2. Staged sale saves tax when the lump sale climbs brackets
    // ---------------------------------------------------------------
    #[test]
    fn test_staged_sale_savings() {
        let mut input = base_input();
        // Big gain on top of high income reaches the 20% tier when lumped
        input.ordinary_income = dec!(300_000);
        input.position_value = dec!(600_000);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.unrealized_gain, dec!(500_000));
        assert!(result.tax_sell_all_now > result.tax_staged_sale);
        assert!(result.staged_sale_savings > dec!(0));
    }

    // ---------------------------------------------------------------
    // 3. Same-bracket gain: staging changes nothing
    // ---------------------------------------------------------------
    #[test]
    fn test_staging_no_benefit_within_bracket() {
        // 100k income + 60k gain stays entirely in the 15% tier
        let mut input = base_input();
        input.position_value = dec!(160_000);
        input.position_cost_basis = dec!(100_000);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.staged_sale_savings, dec!(0));
    }

    // ---------------------------------------------------------------
    // 4. Zero denominators guarded
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_guards() {
        let mut input = base_input();
        input.position_value = dec!(0);
        input.position_cost_basis = dec!(0);
        input.total_portfolio_value = dec!(0);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.portfolio_share, None);
        assert_eq!(result.gain_ratio, None);
        assert_eq!(result.tax_sell_all_now, dec!(0));
    }

    // ---------------------------------------------------------------
    // 5. Underwater position: no gain, no tax
    // ---------------------------------------------------------------
    #[test]
    fn test_underwater_position() {
        let mut input = base_input();
        input.position_cost_basis = dec!(500_000);
        let result = analyze_concentration(&input).unwrap().result;
        assert_eq!(result.unrealized_gain, dec!(0));
        assert_eq!(result.tax_sell_all_now, dec!(0));
        assert_eq!(result.tax_staged_sale, dec!(0));
    }

    // ---------------------------------------------------------------
    // 6. Validation
    // ---------------------------------------------------------------
    #[test]
    fn test_validation() {
        let mut input = base_input();
        input.position_value = dec!(2_000_000);
        assert!(analyze_concentration(&input).is_err());

        let mut input = base_input();
        input.staged_sale_years = 0;
        assert!(analyze_concentration(&input).is_err());
    }
}
