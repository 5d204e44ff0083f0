use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::projection::break_even::{
    find_break_even, AdvantageYear, BreakEvenOutcome, BreakEvenPath,
};
use crate::projection::compounding::ProjectionInputs;
use crate::tables::ordinary_brackets_2025;
use crate::tax::brackets::{incremental_tax, BracketTable};
use crate::types::{with_metadata, ComputationOutput, FilingStatus, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Convert traditional dollars to Roth now, or leave them deferred?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RothConversionInput {
    pub filing_status: FilingStatus,
    pub current_age: u32,
    /// Amount moved from traditional to Roth this year.
    pub conversion_amount: Money,
    /// Taxable ordinary income the conversion stacks on top of.
    pub current_taxable_income: Money,
    /// Expected marginal rate on traditional withdrawals in retirement,
    /// as a fraction.
    pub retirement_tax_rate: Rate,
    /// Fractional annual growth applied identically to both paths.
    pub growth_rate: Rate,
    /// Simulate until this age; the conventional planning horizon is 90.
    pub horizon_age: u32,
    /// When true (the default) the conversion tax is paid out of the
    /// converted dollars, shrinking the Roth path's starting balance.
    #[serde(default = "default_true")]
    pub pay_tax_from_conversion: bool,
    /// Override table for a different tax year.
    #[serde(default)]
    pub ordinary_table: Option<BracketTable>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RothConversionOutput {
    /// Tax due now, stacked on current income across however many brackets
    /// the conversion spans.
    pub conversion_tax: Money,
    /// conversion_tax / conversion_amount.
    pub effective_conversion_rate: Rate,
    pub roth_starting_balance: Money,
    pub break_even: BreakEvenOutcome,
    pub years: Vec<AdvantageYear>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Find the age at which converting now beats deferring.
///
/// Path A: the conversion (net of tax when paid from the converted funds)
/// growing tax-free. Path B: the same dollars left traditional, growing
/// identically but taxed at the expected retirement rate on withdrawal.
/// The conversion tax itself is stacked via the progressive table, never a
/// single flat rate.
pub fn analyze_roth_conversion(
    input: &RothConversionInput,
) -> PlanwiseResult<ComputationOutput<RothConversionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.conversion_amount <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "conversion_amount".into(),
            reason: "conversion amount must be > 0".into(),
        });
    }
    if input.horizon_age <= input.current_age {
        return Err(PlanwiseError::InvalidInput {
            field: "horizon_age".into(),
            reason: "horizon_age must be greater than current_age".into(),
        });
    }
    if input.retirement_tax_rate < Decimal::ZERO || input.retirement_tax_rate >= Decimal::ONE {
        return Err(PlanwiseError::InvalidInput {
            field: "retirement_tax_rate".into(),
            reason: "retirement tax rate must be within [0, 1)".into(),
        });
    }

    let default_table = ordinary_brackets_2025(input.filing_status);
    let table = input.ordinary_table.as_ref().unwrap_or(&default_table);

    let conversion_tax = incremental_tax(
        input.current_taxable_income,
        input.conversion_amount,
        table,
    )?;
    let effective_conversion_rate = conversion_tax / input.conversion_amount;

    if effective_conversion_rate >= input.retirement_tax_rate {
        warnings.push(format!(
            "Conversion taxed at {:.1}% today vs {:.1}% expected in retirement; \
             break-even depends entirely on tax-free growth",
            effective_conversion_rate * Decimal::ONE_HUNDRED,
            input.retirement_tax_rate * Decimal::ONE_HUNDRED,
        ));
    }

    let roth_starting_balance = if input.pay_tax_from_conversion {
        input.conversion_amount - conversion_tax
    } else {
        warnings.push(
            "Conversion tax paid from outside funds; their forgone growth is not modeled".into(),
        );
        input.conversion_amount
    };

    let horizon_years = input.horizon_age - input.current_age;

    let convert_path = BreakEvenPath {
        label: "convert_now".into(),
        projection: ProjectionInputs {
            starting_balance: roth_starting_balance,
            annual_contribution: Decimal::ZERO,
            growth_rate: input.growth_rate,
            horizon_years,
            tax_drag: None,
            start_age: Some(input.current_age),
            terminal_age: None,
        },
        withdrawal_tax_rate: Decimal::ZERO,
    };
    let defer_path = BreakEvenPath {
        label: "stay_traditional".into(),
        projection: ProjectionInputs {
            starting_balance: input.conversion_amount,
            annual_contribution: Decimal::ZERO,
            growth_rate: input.growth_rate,
            horizon_years,
            tax_drag: None,
            start_age: Some(input.current_age),
            terminal_age: None,
        },
        withdrawal_tax_rate: input.retirement_tax_rate,
    };

    let solved = find_break_even(&convert_path, &defer_path)?;

    let output = RothConversionOutput {
        conversion_tax,
        effective_conversion_rate,
        roth_starting_balance,
        break_even: solved.outcome,
        years: solved.years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Roth conversion break-even (stacked conversion tax, lockstep after-tax paths)",
        &serde_json::json!({
            "filing_status": input.filing_status,
            "current_age": input.current_age,
            "horizon_age": input.horizon_age,
            "growth_rate": input.growth_rate.to_string(),
            "retirement_tax_rate": input.retirement_tax_rate.to_string(),
            "pay_tax_from_conversion": input.pay_tax_from_conversion,
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
    use rust_decimal_macros::dec;

    /// Age 45, $50k conversion stacked on $50k income (22% bracket),
    /// 32% expected retirement rate, 7% growth, horizon age 90.
    fn base_input() -> RothConversionInput {
        RothConversionInput {
            filing_status: FilingStatus::Single,
            current_age: 45,
            conversion_amount: dec!(50_000),
            current_taxable_income: dec!(50_000),
            retirement_tax_rate: dec!(0.32),
            growth_rate: dec!(0.07),
            horizon_age: 90,
            pay_tax_from_conversion: true,
            ordinary_table: None,
        }
    }

    // ---------------------------------------------------------------
    // 1. Conversion tax stacks across the 22% bracket
    // ---------------------------------------------------------------
    #[test]
    fn test_conversion_tax_stacked() {
        let result = analyze_roth_conversion(&base_input()).unwrap().result;
        // 50k conversion on 50k income: all inside the 22% bracket
        // (48_475 to 103_350 for 2025 single)
        assert_eq!(result.conversion_tax, dec!(11_000));
        assert_eq!(result.effective_conversion_rate, dec!(0.22));
        assert_eq!(result.roth_starting_balance, dec!(39_000));
    }

    // ---------------------------------------------------------------
    // 2. Break-even age strictly above current age and at most 90
    // ---------------------------------------------------------------
    #[test]
    fn test_break_even_age_in_range() {
        let result = analyze_roth_conversion(&base_input()).unwrap().result;
        match result.break_even {
            BreakEvenOutcome::CrossesAt { age, .. } => {
                let age = age.expect("paths carry ages");
                assert!(age > 45, "break-even age {age} must exceed current age");
                assert!(age <= 90, "break-even age {age} must be within horizon");
            }
            BreakEvenOutcome::Never { .. } => {
                panic!("22% now vs 32% later at 7% growth must break even")
            }
        }
    }

    // ---------------------------------------------------------------
    // 3. Higher rate now than later: conversion never catches up
    // ---------------------------------------------------------------
    #[test]
    fn test_never_when_rates_invert() {
        let mut input = base_input();
        // 35% effective now vs 10% later: converting is strictly worse
        input.current_taxable_income = dec!(300_000);
        input.retirement_tax_rate = dec!(0.10);
        let output = analyze_roth_conversion(&input).unwrap();
        assert!(matches!(
            output.result.break_even,
            BreakEvenOutcome::Never { .. }
        ));
        assert!(!output.warnings.is_empty());
    }

    // ---------------------------------------------------------------
    // 4. Taxes paid outside: Roth path keeps the full conversion
    // ---------------------------------------------------------------
    #[test]
    fn test_pay_tax_outside() {
        let mut input = base_input();
        input.pay_tax_from_conversion = false;
        let output = analyze_roth_conversion(&input).unwrap();
        assert_eq!(output.result.roth_starting_balance, dec!(50_000));
        // Full 50k tax-free beats 34k after-tax immediately
        assert!(matches!(
            output.result.break_even,
            BreakEvenOutcome::CrossesAt { year: 1, .. }
        ));
    }

    // ---------------------------------------------------------------
    // 5. Idempotent
    // ---------------------------------------------------------------
    #[test]
    fn test_idempotent() {
        let first = analyze_roth_conversion(&base_input()).unwrap().result;
        let second = analyze_roth_conversion(&base_input()).unwrap().result;
        assert_eq!(first.break_even, second.break_even);
        assert_eq!(first.years, second.years);
    }

    // ---------------------------------------------------------------
    // 6. Validation failures
    // ---------------------------------------------------------------
    #[test]
    fn test_validation() {
        let mut input = base_input();
        input.conversion_amount = dec!(0);
        assert!(analyze_roth_conversion(&input).is_err());

        let mut input = base_input();
        input.horizon_age = 45;
        assert!(analyze_roth_conversion(&input).is_err());

        let mut input = base_input();
        input.retirement_tax_rate = dec!(1);
        assert!(analyze_roth_conversion(&input).is_err());
    }

    // ---------------------------------------------------------------
    // 7. Year-by-year trail spans the horizon when no early exit
    // ---------------------------------------------------------------
    #[test]
    fn test_year_trail_full_horizon() {
        let result = analyze_roth_conversion(&base_input()).unwrap().result;
        assert_eq!(result.years.len(), 45);
        assert_eq!(result.years.last().unwrap().age, Some(90));
    }
}
