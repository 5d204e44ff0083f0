use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::projection::break_even::{find_break_even_from_years, BreakEvenOutcome};
use crate::projection::compare::{compare, ScenarioComparison, ScenarioOutcome};
use crate::projection::compounding::{project, ProjectionInputs, YearEntry};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Buy a home, or keep renting and invest the difference?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual principal paid down (equity buildup beyond the down payment).
    pub annual_principal_paydown: Money,
    /// Taxes, insurance, maintenance, and mortgage interest per year --
    /// the owning costs that build no equity.
    pub annual_owning_costs: Money,
    /// First-year rent; later years escalate by `rent_growth_rate`.
    pub annual_rent: Money,
    /// Annual rent escalation, as a fraction. Zero holds rent flat.
    #[serde(default)]
    pub rent_growth_rate: Rate,
    pub home_appreciation_rate: Rate,
    pub investment_return_rate: Rate,
    /// Annual tax drag on the renter's taxable investments.
    pub investment_tax_drag: Rate,
    pub horizon_years: u32,
    pub materiality_threshold: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyOutput {
    pub buyer_terminal_equity: Money,
    pub renter_terminal_portfolio: Money,
    pub break_even: BreakEvenOutcome,
    pub comparison: ScenarioComparison,
    pub buyer_years: Vec<YearEntry>,
    pub renter_years: Vec<YearEntry>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare owner equity buildup against renting and investing the difference.
///
/// Buyer path: the down payment plus annual principal paydown, appreciating
/// at the home rate. Renter path: the down payment invested up front plus
/// each year's cash-flow difference (all owner outlays minus that year's
/// escalated rent), growing at the investment rate net of annual tax drag.
/// Rising rent shrinks the invested difference year by year and can turn it
/// into a drawdown. Appreciation is applied to accumulated equity, not the
/// leveraged full price; sale costs and the primary-residence gain exclusion
/// are out of scope.
pub fn analyze_rent_vs_buy(
    input: &RentVsBuyInput,
) -> PlanwiseResult<ComputationOutput<RentVsBuyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.home_price <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "home_price".into(),
            reason: "home price must be > 0".into(),
        });
    }
    if input.down_payment < Decimal::ZERO || input.down_payment > input.home_price {
        return Err(PlanwiseError::InvalidInput {
            field: "down_payment".into(),
            reason: "down payment must be within [0, home_price]".into(),
        });
    }
    if input.annual_rent < Decimal::ZERO
        || input.annual_owning_costs < Decimal::ZERO
        || input.annual_principal_paydown < Decimal::ZERO
    {
        return Err(PlanwiseError::InvalidInput {
            field: "annual amounts".into(),
            reason: "annual rent, owning costs, and paydown must be >= 0".into(),
        });
    }
    if input.rent_growth_rate <= Decimal::NEGATIVE_ONE {
        return Err(PlanwiseError::InvalidInput {
            field: "rent_growth_rate".into(),
            reason: "rent growth must be greater than -100%".into(),
        });
    }

    // What the renter has left over in year one after paying rent instead of
    // carrying the home. Negative when renting already costs more.
    let owner_outlay = input.annual_owning_costs + input.annual_principal_paydown;
    if owner_outlay - input.annual_rent < Decimal::ZERO {
        warnings.push(
            "Renting costs more per year than owning; the renter draws down the invested \
             down payment"
                .into(),
        );
    }

    let buyer_years = project(&ProjectionInputs {
        starting_balance: input.down_payment,
        annual_contribution: input.annual_principal_paydown,
        growth_rate: input.home_appreciation_rate,
        horizon_years: input.horizon_years,
        tax_drag: None,
        start_age: None,
        terminal_age: None,
    })?;

    // Rent escalates, so the renter's contribution changes every year:
    // chain single-year projections, each seeded with the prior balance
    let mut renter_years: Vec<YearEntry> = Vec::with_capacity(input.horizon_years as usize);
    let mut renter_balance = input.down_payment;
    let mut rent = input.annual_rent;
    for _ in 0..input.horizon_years {
        let projected = project(&ProjectionInputs {
            starting_balance: renter_balance,
            annual_contribution: owner_outlay - rent,
            growth_rate: input.investment_return_rate,
            horizon_years: 1,
            tax_drag: Some(input.investment_tax_drag),
            start_age: None,
            terminal_age: None,
        })?;
        renter_balance = projected
            .last()
            .map(|y| y.ending_balance)
            .unwrap_or(renter_balance);
        renter_years.extend(projected);
        rent *= Decimal::ONE + input.rent_growth_rate;
    }
    for (i, yr) in renter_years.iter_mut().enumerate() {
        yr.year = (i + 1) as u32;
    }

    let solved = find_break_even_from_years(
        &buyer_years,
        Decimal::ZERO,
        &renter_years,
        Decimal::ZERO,
    )?;

    let comparison = compare(
        &[
            ScenarioOutcome {
                name: "buy".into(),
                years: buyer_years.clone(),
                crossed_surcharge_tier: false,
            },
            ScenarioOutcome {
                name: "rent_and_invest".into(),
                years: renter_years.clone(),
                crossed_surcharge_tier: false,
            },
        ],
        input.materiality_threshold,
    )?;

    let buyer_terminal = buyer_years
        .last()
        .map(|y| y.ending_balance)
        .unwrap_or_default();
    let renter_terminal = renter_years
        .last()
        .map(|y| y.ending_balance)
        .unwrap_or_default();

    let output = RentVsBuyOutput {
        buyer_terminal_equity: buyer_terminal,
        renter_terminal_portfolio: renter_terminal,
        break_even: solved.outcome,
        comparison,
        buyer_years,
        renter_years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs buy (owner equity path vs invest-the-difference path with escalating rent, \
         lockstep break-even)",
        &serde_json::json!({
            "home_price": input.home_price.to_string(),
            "down_payment": input.down_payment.to_string(),
            "rent_growth_rate": input.rent_growth_rate.to_string(),
            "home_appreciation_rate": input.home_appreciation_rate.to_string(),
            "investment_return_rate": input.investment_return_rate.to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn base_input() -> RentVsBuyInput {
        RentVsBuyInput {
            home_price: dec!(600_000),
            down_payment: dec!(120_000),
            annual_principal_paydown: dec!(12_000),
            annual_owning_costs: dec!(30_000),
            annual_rent: dec!(30_000),
            rent_growth_rate: dec!(0),
            home_appreciation_rate: dec!(0.04),
            investment_return_rate: dec!(0.07),
            investment_tax_drag: dec!(0.15),
            horizon_years: 30,
            materiality_threshold: dec!(25_000),
        }
    }

    // ---------------------------------------------------------------
    // 1. Both paths produce full-horizon sequences
    // ---------------------------------------------------------------
    #[test]
    fn test_full_horizon() {
        let result = analyze_rent_vs_buy(&base_input()).unwrap().result;
        assert_eq!(result.buyer_years.len(), 30);
        assert_eq!(result.renter_years.len(), 30);
        assert!(result.buyer_terminal_equity > dec!(0));
        assert!(result.renter_terminal_portfolio > dec!(0));
    }

    // ---------------------------------------------------------------
    // 2. Equal annual difference: renter compounds the same savings
    // ---------------------------------------------------------------
    #[test]
    fn test_renter_difference_invested() {
        let result = analyze_rent_vs_buy(&base_input()).unwrap().result;
        // Owner outlay 42k vs flat 30k rent: renter invests 12k every year
        assert!(result
            .renter_years
            .iter()
            .all(|y| y.contribution == dec!(12_000)));
    }

    // ---------------------------------------------------------------
    // 3. Rising rent shrinks the invested difference year by year
    // ---------------------------------------------------------------
    #[test]
    fn test_rent_escalation_shrinks_contributions() {
        let mut input = base_input();
        input.rent_growth_rate = dec!(0.10);
        input.investment_return_rate = dec!(0);
        input.investment_tax_drag = dec!(0);
        input.horizon_years = 3;
        let result = analyze_rent_vs_buy(&input).unwrap().result;

        // Outlay stays 42k while rent runs 30k, 33k, 36.3k
        assert_eq!(result.renter_years[0].contribution, dec!(12_000));
        assert_eq!(result.renter_years[1].contribution, dec!(9_000));
        assert_eq!(result.renter_years[2].contribution, dec!(5_700));
        assert_eq!(
            result.renter_terminal_portfolio,
            dec!(120_000) + dec!(12_000) + dec!(9_000) + dec!(5_700)
        );
        // Chained years re-index as one schedule
        assert_eq!(result.renter_years[2].year, 3);
    }

    // ---------------------------------------------------------------
    // 4. High appreciation: buying wins and breaks even in year one
    // ---------------------------------------------------------------
    #[test]
    fn test_buy_wins_with_high_appreciation() {
        let mut input = base_input();
        input.home_appreciation_rate = dec!(0.09);
        input.investment_return_rate = dec!(0.04);
        let result = analyze_rent_vs_buy(&input).unwrap().result;
        assert_eq!(result.comparison.winner, "buy");
        assert!(matches!(
            result.break_even,
            BreakEvenOutcome::CrossesAt { .. }
        ));
    }

    // ---------------------------------------------------------------
    // 5. Cheap rent and strong markets: buying never catches up
    // ---------------------------------------------------------------
    #[test]
    fn test_rent_wins_when_cheap() {
        let mut input = base_input();
        input.annual_rent = dec!(12_000);
        input.home_appreciation_rate = dec!(0.02);
        input.investment_return_rate = dec!(0.09);
        input.investment_tax_drag = dec!(0);
        let result = analyze_rent_vs_buy(&input).unwrap().result;
        assert_eq!(result.comparison.winner, "rent_and_invest");
        assert!(matches!(result.break_even, BreakEvenOutcome::Never { .. }));
    }

    // ---------------------------------------------------------------
    // 6. Expensive rent warns about drawdown
    // ---------------------------------------------------------------
    #[test]
    fn test_expensive_rent_warning() {
        let mut input = base_input();
        input.annual_rent = dec!(60_000);
        let output = analyze_rent_vs_buy(&input).unwrap();
        assert!(!output.warnings.is_empty());
        // Renter withdraws the shortfall each year
        assert!(output.result.renter_years[0].contribution < dec!(0));
    }

    // ---------------------------------------------------------------
    // 7. Validation
    // ---------------------------------------------------------------
    #[test]
    fn test_validation() {
        let mut input = base_input();
        input.down_payment = dec!(700_000);
        assert!(analyze_rent_vs_buy(&input).is_err());

        let mut input = base_input();
        input.home_price = dec!(0);
        assert!(analyze_rent_vs_buy(&input).is_err());

        let mut input = base_input();
        input.annual_rent = dec!(-1);
        assert!(analyze_rent_vs_buy(&input).is_err());
    }
}
