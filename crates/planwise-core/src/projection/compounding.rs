use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

/// Hard cap on simulated horizons. Anything longer than a century-plus of
/// years is a caller bug, not a plan.
pub const MAX_HORIZON_YEARS: u32 = 120;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for a single compounding path. Owned by the caller, created fresh
/// per invocation, never mutated by the projector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub starting_balance: Money,
    /// Net annual contribution; negative models a withdrawal.
    pub annual_contribution: Money,
    /// Fractional growth rate (0.07 = 7%).
    pub growth_rate: Rate,
    pub horizon_years: u32,
    /// Fraction of each year's positive growth lost to tax (taxable-account
    /// dividend/gain drag). None or zero for tax-advantaged balances.
    #[serde(default)]
    pub tax_drag: Option<Rate>,
    /// Age at year zero; carried into each YearEntry when present.
    #[serde(default)]
    pub start_age: Option<u32>,
    /// Stop the projection early once this age is reached. Only meaningful
    /// alongside `start_age`; validation rejects it on its own.
    #[serde(default)]
    pub terminal_age: Option<u32>,
}

/// One simulated year. Balances carry full decimal precision; rounding is
/// presentation's job, so drift never compounds across years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearEntry {
    /// 1-based year index.
    pub year: u32,
    pub age: Option<u32>,
    pub starting_balance: Money,
    pub growth: Money,
    pub contribution: Money,
    pub tax_drag_paid: Money,
    pub ending_balance: Money,
}

impl ProjectionInputs {
    pub fn validate(&self) -> PlanwiseResult<()> {
        if self.horizon_years == 0 {
            return Err(PlanwiseError::InvalidInput {
                field: "horizon_years".into(),
                reason: "horizon must be at least 1 year".into(),
            });
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(PlanwiseError::InvalidInput {
                field: "horizon_years".into(),
                reason: format!("horizon must be <= {MAX_HORIZON_YEARS} years"),
            });
        }
        if self.growth_rate <= Decimal::NEGATIVE_ONE {
            return Err(PlanwiseError::InvalidInput {
                field: "growth_rate".into(),
                reason: "growth rate must be greater than -100%".into(),
            });
        }
        if let Some(drag) = self.tax_drag {
            if drag < Decimal::ZERO || drag > Decimal::ONE {
                return Err(PlanwiseError::InvalidInput {
                    field: "tax_drag".into(),
                    reason: format!("tax drag must be within [0, 1], found {drag}"),
                });
            }
        }
        match (self.start_age, self.terminal_age) {
            (Some(start), Some(terminal)) if terminal <= start => {
                return Err(PlanwiseError::InvalidInput {
                    field: "terminal_age".into(),
                    reason: "terminal_age must be greater than start_age".into(),
                });
            }
            // The early-stop check needs an age per year, so a terminal
            // age without a start age can never fire
            (None, Some(_)) => {
                return Err(PlanwiseError::InvalidInput {
                    field: "terminal_age".into(),
                    reason: "terminal_age requires start_age".into(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate a balance year by year.
///
/// Per year, in this order: growth on the existing balance, then the year's
/// net contribution, then tax drag on that year's positive growth. The
/// sequence has `horizon_years` entries, or fewer when `terminal_age` is
/// reached first.
pub fn project(inputs: &ProjectionInputs) -> PlanwiseResult<Vec<YearEntry>> {
    inputs.validate()?;

    let drag_rate = inputs.tax_drag.unwrap_or(Decimal::ZERO);
    let mut years = Vec::with_capacity(inputs.horizon_years as usize);
    let mut balance = inputs.starting_balance;

    for yr in 1..=inputs.horizon_years {
        let age = inputs.start_age.map(|a| a + yr);
        if let (Some(age), Some(terminal)) = (age, inputs.terminal_age) {
            if age > terminal {
                break;
            }
        }

        let beginning = balance;
        let growth = beginning * inputs.growth_rate;
        // Drag applies to gains only; a down year produces no tax bill
        let drag_paid = if growth > Decimal::ZERO {
            growth * drag_rate
        } else {
            Decimal::ZERO
        };
        balance = beginning + growth + inputs.annual_contribution - drag_paid;

        years.push(YearEntry {
            year: yr,
            age,
            starting_balance: beginning,
            growth,
            contribution: inputs.annual_contribution,
            tax_drag_paid: drag_paid,
            ending_balance: balance,
        });
    }

    Ok(years)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
