use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::projection::compounding::{project, ProjectionInputs, YearEntry};
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One side of a break-even comparison: a compounding path plus the tax rate
/// applied when its balance is eventually withdrawn. After-tax value of a
/// year is `ending_balance * (1 - withdrawal_tax_rate)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenPath {
    pub label: String,
    pub projection: ProjectionInputs,
    #[serde(default)]
    pub withdrawal_tax_rate: Rate,
}

/// One lockstep year of the comparison, with the running advantage
/// (after-tax A minus after-tax B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvantageYear {
    pub year: u32,
    pub age: Option<u32>,
    pub after_tax_a: Money,
    pub after_tax_b: Money,
    pub advantage: Money,
}

/// Where, if anywhere, path A overtakes path B.
///
/// `Never` is a first-class outcome, distinct from any crossover year; a
/// missing crossover is never reported as year zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BreakEvenOutcome {
    CrossesAt { year: u32, age: Option<u32> },
    Never { horizon_years: u32 },
}

/// Full solver output: the outcome plus the year-by-year advantage trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    pub outcome: BreakEvenOutcome,
    pub years: Vec<AdvantageYear>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

fn after_tax(entry: &YearEntry, rate: Rate) -> Money {
    entry.ending_balance * (Decimal::ONE - rate)
}

fn validate_withdrawal_rate(rate: Rate, field: &str) -> PlanwiseResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(PlanwiseError::InvalidInput {
            field: field.into(),
            reason: format!("withdrawal tax rate must be within [0, 1), found {rate}"),
        });
    }
    Ok(())
}

/// Run two projections in lockstep and report the first year path A's
/// after-tax value meets or exceeds path B's.
///
/// The crossover is the first year with non-negative advantage; if the
/// advantage stays negative through the shared horizon the result is the
/// explicit `Never` outcome. Pure function: identical inputs always yield
/// identical results.
pub fn find_break_even(
    path_a: &BreakEvenPath,
    path_b: &BreakEvenPath,
) -> PlanwiseResult<BreakEvenResult> {
    let years_a = project(&path_a.projection)?;
    let years_b = project(&path_b.projection)?;
    find_break_even_from_years(
        &years_a,
        path_a.withdrawal_tax_rate,
        &years_b,
        path_b.withdrawal_tax_rate,
    )
}

/// Solve over year series the caller has already built.
///
/// Callers whose contributions change year to year (rent escalation,
/// stepped limits) assemble their own `YearEntry` sequences and come in
/// through here; `find_break_even` is the constant-inputs front door.
pub fn find_break_even_from_years(
    years_a: &[YearEntry],
    rate_a: Rate,
    years_b: &[YearEntry],
    rate_b: Rate,
) -> PlanwiseResult<BreakEvenResult> {
    validate_withdrawal_rate(rate_a, "path_a.withdrawal_tax_rate")?;
    validate_withdrawal_rate(rate_b, "path_b.withdrawal_tax_rate")?;

    let horizon = years_a.len().min(years_b.len()) as u32;
    if horizon == 0 {
        return Err(PlanwiseError::InsufficientData(
            "break-even comparison needs at least one simulated year".into(),
        ));
    }

    let mut years = Vec::with_capacity(horizon as usize);
    let mut outcome = None;

    for (a, b) in years_a.iter().zip(years_b.iter()).take(horizon as usize) {
        let after_tax_a = after_tax(a, rate_a);
        let after_tax_b = after_tax(b, rate_b);
        let advantage = after_tax_a - after_tax_b;

        if outcome.is_none() && advantage >= Decimal::ZERO {
            outcome = Some(BreakEvenOutcome::CrossesAt {
                year: a.year,
                age: a.age,
            });
        }

        years.push(AdvantageYear {
            year: a.year,
            age: a.age,
            after_tax_a,
            after_tax_b,
            advantage,
        });
    }

    Ok(BreakEvenResult {
        outcome: outcome.unwrap_or(BreakEvenOutcome::Never {
            horizon_years: horizon,
        }),
        years,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
