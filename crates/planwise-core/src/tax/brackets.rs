use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One marginal bracket: [lower_bound, upper_bound) taxed at `rate`.
/// The top bracket of a table has `upper_bound = None` (unbounded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Money,
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

/// An ordered, contiguous progressive bracket table for one filing status.
///
/// Tables are configuration, not logic: they are supplied per tax year and
/// never mutated. Every public function validates before computing, so a
/// malformed table is rejected up front rather than producing a wrong number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    pub brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Build a table from (lower_bound, upper_bound, rate) triples.
    pub fn new(brackets: Vec<Bracket>) -> Self {
        BracketTable { brackets }
    }

    /// Check the structural invariants:
    /// non-empty, starts at zero, contiguous, unbounded top, rates >= 0.
    pub fn validate(&self) -> PlanwiseResult<()> {
        if self.brackets.is_empty() {
            return Err(PlanwiseError::InvalidTable(
                "bracket table must contain at least one bracket".into(),
            ));
        }

        let first = &self.brackets[0];
        if !first.lower_bound.is_zero() {
            return Err(PlanwiseError::InvalidTable(format!(
                "first bracket must start at 0, found {}",
                first.lower_bound
            )));
        }

        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(PlanwiseError::InvalidTable(format!(
                    "bracket {} has negative rate {}",
                    i, bracket.rate
                )));
            }

            let is_last = i == self.brackets.len() - 1;
            match bracket.upper_bound {
                Some(upper) => {
                    if is_last {
                        return Err(PlanwiseError::InvalidTable(
                            "final bracket must be unbounded".into(),
                        ));
                    }
                    if upper <= bracket.lower_bound {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "bracket {} has upper bound {} <= lower bound {}",
                            i, upper, bracket.lower_bound
                        )));
                    }
                    // Contiguity: next lower bound must equal this upper bound
                    let next = &self.brackets[i + 1];
                    if next.lower_bound != upper {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "bracket {} ends at {} but bracket {} starts at {}",
                            i,
                            upper,
                            i + 1,
                            next.lower_bound
                        )));
                    }
                }
                None => {
                    if !is_last {
                        return Err(PlanwiseError::InvalidTable(format!(
                            "bracket {} is unbounded but is not the final bracket",
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

fn reject_negative_income(income: Money, field: &str) -> PlanwiseResult<()> {
    if income < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: field.into(),
            reason: format!("income must be >= 0, found {income}"),
        });
    }
    Ok(())
}

/// Total progressive tax on ordinary income.
///
/// Sums `rate * (min(income, upper) - lower)` over every bracket the income
/// reaches. Continuous and non-decreasing in income; exactly zero at zero
/// income. Negative income is rejected, not clamped: a negative AGI here
/// means the caller's netting is wrong and silently taxing it at zero would
/// hide that.
pub fn tax_on_ordinary_income(income: Money, table: &BracketTable) -> PlanwiseResult<Money> {
    table.validate()?;
    reject_negative_income(income, "income")?;

    let mut tax = Decimal::ZERO;
    for bracket in &table.brackets {
        if income <= bracket.lower_bound {
            break;
        }
        let top = match bracket.upper_bound {
            Some(upper) => income.min(upper),
            None => income,
        };
        tax += bracket.rate * (top - bracket.lower_bound);
    }

    Ok(tax)
}

/// Marginal rate: the rate of the last bracket whose lower bound is below
/// the income. Zero income sits in the first bracket.
pub fn marginal_rate(income: Money, table: &BracketTable) -> PlanwiseResult<Rate> {
    table.validate()?;
    reject_negative_income(income, "income")?;

    let mut rate = table.brackets[0].rate;
    for bracket in &table.brackets {
        if income > bracket.lower_bound {
            rate = bracket.rate;
        } else {
            break;
        }
    }

    Ok(rate)
}

/// Tax on `delta` stacked on top of `base_income`.
///
/// This is the capital-gains / Roth-conversion pattern: the increment fills
/// whatever room remains in the base income's bracket, then spills into the
/// next bracket(s) at their own rates. Computed as a difference of two total
/// taxes so the apportionment across boundaries is exact.
pub fn incremental_tax(
    base_income: Money,
    delta: Money,
    table: &BracketTable,
) -> PlanwiseResult<Money> {
    table.validate()?;
    reject_negative_income(base_income, "base_income")?;
    if delta < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "delta".into(),
            reason: format!("stacked amount must be >= 0, found {delta}"),
        });
    }
    if delta.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let with_delta = tax_on_ordinary_income(base_income + delta, table)?;
    let without = tax_on_ordinary_income(base_income, table)?;
    Ok(with_delta - without)
}

/// Effective (average) rate: total tax / income. Zero income -> zero rate.
pub fn effective_rate(income: Money, table: &BracketTable) -> PlanwiseResult<Rate> {
    let tax = tax_on_ordinary_income(income, table)?;
    if income.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(tax / income)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
