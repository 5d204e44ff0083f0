use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::projection::compounding::YearEntry;
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One completed scenario to be compared: a name, its projected years, and
/// whether it tripped a surcharge-tier crossing along the way. This module
/// only aggregates; all tax math happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub years: Vec<YearEntry>,
    #[serde(default)]
    pub crossed_surcharge_tier: bool,
}

/// Qualitative facts the presentation layer turns into prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonFlag {
    TierCrossingOccurred,
    AdvantageExceedsMateriality,
    EffectivelyEquivalent,
}

/// Terminal standing of one scenario relative to the best one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStanding {
    pub name: String,
    pub terminal_balance: Money,
    /// Terminal balance minus the winner's (zero for the winner itself).
    pub shortfall_vs_winner: Money,
    /// Shortfall as a fraction of the winner's terminal balance; None when
    /// the winner's balance is zero.
    pub shortfall_pct: Option<Rate>,
}

/// Aggregated comparison across two or more scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub winner: String,
    pub winner_terminal_balance: Money,
    pub standings: Vec<ScenarioStanding>,
    /// Winner's margin over the runner-up.
    pub winning_margin: Money,
    pub flags: Vec<ComparisonFlag>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Compare the terminal years of two or more scenarios.
///
/// `materiality_threshold` is the absolute advantage below which two paths
/// are flagged as effectively equivalent rather than one "winning".
pub fn compare(
    scenarios: &[ScenarioOutcome],
    materiality_threshold: Money,
) -> PlanwiseResult<ScenarioComparison> {
    if scenarios.len() < 2 {
        return Err(PlanwiseError::InsufficientData(
            "scenario comparison needs at least two scenarios".into(),
        ));
    }
    if materiality_threshold < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "materiality_threshold".into(),
            reason: "materiality threshold must be >= 0".into(),
        });
    }
    for scenario in scenarios {
        if scenario.years.is_empty() {
            return Err(PlanwiseError::InsufficientData(format!(
                "scenario '{}' has no simulated years",
                scenario.name
            )));
        }
    }

    let terminal = |s: &ScenarioOutcome| -> Money {
        s.years.last().map(|y| y.ending_balance).unwrap_or_default()
    };

    // Winner: highest terminal balance; first listed wins exact ties so the
    // result is stable for identical inputs
    let mut winner_idx = 0;
    let mut winner_balance = terminal(&scenarios[0]);
    for (i, s) in scenarios.iter().enumerate().skip(1) {
        let bal = terminal(s);
        if bal > winner_balance {
            winner_idx = i;
            winner_balance = bal;
        }
    }

    let standings: Vec<ScenarioStanding> = scenarios
        .iter()
        .map(|s| {
            let bal = terminal(s);
            let shortfall = bal - winner_balance;
            let shortfall_pct = if winner_balance.is_zero() {
                None
            } else {
                Some(shortfall / winner_balance)
            };
            ScenarioStanding {
                name: s.name.clone(),
                terminal_balance: bal,
                shortfall_vs_winner: shortfall,
                shortfall_pct,
            }
        })
        .collect();

    // Margin over the runner-up
    let winning_margin = standings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != winner_idx)
        .map(|(_, s)| winner_balance - s.terminal_balance)
        .min()
        .unwrap_or(Decimal::ZERO);

    let mut flags = Vec::new();
    if scenarios.iter().any(|s| s.crossed_surcharge_tier) {
        flags.push(ComparisonFlag::TierCrossingOccurred);
    }
    if winning_margin >= materiality_threshold && winning_margin > Decimal::ZERO {
        flags.push(ComparisonFlag::AdvantageExceedsMateriality);
    } else {
        flags.push(ComparisonFlag::EffectivelyEquivalent);
    }

    Ok(ScenarioComparison {
        winner: scenarios[winner_idx].name.clone(),
        winner_terminal_balance: winner_balance,
        standings,
        winning_margin,
        flags,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
