use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::projection::compounding::{project, ProjectionInputs, YearEntry};
use crate::tables::ContributionLimits;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What is the extra age-gated contribution room worth by retirement?
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchUpInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub growth_rate: Rate,
    /// Override the shipped 2025 limits.
    #[serde(default)]
    pub limits: Option<ContributionLimits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchUpOutput {
    /// Catch-up room available in the current year.
    pub current_year_catch_up: Money,
    /// True while inside the SECURE 2.0 age-60-to-63 window.
    pub super_catch_up_active: bool,
    /// Sum of every year's catch-up room from now to retirement.
    pub total_catch_up_capacity: Money,
    /// Value at retirement of actually contributing that room each year.
    pub projected_value_at_retirement: Money,
    pub years: Vec<YearEntry>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project the value of contributing every year's catch-up room.
///
/// The room steps at ages 50, 60, and 64, so the projection runs as chained
/// constant-contribution segments, each seeded with the prior segment's
/// ending balance.
pub fn analyze_catch_up(input: &CatchUpInput) -> PlanwiseResult<ComputationOutput<CatchUpOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.retirement_age <= input.current_age {
        return Err(PlanwiseError::InvalidInput {
            field: "retirement_age".into(),
            reason: "retirement_age must be greater than current_age".into(),
        });
    }

    let default_limits = ContributionLimits::year_2025();
    let limits = input.limits.as_ref().unwrap_or(&default_limits);

    let current_catch_up = limits.catch_up_for_age(input.current_age);
    let super_active = input.current_age >= limits.super_catch_up_min_age
        && input.current_age <= limits.super_catch_up_max_age;

    if input.current_age < limits.catch_up_min_age {
        warnings.push(format!(
            "No catch-up room until age {}; projection covers the eligible years only",
            limits.catch_up_min_age
        ));
    }

    // Split [current_age, retirement_age) into runs of constant room.
    // contribution is credited at the end of the year lived from `age`.
    let mut segments: Vec<(u32, u32, Money)> = Vec::new();
    let mut seg_start = input.current_age;
    let mut seg_room = limits.catch_up_for_age(input.current_age);
    for age in (input.current_age + 1)..input.retirement_age {
        let room = limits.catch_up_for_age(age);
        if room != seg_room {
            segments.push((seg_start, age, seg_room));
            seg_start = age;
            seg_room = room;
        }
    }
    segments.push((seg_start, input.retirement_age, seg_room));

    let mut years: Vec<YearEntry> = Vec::new();
    let mut balance = Decimal::ZERO;
    let mut total_capacity = Decimal::ZERO;

    for (from, to, room) in segments {
        let span = to - from;
        total_capacity += room * Decimal::from(span);
        if room.is_zero() {
            // Nothing contributed and nothing yet invested: skip ahead
            if balance.is_zero() {
                continue;
            }
        }
        let projected = project(&ProjectionInputs {
            starting_balance: balance,
            annual_contribution: room,
            growth_rate: input.growth_rate,
            horizon_years: span,
            tax_drag: None,
            start_age: Some(from),
            terminal_age: None,
        })?;
        balance = projected
            .last()
            .map(|y| y.ending_balance)
            .unwrap_or(balance);
        years.extend(projected);
    }

    // Re-index the chained segments as one continuous schedule
    for (i, yr) in years.iter_mut().enumerate() {
        yr.year = (i + 1) as u32;
    }

    let output = CatchUpOutput {
        current_year_catch_up: current_catch_up,
        super_catch_up_active: super_active,
        total_catch_up_capacity: total_capacity,
        projected_value_at_retirement: balance,
        years,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Catch-up contribution value (age-gated room, chained projection segments)",
        &serde_json::json!({
            "current_age": input.current_age,
            "retirement_age": input.retirement_age,
            "growth_rate": input.growth_rate.to_string(),
            "limits_year": limits.year,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
