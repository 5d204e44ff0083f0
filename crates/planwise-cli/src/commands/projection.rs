use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use planwise_core::projection::break_even::{self, BreakEvenPath};
use planwise_core::projection::compounding::{self, ProjectionInputs};

use crate::input;

/// Arguments for a raw compounding projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a raw break-even comparison
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Input envelope for the break-even subcommand: two labelled paths.
#[derive(Deserialize)]
struct BreakEvenInput {
    path_a: BreakEvenPath,
    path_b: BreakEvenPath,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input: ProjectionInputs =
        input::read_required(args.input.as_deref(), "compounding projection")?;
    let years = compounding::project(&proj_input)?;
    Ok(serde_json::to_value(years)?)
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let be_input: BreakEvenInput =
        input::read_required(args.input.as_deref(), "break-even comparison")?;
    let result = break_even::find_break_even(&be_input.path_a, &be_input.path_b)?;
    Ok(serde_json::to_value(result)?)
}
