use clap::Args;
use serde_json::Value;

use planwise_core::calculators::capital_gains::{self, CapitalGainsInput};
use planwise_core::calculators::rsu_withholding::{self, RsuWithholdingInput};

use crate::input;

/// Arguments for capital gains analysis
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for RSU withholding analysis
#[derive(Args)]
pub struct RsuWithholdingArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_capital_gains(args: CapitalGainsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cg_input: CapitalGainsInput =
        input::read_required(args.input.as_deref(), "capital gains analysis")?;
    let result = capital_gains::calculate_capital_gains(&cg_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rsu_withholding(args: RsuWithholdingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rsu_input: RsuWithholdingInput =
        input::read_required(args.input.as_deref(), "RSU withholding analysis")?;
    let result = rsu_withholding::analyze_rsu_withholding(&rsu_input)?;
    Ok(serde_json::to_value(result)?)
}
