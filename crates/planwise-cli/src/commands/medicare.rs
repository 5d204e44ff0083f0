use clap::Args;
use serde_json::Value;

use planwise_core::calculators::irmaa::{self, IrmaaInput};

use crate::input;

/// Arguments for IRMAA surcharge analysis
#[derive(Args)]
pub struct IrmaaArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_irmaa(args: IrmaaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let irmaa_input: IrmaaInput =
        input::read_required(args.input.as_deref(), "IRMAA surcharge analysis")?;
    let result = irmaa::analyze_irmaa_impact(&irmaa_input)?;
    Ok(serde_json::to_value(result)?)
}
