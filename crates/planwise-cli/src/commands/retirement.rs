use clap::Args;
use serde_json::Value;

use planwise_core::calculators::catch_up::{self, CatchUpInput};
use planwise_core::calculators::mega_backdoor::{self, MegaBackdoorInput};
use planwise_core::calculators::roth_conversion::{self, RothConversionInput};

use crate::input;

/// Arguments for Roth conversion break-even analysis
#[derive(Args)]
pub struct RothConversionArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for mega-backdoor Roth comparison
#[derive(Args)]
pub struct MegaBackdoorArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for catch-up contribution analysis
#[derive(Args)]
pub struct CatchUpArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_roth_conversion(args: RothConversionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rc_input: RothConversionInput =
        input::read_required(args.input.as_deref(), "Roth conversion analysis")?;
    let result = roth_conversion::analyze_roth_conversion(&rc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_mega_backdoor(args: MegaBackdoorArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mb_input: MegaBackdoorInput =
        input::read_required(args.input.as_deref(), "mega-backdoor Roth comparison")?;
    let result = mega_backdoor::analyze_mega_backdoor(&mb_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_catch_up(args: CatchUpArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cu_input: CatchUpInput =
        input::read_required(args.input.as_deref(), "catch-up contribution analysis")?;
    let result = catch_up::analyze_catch_up(&cu_input)?;
    Ok(serde_json::to_value(result)?)
}
