use clap::Args;
use serde_json::Value;

use planwise_core::calculators::concentration::{self, ConcentrationInput};
use planwise_core::calculators::rent_vs_buy::{self, RentVsBuyInput};

use crate::input;

/// Arguments for equity concentration analysis
#[derive(Args)]
pub struct ConcentrationArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for rent-vs-buy break-even analysis
#[derive(Args)]
pub struct RentVsBuyArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_concentration(args: ConcentrationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let conc_input: ConcentrationInput =
        input::read_required(args.input.as_deref(), "concentration analysis")?;
    let result = concentration::analyze_concentration(&conc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rent_vs_buy(args: RentVsBuyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rb_input: RentVsBuyInput =
        input::read_required(args.input.as_deref(), "rent-vs-buy analysis")?;
    let result = rent_vs_buy::analyze_rent_vs_buy(&rb_input)?;
    Ok(serde_json::to_value(result)?)
}
