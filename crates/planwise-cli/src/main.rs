mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::medicare::IrmaaArgs;
use commands::planning::{ConcentrationArgs, RentVsBuyArgs};
use commands::projection::{BreakEvenArgs, ProjectArgs};
use commands::retirement::{CatchUpArgs, MegaBackdoorArgs, RothConversionArgs};
use commands::tax::{CapitalGainsArgs, RsuWithholdingArgs};

/// Personal-finance decision-support calculations
#[derive(Parser)]
#[command(
    name = "pfc",
    version,
    about = "Personal-finance decision-support calculations",
    long_about = "A CLI for the planwise calculation kernel: progressive-bracket tax, \
                  IRMAA tier lookup, multi-year compounding projections, and \
                  break-even analysis between financial paths. Inputs are JSON \
                  (file or stdin); tables default to the shipped 2025 edition."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Tax a sale's gain stacked on top of ordinary income
    CapitalGains(CapitalGainsArgs),
    /// RSU vest: flat supplemental withholding vs true marginal tax
    RsuWithholding(RsuWithholdingArgs),
    /// Roth conversion break-even analysis
    RothConversion(RothConversionArgs),
    /// Mega-backdoor Roth vs taxable brokerage
    MegaBackdoor(MegaBackdoorArgs),
    /// Age-gated catch-up contribution value
    CatchUp(CatchUpArgs),
    /// IRMAA surcharge tier crossing
    Irmaa(IrmaaArgs),
    /// Single-position concentration risk and diversification cost
    Concentration(ConcentrationArgs),
    /// Rent vs buy break-even
    RentVsBuy(RentVsBuyArgs),
    /// Raw multi-year compounding projection
    Project(ProjectArgs),
    /// Raw break-even between two compounding paths
    BreakEven(BreakEvenArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::CapitalGains(args) => commands::tax::run_capital_gains(args),
        Commands::RsuWithholding(args) => commands::tax::run_rsu_withholding(args),
        Commands::RothConversion(args) => commands::retirement::run_roth_conversion(args),
        Commands::MegaBackdoor(args) => commands::retirement::run_mega_backdoor(args),
        Commands::CatchUp(args) => commands::retirement::run_catch_up(args),
        Commands::Irmaa(args) => commands::medicare::run_irmaa(args),
        Commands::Concentration(args) => commands::planning::run_concentration(args),
        Commands::RentVsBuy(args) => commands::planning::run_rent_vs_buy(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::BreakEven(args) => commands::projection::run_break_even(args),
        Commands::Version => {
            println!("pfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
