use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_capital_gains(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::capital_gains::CapitalGainsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::capital_gains::calculate_capital_gains(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_rsu_withholding(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::rsu_withholding::RsuWithholdingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::rsu_withholding::analyze_rsu_withholding(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_roth_conversion(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::roth_conversion::RothConversionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::roth_conversion::analyze_roth_conversion(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_mega_backdoor(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::mega_backdoor::MegaBackdoorInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::mega_backdoor::analyze_mega_backdoor(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_catch_up(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::catch_up::CatchUpInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::catch_up::analyze_catch_up(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Medicare
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_irmaa_impact(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::irmaa::IrmaaInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::irmaa::analyze_irmaa_impact(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_concentration(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::concentration::ConcentrationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::concentration::analyze_concentration(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_rent_vs_buy(input_json: String) -> NapiResult<String> {
    let input: planwise_core::calculators::rent_vs_buy::RentVsBuyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::calculators::rent_vs_buy::analyze_rent_vs_buy(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection primitives
// ---------------------------------------------------------------------------

#[napi]
pub fn project_balances(input_json: String) -> NapiResult<String> {
    let input: planwise_core::projection::compounding::ProjectionInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        planwise_core::projection::compounding::project(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn find_break_even(input_json: String) -> NapiResult<String> {
    #[derive(serde::Deserialize)]
    struct Paths {
        path_a: planwise_core::projection::break_even::BreakEvenPath,
        path_b: planwise_core::projection::break_even::BreakEvenPath,
    }
    let paths: Paths = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::projection::break_even::find_break_even(&paths.path_a, &paths.path_b)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
