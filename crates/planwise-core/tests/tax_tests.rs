#![cfg(all(
    feature = "capital_gains",
    feature = "rsu_withholding",
    feature = "irmaa"
))]

use planwise_core::calculators::capital_gains::{
    calculate_capital_gains, CapitalGainsInput, HoldingPeriod,
};
use planwise_core::calculators::irmaa::{analyze_irmaa_impact, IrmaaInput};
use planwise_core::calculators::rsu_withholding::{analyze_rsu_withholding, RsuWithholdingInput};
use planwise_core::types::FilingStatus;
use planwise_core::PlanwiseError;
use rust_decimal_macros::dec;

// ===========================================================================
// Capital gains tests
// ===========================================================================

fn long_term_sale() -> CapitalGainsInput {
    // Single filer well inside the 15% preferential band
    CapitalGainsInput {
        filing_status: FilingStatus::Single,
        ordinary_income: dec!(100_000),
        sale_price: dec!(150_000),
        cost_basis: dec!(100_000),
        holding_period: HoldingPeriod::LongTerm,
        state_tax_rate: None,
        gains_table: None,
        ordinary_table: None,
    }
}

#[test]
fn test_long_term_gain_fifteen_percent_band() {
    let output = calculate_capital_gains(&long_term_sale()).unwrap();
    let r = &output.result;

    assert_eq!(r.gain, dec!(50_000));
    // Ordinary income fills past the $48,350 zero-rate threshold, so the
    // entire gain lands in the 15% band
    assert_eq!(r.federal_tax, dec!(7_500));
    // MAGI 150k is under the $200k NIIT threshold
    assert_eq!(r.niit, dec!(0));
    assert_eq!(r.state_tax, dec!(0));
    assert_eq!(r.total_tax, dec!(7_500));
    assert_eq!(r.top_rate_applied, dec!(0.15));
    assert_eq!(r.net_proceeds, dec!(142_500));
}

#[test]
fn test_short_term_gain_taxed_as_ordinary() {
    let input = CapitalGainsInput {
        ordinary_income: dec!(50_000),
        sale_price: dec!(30_000),
        cost_basis: dec!(10_000),
        holding_period: HoldingPeriod::ShortTerm,
        ..long_term_sale()
    };
    let r = calculate_capital_gains(&input).unwrap().result;

    // 50k -> 70k sits entirely inside the 22% ordinary bracket
    assert_eq!(r.gain, dec!(20_000));
    assert_eq!(r.federal_tax, dec!(4_400.00));
    assert_eq!(r.top_rate_applied, dec!(0.22));
}

#[test]
fn test_niit_applies_above_magi_threshold() {
    let input = CapitalGainsInput {
        ordinary_income: dec!(220_000),
        sale_price: dec!(150_000),
        cost_basis: dec!(100_000),
        ..long_term_sale()
    };
    let r = calculate_capital_gains(&input).unwrap().result;

    // MAGI 270k exceeds the 200k threshold by more than the gain, so the
    // whole 50k gain takes the 3.8% surtax
    assert_eq!(r.niit, dec!(50_000) * dec!(0.038));
}

#[test]
fn test_sale_at_loss_warns_and_owes_nothing() {
    let input = CapitalGainsInput {
        sale_price: dec!(80_000),
        cost_basis: dec!(100_000),
        ..long_term_sale()
    };
    let output = calculate_capital_gains(&input).unwrap();

    assert!(!output.warnings.is_empty());
    assert_eq!(output.result.gain, dec!(-20_000));
    assert_eq!(output.result.total_tax, dec!(0));
}

#[test]
fn test_negative_sale_price_rejected() {
    let input = CapitalGainsInput {
        sale_price: dec!(-1),
        ..long_term_sale()
    };
    match calculate_capital_gains(&input) {
        Err(PlanwiseError::InvalidInput { field, .. }) => assert_eq!(field, "sale_price"),
        other => panic!("expected InvalidInput, got {:?}", other.map(|o| o.result.gain)),
    }
}

// ===========================================================================
// RSU withholding tests
// ===========================================================================

#[test]
fn test_rsu_flat_withholding_under_collects() {
    // $150k vest on top of $180k of other income, single filer
    let input = RsuWithholdingInput {
        filing_status: FilingStatus::Single,
        shares_vesting: dec!(1_000),
        share_price: dec!(150),
        other_taxable_income: dec!(180_000),
        ytd_supplemental_wages: dec!(0),
        materiality_threshold: dec!(5_000),
        ordinary_table: None,
    };
    let output = analyze_rsu_withholding(&input).unwrap();
    let r = &output.result;

    assert_eq!(r.vest_value, dec!(150_000));
    // Entire vest is below the $1M supplemental threshold: flat 22%
    assert_eq!(r.withheld, dec!(33_000));
    assert_eq!(r.withholding_rate, dec!(0.22));

    // Stacked from 180k the vest spans the 24/32/35 brackets
    let expected = dec!(17_300) * dec!(0.24)
        + dec!(53_225) * dec!(0.32)
        + dec!(79_475) * dec!(0.35);
    assert_eq!(r.actual_tax, expected);
    assert_eq!(r.actual_marginal_rate, dec!(0.35));
    assert!(r.under_withheld);
    assert_eq!(r.shortfall, expected - dec!(33_000));
}

#[test]
fn test_rsu_mandatory_high_rate_above_one_million() {
    let input = RsuWithholdingInput {
        filing_status: FilingStatus::Single,
        shares_vesting: dec!(10_000),
        share_price: dec!(120),
        other_taxable_income: dec!(500_000),
        ytd_supplemental_wages: dec!(900_000),
        materiality_threshold: dec!(5_000),
        ordinary_table: None,
    };
    let r = analyze_rsu_withholding(&input).unwrap().result;

    // First 100k of the vest fills to the $1M line at 22%, the remaining
    // 1.1M is withheld at the mandatory 37%
    assert_eq!(
        r.withheld,
        dec!(100_000) * dec!(0.22) + dec!(1_100_000) * dec!(0.37)
    );
}

// ===========================================================================
// IRMAA tests
// ===========================================================================

#[test]
fn test_irmaa_crossing_first_threshold() {
    let input = IrmaaInput {
        filing_status: FilingStatus::Single,
        magi_before: dec!(105_000),
        magi_after: dec!(115_000),
        tier_table: None,
    };
    let r = analyze_irmaa_impact(&input).unwrap().result;

    assert!(r.crosses);
    assert_eq!(r.before.tier_index, 0);
    assert_eq!(r.after.tier_index, 1);
    assert_eq!(r.after.monthly_part_b, dec!(74.00));
    assert_eq!(r.after.monthly_part_d, dec!(13.70));
    assert_eq!(r.monthly_delta, dec!(87.70));
    assert_eq!(r.annual_surcharge_delta, dec!(87.70) * dec!(12));
}

#[test]
fn test_irmaa_movement_inside_top_tier_never_crosses() {
    let input = IrmaaInput {
        filing_status: FilingStatus::Single,
        magi_before: dec!(510_000),
        magi_after: dec!(900_000),
        tier_table: None,
    };
    let r = analyze_irmaa_impact(&input).unwrap().result;

    assert!(!r.crosses);
    assert_eq!(r.before.tier_index, r.after.tier_index);
    assert_eq!(r.annual_surcharge_delta, dec!(0));
}
