//! Tax-year configuration tables.
//!
//! Every table here is data, not logic: the kernel takes tables as explicit
//! parameters, and callers may deserialize their own year's edition instead
//! of using these defaults. The crate ships the 2025 federal numbers.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::tax::brackets::{Bracket, BracketTable};
use crate::tax::tiers::{Tier, TierTable};
use crate::types::{FilingStatus, Money};

/// Net investment income tax rate (IRC §1411).
pub const NIIT_RATE: Decimal = dec!(0.038);

/// Flat supplemental-wage withholding rate (RSU vests, bonuses).
pub const SUPPLEMENTAL_WITHHOLDING_RATE: Decimal = dec!(0.22);

/// Mandatory supplemental rate above $1M cumulative supplemental wages.
pub const SUPPLEMENTAL_WITHHOLDING_RATE_HIGH: Decimal = dec!(0.37);

/// Cumulative supplemental wages where the mandatory 37% rate kicks in.
pub const SUPPLEMENTAL_WAGE_THRESHOLD: Decimal = dec!(1_000_000);

/// A complete year's worth of tables, keyed by filing status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxYearTables {
    pub year: u16,
    pub ordinary: Vec<(FilingStatus, BracketTable)>,
    pub long_term_gains: Vec<(FilingStatus, BracketTable)>,
    pub irmaa: Vec<(FilingStatus, TierTable)>,
    pub niit_thresholds: Vec<(FilingStatus, Money)>,
}

impl TaxYearTables {
    /// The 2025 federal edition (Rev. Proc. 2024-40 bracket amounts, CY2025
    /// IRMAA amounts). Replace wholesale when a new year's numbers publish.
    pub fn year_2025() -> Self {
        let statuses = [
            FilingStatus::Single,
            FilingStatus::MarriedJointly,
            FilingStatus::MarriedSeparately,
            FilingStatus::HeadOfHousehold,
        ];
        TaxYearTables {
            year: 2025,
            ordinary: statuses
                .iter()
                .map(|s| (*s, ordinary_brackets_2025(*s)))
                .collect(),
            long_term_gains: statuses
                .iter()
                .map(|s| (*s, ltcg_brackets_2025(*s)))
                .collect(),
            irmaa: statuses.iter().map(|s| (*s, irmaa_tiers_2025(*s))).collect(),
            niit_thresholds: statuses
                .iter()
                .map(|s| (*s, niit_threshold(*s)))
                .collect(),
        }
    }

    pub fn ordinary(&self, status: FilingStatus) -> Option<&BracketTable> {
        self.ordinary.iter().find(|(s, _)| *s == status).map(|(_, t)| t)
    }

    pub fn long_term_gains(&self, status: FilingStatus) -> Option<&BracketTable> {
        self.long_term_gains
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, t)| t)
    }

    pub fn irmaa(&self, status: FilingStatus) -> Option<&TierTable> {
        self.irmaa.iter().find(|(s, _)| *s == status).map(|(_, t)| t)
    }

    pub fn niit_threshold(&self, status: FilingStatus) -> Option<Money> {
        self.niit_thresholds
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, t)| *t)
    }
}

fn table(rows: &[(Decimal, Option<Decimal>, Decimal)]) -> BracketTable {
    BracketTable::new(
        rows.iter()
            .map(|(lower, upper, rate)| Bracket {
                lower_bound: *lower,
                upper_bound: *upper,
                rate: *rate,
            })
            .collect(),
    )
}

/// 2025 federal ordinary-income brackets.
pub fn ordinary_brackets_2025(status: FilingStatus) -> BracketTable {
    match status {
        FilingStatus::Single => table(&[
            (dec!(0), Some(dec!(11_925)), dec!(0.10)),
            (dec!(11_925), Some(dec!(48_475)), dec!(0.12)),
            (dec!(48_475), Some(dec!(103_350)), dec!(0.22)),
            (dec!(103_350), Some(dec!(197_300)), dec!(0.24)),
            (dec!(197_300), Some(dec!(250_525)), dec!(0.32)),
            (dec!(250_525), Some(dec!(626_350)), dec!(0.35)),
            (dec!(626_350), None, dec!(0.37)),
        ]),
        FilingStatus::MarriedJointly => table(&[
            (dec!(0), Some(dec!(23_850)), dec!(0.10)),
            (dec!(23_850), Some(dec!(96_950)), dec!(0.12)),
            (dec!(96_950), Some(dec!(206_700)), dec!(0.22)),
            (dec!(206_700), Some(dec!(394_600)), dec!(0.24)),
            (dec!(394_600), Some(dec!(501_050)), dec!(0.32)),
            (dec!(501_050), Some(dec!(751_600)), dec!(0.35)),
            (dec!(751_600), None, dec!(0.37)),
        ]),
        FilingStatus::MarriedSeparately => table(&[
            (dec!(0), Some(dec!(11_925)), dec!(0.10)),
            (dec!(11_925), Some(dec!(48_475)), dec!(0.12)),
            (dec!(48_475), Some(dec!(103_350)), dec!(0.22)),
            (dec!(103_350), Some(dec!(197_300)), dec!(0.24)),
            (dec!(197_300), Some(dec!(250_525)), dec!(0.32)),
            (dec!(250_525), Some(dec!(375_800)), dec!(0.35)),
            (dec!(375_800), None, dec!(0.37)),
        ]),
        FilingStatus::HeadOfHousehold => table(&[
            (dec!(0), Some(dec!(17_000)), dec!(0.10)),
            (dec!(17_000), Some(dec!(64_850)), dec!(0.12)),
            (dec!(64_850), Some(dec!(103_350)), dec!(0.22)),
            (dec!(103_350), Some(dec!(197_300)), dec!(0.24)),
            (dec!(197_300), Some(dec!(250_500)), dec!(0.32)),
            (dec!(250_500), Some(dec!(626_350)), dec!(0.35)),
            (dec!(626_350), None, dec!(0.37)),
        ]),
    }
}

/// 2025 long-term capital-gains rate thresholds (0% / 15% / 20%).
/// Gains stack on top of ordinary taxable income against these bounds.
pub fn ltcg_brackets_2025(status: FilingStatus) -> BracketTable {
    match status {
        FilingStatus::Single => table(&[
            (dec!(0), Some(dec!(48_350)), dec!(0)),
            (dec!(48_350), Some(dec!(533_400)), dec!(0.15)),
            (dec!(533_400), None, dec!(0.20)),
        ]),
        FilingStatus::MarriedJointly => table(&[
            (dec!(0), Some(dec!(96_700)), dec!(0)),
            (dec!(96_700), Some(dec!(600_050)), dec!(0.15)),
            (dec!(600_050), None, dec!(0.20)),
        ]),
        FilingStatus::MarriedSeparately => table(&[
            (dec!(0), Some(dec!(48_350)), dec!(0)),
            (dec!(48_350), Some(dec!(300_000)), dec!(0.15)),
            (dec!(300_000), None, dec!(0.20)),
        ]),
        FilingStatus::HeadOfHousehold => table(&[
            (dec!(0), Some(dec!(64_750)), dec!(0)),
            (dec!(64_750), Some(dec!(566_700)), dec!(0.15)),
            (dec!(566_700), None, dec!(0.20)),
        ]),
    }
}

fn irmaa_tier(lower: Decimal, upper: Option<Decimal>, part_b: Decimal, part_d: Decimal) -> Tier {
    Tier {
        lower_bound: lower,
        upper_bound: upper,
        monthly_surcharges: vec![part_b, part_d],
    }
}

/// 2025 IRMAA MAGI tiers with monthly Part B and Part D surcharges.
/// MAGI from two years prior determines the tier; surcharges are the amounts
/// above the standard premium.
pub fn irmaa_tiers_2025(status: FilingStatus) -> TierTable {
    match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => TierTable::new(vec![
            irmaa_tier(dec!(0), Some(dec!(106_000)), dec!(0), dec!(0)),
            irmaa_tier(dec!(106_000), Some(dec!(133_000)), dec!(74.00), dec!(13.70)),
            irmaa_tier(dec!(133_000), Some(dec!(167_000)), dec!(185.00), dec!(35.30)),
            irmaa_tier(dec!(167_000), Some(dec!(200_000)), dec!(295.90), dec!(57.00)),
            irmaa_tier(dec!(200_000), Some(dec!(500_000)), dec!(406.90), dec!(78.60)),
            irmaa_tier(dec!(500_000), None, dec!(443.90), dec!(85.80)),
        ]),
        FilingStatus::MarriedJointly => TierTable::new(vec![
            irmaa_tier(dec!(0), Some(dec!(212_000)), dec!(0), dec!(0)),
            irmaa_tier(dec!(212_000), Some(dec!(266_000)), dec!(74.00), dec!(13.70)),
            irmaa_tier(dec!(266_000), Some(dec!(334_000)), dec!(185.00), dec!(35.30)),
            irmaa_tier(dec!(334_000), Some(dec!(400_000)), dec!(295.90), dec!(57.00)),
            irmaa_tier(dec!(400_000), Some(dec!(750_000)), dec!(406.90), dec!(78.60)),
            irmaa_tier(dec!(750_000), None, dec!(443.90), dec!(85.80)),
        ]),
        FilingStatus::MarriedSeparately => TierTable::new(vec![
            irmaa_tier(dec!(0), Some(dec!(106_000)), dec!(0), dec!(0)),
            irmaa_tier(dec!(106_000), Some(dec!(394_000)), dec!(406.90), dec!(78.60)),
            irmaa_tier(dec!(394_000), None, dec!(443.90), dec!(85.80)),
        ]),
    }
}

/// NIIT MAGI thresholds (not inflation-indexed).
pub fn niit_threshold(status: FilingStatus) -> Money {
    match status {
        FilingStatus::Single | FilingStatus::HeadOfHousehold => dec!(200_000),
        FilingStatus::MarriedJointly => dec!(250_000),
        FilingStatus::MarriedSeparately => dec!(125_000),
    }
}

// ---------------------------------------------------------------------------
// 2025 retirement-plan contribution limits
// ---------------------------------------------------------------------------

/// Elective-deferral and catch-up limits for workplace plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionLimits {
    pub year: u16,
    pub elective_deferral: Money,
    /// Extra room at age 50+.
    pub catch_up: Money,
    /// SECURE 2.0 "super" catch-up for ages 60 through 63, replacing the
    /// standard catch-up in those years.
    pub super_catch_up: Money,
    /// Overall §415(c) limit (employee + employer), floor for the
    /// mega-backdoor after-tax window.
    pub overall_limit: Money,
    pub super_catch_up_min_age: u32,
    pub super_catch_up_max_age: u32,
    pub catch_up_min_age: u32,
}

impl ContributionLimits {
    pub fn year_2025() -> Self {
        ContributionLimits {
            year: 2025,
            elective_deferral: dec!(23_500),
            catch_up: dec!(7_500),
            super_catch_up: dec!(11_250),
            overall_limit: dec!(70_000),
            super_catch_up_min_age: 60,
            super_catch_up_max_age: 63,
            catch_up_min_age: 50,
        }
    }

    /// Catch-up room for a given age: none before 50, standard at 50+,
    /// super during the 60–63 window, back to standard at 64.
    pub fn catch_up_for_age(&self, age: u32) -> Money {
        if age >= self.super_catch_up_min_age && age <= self.super_catch_up_max_age {
            self.super_catch_up
        } else if age >= self.catch_up_min_age {
            self.catch_up
        } else {
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::brackets::tax_on_ordinary_income;
    use crate::tax::tiers::lookup_tier;
    use pretty_assertions::assert_eq;

    // ---------------------------------------------------------------
    // 1. Every shipped table passes validation
    // ---------------------------------------------------------------
    #[test]
    fn test_all_2025_tables_validate() {
        let tables = TaxYearTables::year_2025();
        assert_eq!(tables.year, 2025);
        for (_, t) in &tables.ordinary {
            t.validate().unwrap();
        }
        for (_, t) in &tables.long_term_gains {
            t.validate().unwrap();
        }
        for (_, t) in &tables.irmaa {
            t.validate().unwrap();
        }
    }

    // ---------------------------------------------------------------
    // 2. Known 2025 single-filer ordinary tax
    // ---------------------------------------------------------------
    #[test]
    fn test_single_ordinary_tax_100k() {
        let table = ordinary_brackets_2025(FilingStatus::Single);
        // 11_925*0.10 + 36_550*0.12 + 51_525*0.22 (income 100_000)
        let tax = tax_on_ordinary_income(dec!(100_000), &table).unwrap();
        let expected = dec!(1_192.50) + dec!(4_386.00) + dec!(11_335.50);
        assert_eq!(tax, expected);
    }

    // ---------------------------------------------------------------
    // 3. IRMAA single-filer tier boundaries
    // ---------------------------------------------------------------
    #[test]
    fn test_irmaa_single_tiers() {
        let table = irmaa_tiers_2025(FilingStatus::Single);
        assert_eq!(lookup_tier(dec!(105_000), &table).unwrap().0, 0);
        assert_eq!(lookup_tier(dec!(106_000), &table).unwrap().0, 1);
        assert_eq!(lookup_tier(dec!(450_000), &table).unwrap().0, 4);
        assert_eq!(lookup_tier(dec!(2_000_000), &table).unwrap().0, 5);
    }

    // ---------------------------------------------------------------
    // 4. Lookup accessors find every filing status
    // ---------------------------------------------------------------
    #[test]
    fn test_accessors_cover_all_statuses() {
        let tables = TaxYearTables::year_2025();
        for status in [
            FilingStatus::Single,
            FilingStatus::MarriedJointly,
            FilingStatus::MarriedSeparately,
            FilingStatus::HeadOfHousehold,
        ] {
            assert!(tables.ordinary(status).is_some());
            assert!(tables.long_term_gains(status).is_some());
            assert!(tables.irmaa(status).is_some());
            assert!(tables.niit_threshold(status).is_some());
        }
    }

    // ---------------------------------------------------------------
    // 5. Catch-up room by age
    // ---------------------------------------------------------------
    #[test]
    fn test_catch_up_for_age() {
        let limits = ContributionLimits::year_2025();
        assert_eq!(limits.catch_up_for_age(45), dec!(0));
        assert_eq!(limits.catch_up_for_age(50), dec!(7_500));
        assert_eq!(limits.catch_up_for_age(59), dec!(7_500));
        assert_eq!(limits.catch_up_for_age(60), dec!(11_250));
        assert_eq!(limits.catch_up_for_age(63), dec!(11_250));
        assert_eq!(limits.catch_up_for_age(64), dec!(7_500));
    }
}
