//! Per-tool calculators: thin parameterizations of the shared kernel.
//!
//! Each calculator is one input struct, one output struct, and one public
//! function. Validation happens first, kernel calls after; none of these
//! files walk brackets or loop over years themselves.

#[cfg(feature = "capital_gains")]
pub mod capital_gains;

#[cfg(feature = "roth_conversion")]
pub mod roth_conversion;

#[cfg(feature = "irmaa")]
pub mod irmaa;

#[cfg(feature = "mega_backdoor")]
pub mod mega_backdoor;

#[cfg(feature = "catch_up")]
pub mod catch_up;

#[cfg(feature = "rsu_withholding")]
pub mod rsu_withholding;

#[cfg(feature = "concentration")]
pub mod concentration;

#[cfg(feature = "rent_vs_buy")]
pub mod rent_vs_buy;
