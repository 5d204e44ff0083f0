pub mod brackets;
pub mod tiers;
