pub mod error;
pub mod projection;
pub mod tables;
pub mod tax;
pub mod types;

pub mod calculators;

pub use error::PlanwiseError;
pub use types::*;

/// Standard result type for all planwise operations
pub type PlanwiseResult<T> = Result<T, PlanwiseError>;
