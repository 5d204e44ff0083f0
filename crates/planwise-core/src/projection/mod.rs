pub mod break_even;
pub mod compare;
pub mod compounding;
