pub mod medicare;
pub mod planning;
pub mod projection;
pub mod retirement;
pub mod tax;
