pub mod arrival;
pub mod balk;
pub mod departure;
pub mod service;
