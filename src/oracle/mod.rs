//! Price oracle module.

pub mod reader;
pub mod types;

pub use reader::OracleReader;
pub use types::{render, OracleSnapshot, PriceFeed, PriceReading};
