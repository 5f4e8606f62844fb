pub mod costing;
pub mod product;
pub mod units;
