pub mod costing;
pub mod products;
pub mod sheets;
pub mod units;
