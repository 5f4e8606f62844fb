pub mod costing_service;
pub use costing_service::CostingService;
pub mod sheet_service;
pub use sheet_service::SheetService;
pub mod units_service;
pub use units_service::UnitsService;
