pub mod dividend_service;
pub mod holdings_service;
pub mod refresh_service;
pub mod schedule_service;
pub mod valuation_service;
