pub mod rate_limit;
pub mod traits;

// API provider implementations
pub mod polygon;
