// Fri Jan 23 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;
