pub mod analytics;
pub mod error;
pub mod upload;

// Parsed spreadsheet model
pub mod table;
