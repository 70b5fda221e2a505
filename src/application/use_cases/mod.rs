pub mod column_stats;
pub mod correlation;
pub mod statistics;
pub mod table_pruning;
pub mod upload;
