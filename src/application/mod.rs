pub mod use_cases;

pub use use_cases::column_stats::ColumnStatsUseCase;
pub use use_cases::correlation::CorrelationUseCase;
pub use use_cases::upload::{UploadUseCase, UploadedFile};
