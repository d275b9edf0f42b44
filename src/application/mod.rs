pub mod use_cases;

pub use use_cases::decoder::SpreadsheetDecoder;
pub use use_cases::export_serializer::ExportSerializer;
pub use use_cases::file_validator::FileValidator;
pub use use_cases::query_engine::QueryEngine;
pub use use_cases::search_history::SearchHistoryService;
pub use use_cases::upload_pipeline::UploadPipeline;
