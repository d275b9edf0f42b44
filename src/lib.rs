mod application;
mod domain;
mod infrastructure;

pub use application::use_cases::column_classifier::{self, ColumnKind};
pub use application::use_cases::decoder::detect_delimiter;
pub use application::use_cases::search_history::{RecentQuery, SavedFilter};
pub use application::use_cases::upload_pipeline::CachedUpload;
pub use application::{
    ExportSerializer, FileValidator, QueryEngine, SearchHistoryService, SpreadsheetDecoder,
    UploadPipeline,
};
pub use domain::cell::CellValue;
pub use domain::dataset::{Dataset, Row, Sheet, SheetStats, SourceFormat};
pub use domain::error::{AppError, Result};
pub use domain::export::{
    ExportArtifact, ExportFormat, ExportRange, ExportSettings, ExportSpec,
};
pub use domain::query::{
    CellMatch, QuerySpec, ResultSet, SearchMode, SearchStats, SortDirection, SortSpec,
};
pub use domain::upload::{
    FileValidation, UploadReport, UploadStats, UploadStatus, UploadedFile,
};
pub use infrastructure::client::BackendClient;
pub use infrastructure::config::BackendConfig;
pub use infrastructure::download::{DownloadSink, FileDownloadSink};
pub use infrastructure::persistence::{
    DatasetMeta, DatasetRecord, DatasetStore, FileStore, StoredDataset,
};
pub use infrastructure::session_cache::{FileKvCache, KvCache};

/// Install the default tracing subscriber. Safe to call more than
/// once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
