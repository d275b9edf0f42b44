pub mod cell;
pub mod dataset;
pub mod error;
pub mod export;
pub mod query;
pub mod upload;

pub use cell::CellValue;
pub use dataset::{Dataset, Row, Sheet, SourceFormat};
pub use error::{AppError, Result};
pub use export::{ExportArtifact, ExportFormat, ExportSpec};
pub use query::{QuerySpec, ResultSet, SearchMode};
pub use upload::UploadedFile;
