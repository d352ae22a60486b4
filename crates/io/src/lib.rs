// Upload I/O: delimited text and spreadsheets -> marketplace reviews

pub mod columns;
pub mod csv;
pub mod error;
pub mod upload;
pub mod xlsx;

pub use columns::ColumnMap;
pub use error::UploadError;
pub use upload::{inspect_columns, parse_upload, read_file, ColumnReport, TabularInput, UploadFormat};
