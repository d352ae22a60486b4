use std::fmt;

#[derive(Debug)]
pub enum UploadError {
    /// File has no header, or a header and no data rows.
    EmptyInput,
    /// A required column role could not be resolved from the headers.
    MissingColumn { role: String, found: Vec<String> },
    /// Spreadsheet container could not be opened or has no sheets.
    Spreadsheet(String),
    /// IO error (file read).
    Io(String),
}

impl UploadError {
    /// Headers that were present when column resolution failed.
    pub fn found_headers(&self) -> Option<&[String]> {
        match self {
            Self::MissingColumn { found, .. } => Some(found),
            _ => None,
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no data found in file"),
            Self::MissingColumn { role, found } => {
                write!(f, "{role} column not found; columns found: {}", found.join(", "))
            }
            Self::Spreadsheet(msg) => write!(f, "spreadsheet error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for UploadError {}
