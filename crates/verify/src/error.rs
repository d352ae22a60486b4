use std::fmt;

#[derive(Debug)]
pub enum VerifyError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (threshold ordering, ranges).
    ConfigValidation(String),
    /// IO error (config file read).
    Io(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for VerifyError {}
